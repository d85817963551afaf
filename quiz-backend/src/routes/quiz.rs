use crate::{
    dto::quiz_dto::GenerateQuizForm,
    error::{Error, Result},
    models::question::Question,
    models::quiz::{GenerateQuizResponse, QuizData, QuizItem, QuizMetadata},
    AppState,
};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    tracing::info!("Quiz generation request received");

    let form = GenerateQuizForm::from_multipart(multipart, state.config.max_file_size).await?;
    form.validate()?;

    let document = form.document.clone().ok_or_else(|| {
        Error::BadRequest("No document file provided. Please upload a PDF or TXT file.".into())
    })?;

    let requested = usize::try_from(form.num_questions).unwrap_or(usize::MAX);
    let num_questions = requested.min(state.config.max_questions);
    tracing::info!(
        file = %document.file_name,
        size = document.data.len(),
        num_questions,
        difficulty = %form.difficulty,
        "Processing document"
    );

    let text = state
        .document_service
        .extract_text(&document.file_name, &document.data)
        .await?;
    let content_chars = text.trim().chars().count();
    tracing::info!(chars = content_chars, "Extracted text from document");

    if content_chars < state.config.min_document_chars {
        return Err(Error::DocumentTooShort);
    }

    let generated = state
        .quiz_service
        .generate(
            &text,
            num_questions,
            form.difficulty,
            form.huggingface_token.clone(),
        )
        .await;

    let complete = generated.outcome.is_complete();
    let mut questions = generated.outcome.questions;
    if form.shuffle_options {
        shuffle_all(&mut questions);
    }
    tracing::info!(
        generated = questions.len(),
        requested = num_questions,
        generator = ?generated.generator,
        "Generated quiz questions"
    );

    let response = GenerateQuizResponse {
        success: true,
        data: QuizData {
            metadata: QuizMetadata {
                questions_generated: questions.len(),
                questions_requested: num_questions,
                complete,
                generator: generated.generator,
                difficulty: form.difficulty,
                document_size: document.data.len(),
                processing_time: chrono::Utc::now(),
            },
            quiz: questions
                .into_iter()
                .map(|q| QuizItem::from_question(q, form.hide_answers))
                .collect(),
            document_title: document.file_name,
        },
    };

    Ok(Json(response))
}

fn shuffle_all(questions: &mut [Question]) {
    let mut rng = rand::thread_rng();
    for q in questions.iter_mut() {
        q.shuffle_options(&mut rng);
    }
}
