use crate::error::{Error, Result};
use crate::models::question::Difficulty;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use validator::Validate;

pub const DEFAULT_NUM_QUESTIONS: i64 = 5;

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Validate)]
pub struct GenerateQuizForm {
    pub document: Option<UploadedDocument>,
    #[validate(range(min = 1, message = "numQuestions must be at least 1"))]
    pub num_questions: i64,
    pub difficulty: Difficulty,
    pub huggingface_token: Option<String>,
    pub hide_answers: bool,
    pub shuffle_options: bool,
}

impl Default for GenerateQuizForm {
    fn default() -> Self {
        Self {
            document: None,
            num_questions: DEFAULT_NUM_QUESTIONS,
            difficulty: Difficulty::default(),
            huggingface_token: None,
            hide_answers: false,
            shuffle_options: false,
        }
    }
}

impl GenerateQuizForm {
    pub async fn from_multipart(mut multipart: Multipart, max_file_size: usize) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::error!("Failed to get next field: {}", e);
            upload_error(e, max_file_size)
        })? {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "document" => {
                    let file_name = field.file_name().unwrap_or("document").to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| upload_error(e, max_file_size))?;
                    if data.len() > max_file_size {
                        return Err(too_large(max_file_size));
                    }
                    form.document = Some(UploadedDocument { file_name, data });
                }
                "numQuestions" | "num_questions" => {
                    let raw = field.text().await?;
                    let raw = raw.trim();
                    if !raw.is_empty() {
                        form.num_questions = raw.parse().map_err(|_| {
                            Error::BadRequest(format!("numQuestions must be an integer, got '{}'", raw))
                        })?;
                    }
                }
                "difficulty" => {
                    let raw = field.text().await?;
                    if !raw.trim().is_empty() {
                        form.difficulty = raw.parse().map_err(Error::BadRequest)?;
                    }
                }
                "huggingFaceToken" | "huggingface_token" => {
                    let token = field.text().await?;
                    let token = token.trim();
                    if !token.is_empty() {
                        form.huggingface_token = Some(token.to_string());
                    }
                }
                "hide_answers" | "hideAnswers" => {
                    form.hide_answers = parse_flag(&field.text().await?);
                }
                "shuffle_options" | "shuffleOptions" => {
                    form.shuffle_options = parse_flag(&field.text().await?);
                }
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

fn too_large(max_file_size: usize) -> Error {
    Error::PayloadTooLarge {
        max_mb: max_file_size / (1024 * 1024),
    }
}

/// A body that trips the request limit surfaces as a multipart stream error.
fn upload_error(err: MultipartError, max_file_size: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_file_size)
    } else {
        Error::Multipart(err)
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
