use super::question::{Difficulty, Question};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Llm,
    Fallback,
}

/// A question as sent to the client. Answers are omitted when the caller asked to hide them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizItem {
    pub fn from_question(q: Question, hide_answers: bool) -> Self {
        if hide_answers {
            Self {
                question: q.question,
                options: q.options,
                correct_answer: None,
                explanation: None,
            }
        } else {
            Self {
                question: q.question,
                options: q.options,
                correct_answer: Some(q.correct_answer),
                explanation: Some(q.explanation),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub questions_generated: usize,
    pub questions_requested: usize,
    pub complete: bool,
    pub generator: GeneratorKind,
    pub difficulty: Difficulty,
    pub document_size: usize,
    pub processing_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizData {
    pub quiz: Vec<QuizItem>,
    pub document_title: String,
    pub metadata: QuizMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub success: bool,
    pub data: QuizData,
}
