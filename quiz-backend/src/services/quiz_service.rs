use crate::models::question::{Difficulty, QuizOutcome};
use crate::models::quiz::GeneratorKind;
use crate::services::fallback_generator::generate_fallback_quiz;
use crate::services::llm_service::{LlmError, QuizModel};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub outcome: QuizOutcome,
    pub generator: GeneratorKind,
}

#[derive(Clone)]
pub struct QuizService {
    model: Arc<dyn QuizModel>,
    timeout: Duration,
}

impl QuizService {
    pub fn new(model: Arc<dyn QuizModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Asks the model first and falls back to the heuristic generator on any failure.
    pub async fn generate(
        &self,
        text: &str,
        num_questions: usize,
        difficulty: Difficulty,
        token_override: Option<String>,
    ) -> GeneratedQuiz {
        if num_questions == 0 {
            return GeneratedQuiz {
                outcome: QuizOutcome::new(vec![], 0),
                generator: GeneratorKind::Fallback,
            };
        }

        let model_future = self
            .model
            .generate(text, num_questions, difficulty, token_override);

        match tokio::time::timeout(self.timeout, model_future).await {
            Ok(Ok(mut questions)) if !questions.is_empty() => {
                questions.truncate(num_questions);
                tracing::info!(count = questions.len(), "Quiz generated by language model");
                return GeneratedQuiz {
                    outcome: QuizOutcome::new(questions, num_questions),
                    generator: GeneratorKind::Llm,
                };
            }
            Ok(Ok(_)) => tracing::warn!("Language model returned no questions, using fallback"),
            Ok(Err(LlmError::NotConfigured(reason))) => {
                tracing::debug!(%reason, "Language model not configured, using fallback")
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "Language model generation failed, using fallback"),
            Err(_) => tracing::warn!(
                timeout_secs = self.timeout.as_secs_f64(),
                "Language model timed out, using fallback"
            ),
        }

        GeneratedQuiz {
            outcome: fallback(text, num_questions, difficulty),
            generator: GeneratorKind::Fallback,
        }
    }
}

fn fallback(text: &str, num_questions: usize, difficulty: Difficulty) -> QuizOutcome {
    let mut rng = rand::thread_rng();
    generate_fallback_quiz(text, num_questions, difficulty, &mut rng)
}
