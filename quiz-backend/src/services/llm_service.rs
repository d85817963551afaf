use crate::config::{Config, LlmProvider};
use crate::models::question::{Difficulty, Question, OPTIONS_PER_QUESTION};
use crate::utils::text::truncate_chars;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::sync::{Arc, OnceLock};

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse model output: {0}")]
    Parse(String),
    #[error("model returned no usable questions")]
    Empty,
}

/// A language model that can turn document text into quiz questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizModel: Send + Sync {
    async fn generate(
        &self,
        text: &str,
        num_questions: usize,
        difficulty: Difficulty,
        token_override: Option<String>,
    ) -> Result<Vec<Question>, LlmError>;
}

pub fn model_from_config(config: &Config, client: Client) -> Arc<dyn QuizModel> {
    match config.llm_provider {
        LlmProvider::None => Arc::new(DisabledModel),
        LlmProvider::HuggingFace => Arc::new(HuggingFaceModel::new(
            client,
            config.huggingface_api_url.clone(),
            config.huggingface_token.clone(),
        )),
        LlmProvider::Endpoint => Arc::new(EndpointModel::new(
            client,
            config.llm_api_endpoint.clone(),
        )),
    }
}

pub struct DisabledModel;

#[async_trait]
impl QuizModel for DisabledModel {
    async fn generate(
        &self,
        _text: &str,
        _num_questions: usize,
        _difficulty: Difficulty,
        _token_override: Option<String>,
    ) -> Result<Vec<Question>, LlmError> {
        Err(LlmError::NotConfigured("LLM_PROVIDER is none".into()))
    }
}

/// Hugging Face inference API. The model answers in plain text, one lettered block per question.
pub struct HuggingFaceModel {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl HuggingFaceModel {
    pub fn new(client: Client, api_url: String, token: Option<String>) -> Self {
        Self {
            client,
            api_url,
            token,
        }
    }
}

#[async_trait]
impl QuizModel for HuggingFaceModel {
    async fn generate(
        &self,
        text: &str,
        num_questions: usize,
        difficulty: Difficulty,
        token_override: Option<String>,
    ) -> Result<Vec<Question>, LlmError> {
        let token = token_override
            .or_else(|| self.token.clone())
            .ok_or_else(|| LlmError::NotConfigured("no Hugging Face token".into()))?;

        let payload = serde_json::json!({
            "inputs": lettered_prompt(text, num_questions, difficulty),
            "parameters": {
                "max_new_tokens": 1000,
                "temperature": 0.7,
                "do_sample": true,
                "return_full_text": false
            }
        });

        tracing::info!(url = %self.api_url, num_questions, "Requesting quiz from Hugging Face");
        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let body: JsonValue = res.json().await?;
        let generated = body
            .get(0)
            .and_then(|r| r.get("generated_text"))
            .or_else(|| body.get("generated_text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| LlmError::Parse("missing generated_text".into()))?;

        let questions = parse_lettered_questions(generated);
        sanitize_questions(questions, num_questions)
    }
}

/// Companion generation service that answers with `{"questions": [...]}`.
pub struct EndpointModel {
    client: Client,
    endpoint: String,
}

impl EndpointModel {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl QuizModel for EndpointModel {
    async fn generate(
        &self,
        text: &str,
        num_questions: usize,
        difficulty: Difficulty,
        _token_override: Option<String>,
    ) -> Result<Vec<Question>, LlmError> {
        let prompt = json_prompt(text, num_questions, difficulty);

        tracing::info!(endpoint = %self.endpoint, num_questions, "Requesting quiz from generation endpoint");
        let res = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let body: JsonValue = res.json().await?;
        let questions = parse_json_questions(&body);
        sanitize_questions(questions, num_questions)
    }
}

fn lettered_prompt(text: &str, num_questions: usize, difficulty: Difficulty) -> String {
    format!(
        "Create {n} multiple choice questions based on this document.\n\
         Make questions {difficulty} difficulty level.\n\
         Format: Question: [question text]\n\
         A) [option 1]\n\
         B) [option 2]\n\
         C) [option 3]\n\
         D) [option 4]\n\
         Answer: [A/B/C/D]\n\n\
         Document: {doc}\n\n\
         Questions:",
        n = num_questions,
        difficulty = difficulty,
        doc = truncate_chars(text, 1500),
    )
}

fn json_prompt(text: &str, num_questions: usize, difficulty: Difficulty) -> String {
    format!(
        "Generate {n} {difficulty} quiz questions based on the following text.\n\
         Format each question as JSON with:\n\
         - question: string\n\
         - options: string array (4 items)\n\
         - correctAnswerIndex: number (0-3)\n\
         - explanation: string (optional)\n\n\
         Text: {doc}",
        n = num_questions,
        difficulty = difficulty,
        doc = truncate_chars(text, 2000),
    )
}

static QUESTION_RE: OnceLock<Regex> = OnceLock::new();
static OPTION_RE: OnceLock<Regex> = OnceLock::new();
static ANSWER_RE: OnceLock<Regex> = OnceLock::new();

/// Parses `Question: / A) .. D) / Answer: X` blocks. Incomplete blocks are dropped.
pub fn parse_lettered_questions(text: &str) -> Vec<Question> {
    let question_re = QUESTION_RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:\d+[.)]\s*)?(?:question|q)\s*\d*\s*[:.]\s*(.+)$").expect("valid regex")
    });
    let option_re =
        OPTION_RE.get_or_init(|| Regex::new(r"^([A-Da-d])[).:]\s*(.+)$").expect("valid regex"));
    let answer_re = ANSWER_RE
        .get_or_init(|| Regex::new(r"(?i)^answer\s*:\s*\(?([A-D])\b").expect("valid regex"));

    let mut questions = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = answer_re.captures(line) {
            if let Some((stem, options)) = current.take() {
                let letter = caps[1].to_ascii_uppercase().as_bytes()[0];
                let index = usize::from(letter - b'A');
                if options.len() == OPTIONS_PER_QUESTION {
                    let explanation = format!("The correct answer is {}.", options[index]);
                    questions.push(Question {
                        question: stem,
                        options,
                        correct_answer: index,
                        explanation,
                    });
                }
            }
        } else if let Some(caps) = question_re.captures(line) {
            current = Some((caps[1].trim().to_string(), Vec::new()));
        } else if let Some(caps) = option_re.captures(line) {
            if let Some((_, options)) = current.as_mut() {
                options.push(caps[2].trim().to_string());
            }
        }
    }

    questions
}

/// Reads `{"questions": [...]}` or a bare array, accepting `correctAnswerIndex` or `correct_answer`.
pub fn parse_json_questions(raw: &JsonValue) -> Vec<Question> {
    let items = raw
        .get("questions")
        .and_then(|q| q.as_array())
        .or_else(|| raw.as_array())
        .cloned()
        .unwrap_or_default();

    items
        .iter()
        .filter_map(|v| {
            let question = v.get("question")?.as_str()?.trim().to_string();
            let options: Vec<String> = v
                .get("options")?
                .as_array()?
                .iter()
                .map(|o| o.as_str().map(|s| s.trim().to_string()))
                .collect::<Option<_>>()?;
            let correct = v
                .get("correctAnswerIndex")
                .or_else(|| v.get("correct_answer"))
                .and_then(|i| i.as_u64())?;
            let explanation = v
                .get("explanation")
                .and_then(|e| e.as_str())
                .unwrap_or_default()
                .to_string();
            Some(Question {
                question,
                options,
                correct_answer: usize::try_from(correct).ok()?,
                explanation,
            })
        })
        .collect()
}

/// Keeps well-formed questions (non-empty stem, four options, answer in range) up to `limit`.
pub fn sanitize_questions(
    questions: Vec<Question>,
    limit: usize,
) -> Result<Vec<Question>, LlmError> {
    let mut kept: Vec<Question> = questions
        .into_iter()
        .filter(|q| {
            !q.question.is_empty()
                && q.options.len() == OPTIONS_PER_QUESTION
                && q.correct_answer < OPTIONS_PER_QUESTION
        })
        .collect();
    kept.truncate(limit);

    if kept.is_empty() {
        return Err(LlmError::Empty);
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const LETTERED: &str = "Question: What does the server store?
A) Requests
B) Images
C) Passwords
D) Nothing
Answer: A

Question: How do clients connect?
A) Carrier pigeon
B) Sockets
C) Telegraph
Answer: B

2. Question: When does a crashed server restart?
a) Never
b) Within seconds
c) After a week
d) On Mondays
Answer: (B)";

    #[test]
    fn lettered_blocks_are_parsed_and_incomplete_ones_dropped() {
        let questions = parse_lettered_questions(LETTERED);
        assert_eq!(questions.len(), 2);

        assert_eq!(questions[0].question, "What does the server store?");
        assert_eq!(questions[0].correct_answer, 0);
        assert_eq!(questions[0].options[3], "Nothing");

        assert_eq!(questions[1].question, "When does a crashed server restart?");
        assert_eq!(questions[1].correct_answer, 1);
        assert_eq!(questions[1].correct_option(), Some("Within seconds"));
        assert_eq!(questions[1].explanation, "The correct answer is Within seconds.");
    }

    #[test]
    fn free_text_without_blocks_yields_nothing() {
        let questions = parse_lettered_questions("I am a chatbot and I like quizzes.");
        assert!(questions.is_empty());
        assert_err!(sanitize_questions(questions, 5));
    }

    #[test]
    fn json_questions_accept_both_answer_keys() {
        let raw = serde_json::json!({
            "questions": [
                {
                    "question": "Pick one",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswerIndex": 2,
                    "explanation": "c is right"
                },
                {
                    "question": "Pick another",
                    "options": ["a", "b", "c", "d"],
                    "correct_answer": 1
                },
                { "question": "Broken", "options": "not a list", "correct_answer": 0 }
            ]
        });
        let questions = parse_json_questions(&raw);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, 2);
        assert_eq!(questions[0].explanation, "c is right");
        assert_eq!(questions[1].correct_answer, 1);
        assert_eq!(questions[1].explanation, "");
    }

    #[test]
    fn sanitize_drops_malformed_and_truncates() {
        let good = |stem: &str| Question {
            question: stem.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 3,
            explanation: String::new(),
        };
        let mut three_options = good("three");
        three_options.options.pop();
        let mut out_of_range = good("range");
        out_of_range.correct_answer = 4;

        let kept = assert_ok!(sanitize_questions(
            vec![three_options, good("one"), out_of_range, good("two"), good("three")],
            2
        ));
        assert_eq!(
            kept.iter().map(|q| q.question.as_str()).collect::<Vec<_>>(),
            vec!["one", "two"]
        );
    }

    #[test]
    fn prompts_truncate_the_document() {
        let doc = "x".repeat(5000);
        let prompt = lettered_prompt(&doc, 3, Difficulty::Hard);
        assert!(prompt.contains("Create 3 multiple choice questions"));
        assert!(prompt.contains("hard difficulty"));
        assert!(prompt.len() < 2000);

        let prompt = json_prompt(&doc, 4, Difficulty::Easy);
        assert!(prompt.contains("Generate 4 easy quiz questions"));
        assert!(prompt.len() < 2500);
    }

    #[tokio::test]
    async fn disabled_model_always_fails_over() {
        let result = DisabledModel
            .generate("some text", 3, Difficulty::Medium, None)
            .await;
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn huggingface_without_token_is_not_configured() {
        let model = HuggingFaceModel::new(Client::new(), "http://127.0.0.1:9/none".into(), None);
        let result = model.generate("some text", 3, Difficulty::Medium, None).await;
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }
}
