use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

impl Question {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }

    /// Shuffles the options in place, keeping `correct_answer` pointed at the same text.
    pub fn shuffle_options(&mut self, rng: &mut impl rand::Rng) {
        let Some(correct) = self.correct_option().map(str::to_owned) else {
            return;
        };
        self.options.shuffle(rng);
        self.correct_answer = self
            .options
            .iter()
            .position(|o| *o == correct)
            .unwrap_or(0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "Invalid difficulty '{}'. Expected one of: easy, medium, hard",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fulfillment {
    Complete,
    Partial { produced: usize, requested: usize },
}

/// Questions produced for one request, along with how many were asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub questions: Vec<Question>,
    pub requested: usize,
}

impl QuizOutcome {
    pub fn new(questions: Vec<Question>, requested: usize) -> Self {
        Self {
            questions,
            requested,
        }
    }

    pub fn fulfillment(&self) -> Fulfillment {
        let produced = self.questions.len();
        if produced >= self.requested {
            Fulfillment::Complete
        } else {
            Fulfillment::Partial {
                produced,
                requested: self.requested,
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.fulfillment() == Fulfillment::Complete
    }
}
