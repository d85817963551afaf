//! Heuristic quiz synthesis used when no language model is available.
//!
//! Questions are built from the document's own sentences: frequent long words become the
//! subjects of templated questions and the other frequent words become distractors. When that
//! does not yield enough questions, generic "what does the document mention" questions are
//! drawn from the sentences that were not used yet.

use crate::models::question::{Difficulty, Question, QuizOutcome};
use crate::utils::text::{truncate_chars, words_longer_than};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

pub const MAX_FALLBACK_QUESTIONS: usize = 10;
pub const MIN_SENTENCE_CHARS: usize = 30;
pub const MAX_SENTENCE_CHARS: usize = 200;
pub const MIN_WORD_CHARS: usize = 4;
pub const IMPORTANT_WORD_LIMIT: usize = 20;

const GENERIC_DISTRACTORS: [&str; 3] = ["other concepts", "different topics", "unrelated ideas"];

const FILLER_DISTRACTORS: [&str; 3] = [
    "A topic the document does not discuss",
    "Unrelated general knowledge",
    "Information from a different document",
];

/// Word counts in first-encounter order.
#[derive(Debug, Default)]
pub struct WordFrequencyTable {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl WordFrequencyTable {
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::default();
        for word in words_longer_than(text, MIN_WORD_CHARS) {
            match table.counts.get_mut(&word) {
                Some(count) => *count += 1,
                None => {
                    table.counts.insert(word.clone(), 1);
                    table.order.push(word);
                }
            }
        }
        table
    }

    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Most frequent words seen more than once, highest count first. Equal counts keep
    /// first-encounter order.
    pub fn important_words(&self, limit: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, usize)> = self
            .order
            .iter()
            .map(|w| (w, self.count(w)))
            .filter(|(_, count)| *count > 1)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(w, _)| w.clone())
            .collect()
    }
}

/// Sentences between 30 and 200 characters, trimmed, each kept once in document order.
pub fn sentence_candidates(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| (MIN_SENTENCE_CHARS..=MAX_SENTENCE_CHARS).contains(&s.chars().count()))
        .filter(|s| seen.insert(*s))
        .map(str::to_owned)
        .collect()
}

pub fn generate_fallback_quiz<R: Rng + ?Sized>(
    text: &str,
    num_questions: usize,
    difficulty: Difficulty,
    rng: &mut R,
) -> QuizOutcome {
    let target = num_questions.min(MAX_FALLBACK_QUESTIONS);
    let sentences = sentence_candidates(text);
    let important = WordFrequencyTable::from_text(text).important_words(IMPORTANT_WORD_LIMIT);

    tracing::debug!(
        sentences = sentences.len(),
        important_words = important.len(),
        target,
        %difficulty,
        "building fallback quiz"
    );

    let mut questions = Vec::with_capacity(target);
    let attempted = target.min(sentences.len());

    for sentence in &sentences[..attempted] {
        let tokens: HashSet<String> = words_longer_than(sentence, 0).into_iter().collect();
        let Some(key_word) = important.iter().find(|w| tokens.contains(*w)) else {
            continue;
        };
        let distractors = distractor_terms(&important, key_word);
        questions.push(render_template(sentence, key_word, &distractors, difficulty));
    }

    if questions.len() < target {
        let mut unused: Vec<&String> = sentences[attempted..].iter().collect();
        unused.shuffle(rng);
        let missing = target - questions.len();
        questions.extend(unused.into_iter().take(missing).map(|s| filler_question(s)));
    }

    let outcome = QuizOutcome::new(questions, num_questions);
    if !outcome.is_complete() {
        tracing::info!(
            produced = outcome.questions.len(),
            requested = num_questions,
            "fallback quiz is shorter than requested"
        );
    }
    outcome
}

fn distractor_terms(important: &[String], key_word: &str) -> [String; 3] {
    let mut others = important.iter().filter(|w| w.as_str() != key_word);
    GENERIC_DISTRACTORS.map(|generic| {
        others
            .next()
            .cloned()
            .unwrap_or_else(|| generic.to_string())
    })
}

fn render_template(
    sentence: &str,
    key_word: &str,
    distractors: &[String; 3],
    difficulty: Difficulty,
) -> Question {
    let [d0, d1, d2] = distractors;
    let (question, options) = match difficulty {
        Difficulty::Easy => (
            format!(
                "According to the document, what is mentioned about \"{}\"?",
                key_word
            ),
            vec![
                truncate_chars(sentence, 80),
                format!("It relates to {}", d0),
                format!("It involves {}", d1),
                format!("It concerns {}", d2),
            ],
        ),
        Difficulty::Medium => (
            format!(
                "What can be inferred about \"{}\" from the document?",
                key_word
            ),
            vec![
                format!("It is described as: {}", truncate_chars(sentence, 60)),
                format!("It primarily involves {}", d0),
                format!("It is mainly about {}", d1),
                format!("It focuses on {}", d2),
            ],
        ),
        Difficulty::Hard => (
            format!(
                "Analyze the relationship between \"{}\" and the main concept of the document. Which statement is best supported?",
                key_word
            ),
            vec![
                format!("The document states: {}", truncate_chars(sentence, 80)),
                format!("It directly contradicts the role of {}", d0),
                format!("It is irrelevant to {}", d1),
                format!("It has minimal impact on {}", d2),
            ],
        ),
    };

    Question {
        question,
        options,
        correct_answer: 0,
        explanation: format!("The document states: \"{}\"", sentence),
    }
}

fn filler_question(sentence: &str) -> Question {
    let mut options = vec![truncate_chars(sentence, 80)];
    options.extend(FILLER_DISTRACTORS.iter().map(|s| s.to_string()));
    Question {
        question: "Which of the following does the document mention?".to_string(),
        options,
        correct_answer: 0,
        explanation: format!("The document states: \"{}\"", sentence),
    }
}
