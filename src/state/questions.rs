use std::collections::HashMap;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Difficulty bucket of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Warm-up questions.
    Easy,
    /// Standard questions.
    Medium,
    /// Questions intended to separate the field.
    Hard,
}

/// One labeled answer option of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option label (`A` through `D`).
    pub label: char,
    /// Option text shown to players.
    pub text: String,
}

/// An immutable quiz question with four labeled options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier.
    pub id: Uuid,
    /// Category the question belongs to.
    pub category: String,
    /// Difficulty bucket.
    pub difficulty: Difficulty,
    /// Prompt text.
    pub prompt: String,
    /// The four options, labeled `A` through `D`.
    pub options: Vec<AnswerOption>,
    /// Label of the correct option.
    pub correct: char,
}

/// In-memory question pool with filtered uniform sampling.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_id: HashMap<Uuid, usize>,
}

impl QuestionBank {
    /// Build the bank, indexing questions by id.
    pub fn new(questions: Vec<Question>) -> Self {
        let by_id = questions
            .iter()
            .enumerate()
            .map(|(index, question)| (question.id, index))
            .collect();
        Self { questions, by_id }
    }

    /// Number of questions in the pool.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the pool holds no questions at all.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id.
    pub fn get(&self, id: &Uuid) -> Option<&Question> {
        self.by_id.get(id).map(|index| &self.questions[*index])
    }

    /// Pick one question uniformly at random among those matching the filters.
    ///
    /// Questions in `exclude` are avoided, but when exclusion empties the
    /// candidate set the pick falls back to allowing repeats so the game can
    /// always progress. Returns `None` only when the filtered set itself is
    /// empty.
    pub fn pick(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
        exclude: &[Uuid],
    ) -> Option<&Question> {
        let matching: Vec<&Question> = self
            .questions
            .iter()
            .filter(|question| {
                category.is_none_or(|c| question.category.eq_ignore_ascii_case(c))
                    && difficulty.is_none_or(|d| question.difficulty == d)
            })
            .collect();

        if matching.is_empty() {
            return None;
        }

        let fresh: Vec<&Question> = matching
            .iter()
            .copied()
            .filter(|question| !exclude.contains(&question.id))
            .collect();

        let pool = if fresh.is_empty() { &matching } else { &fresh };
        pool.choose(&mut rand::rng()).copied()
    }
}
