use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::state::questions::{Difficulty, Question};

/// Optional filters for sampling the question pool.
#[derive(Debug, Deserialize, IntoParams)]
pub struct QuestionQuery {
    /// Restrict to one category.
    pub category: Option<String>,
    /// Restrict to one difficulty bucket.
    pub difficulty: Option<Difficulty>,
}

/// A question as shown to players: the correct label is never serialized.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionView {
    /// Stable identifier, echoed back on submission.
    pub id: Uuid,
    /// Category the question belongs to.
    pub category: String,
    /// Difficulty bucket.
    pub difficulty: Difficulty,
    /// Prompt text.
    pub prompt: String,
    /// The four labeled options.
    pub options: Vec<AnswerOptionView>,
}

/// One labeled option as shown to players.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnswerOptionView {
    /// Option label (`A` through `D`).
    #[schema(value_type = String)]
    pub label: char,
    /// Option text.
    pub text: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            category: question.category.clone(),
            difficulty: question.difficulty,
            prompt: question.prompt.clone(),
            options: question
                .options
                .iter()
                .map(|option| AnswerOptionView {
                    label: option.label,
                    text: option.text.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::questions::AnswerOption;

    #[test]
    fn question_view_never_carries_the_correct_label() {
        let question = Question {
            id: Uuid::new_v4(),
            category: "science".into(),
            difficulty: Difficulty::Easy,
            prompt: "prompt".into(),
            options: vec![AnswerOption {
                label: 'A',
                text: "option".into(),
            }],
            correct: 'A',
        };

        let view = QuestionView::from(&question);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("correct").is_none());
    }
}
