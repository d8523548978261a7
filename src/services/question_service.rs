//! Standalone sampling of the question pool, outside any room.

use crate::{
    dto::question::{QuestionQuery, QuestionView},
    error::ServiceError,
    state::SharedState,
};

/// Sample one question uniformly from the pool, honoring the optional
/// category and difficulty filters.
pub fn random_question(
    state: &SharedState,
    query: &QuestionQuery,
) -> Result<QuestionView, ServiceError> {
    state
        .questions()
        .pick(query.category.as_deref(), query.difficulty, &[])
        .map(QuestionView::from)
        .ok_or(ServiceError::NoQuestionsAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{AppState, questions::Difficulty},
    };

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default())
    }

    #[test]
    fn unfiltered_sampling_returns_a_question() {
        let state = test_state();
        let query = QuestionQuery {
            category: None,
            difficulty: None,
        };
        assert!(random_question(&state, &query).is_ok());
    }

    #[test]
    fn difficulty_filter_is_honored() {
        let state = test_state();
        let query = QuestionQuery {
            category: None,
            difficulty: Some(Difficulty::Easy),
        };
        let question = random_question(&state, &query).unwrap();
        assert_eq!(question.difficulty, Difficulty::Easy);
    }

    #[test]
    fn unknown_category_yields_no_questions() {
        let state = test_state();
        let query = QuestionQuery {
            category: Some("no-such-category".into()),
            difficulty: None,
        };
        let err = random_question(&state, &query).unwrap_err();
        assert!(matches!(err, ServiceError::NoQuestionsAvailable));
    }
}
