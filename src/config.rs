//! Application-level configuration loading: scoring policy, lives, and the question bank.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::questions::{AnswerOption, Difficulty, Question};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ECHO_ARENA_BACK_CONFIG_PATH";
/// Lives handed to every participant on join unless configured otherwise.
const DEFAULT_STARTING_LIVES: u8 = 3;

/// How points are awarded for a correct answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Every correct answer is worth the same number of points.
    Flat {
        /// Points per correct answer.
        points: i32,
    },
    /// Faster answers earn more, decaying linearly to a floor.
    TimeWeighted {
        /// Points for answers at or under `full_credit_ms`.
        max_points: i32,
        /// Floor awarded at or beyond `decay_cutoff_ms`.
        min_points: i32,
        /// Answers at most this fast earn `max_points`.
        full_credit_ms: u64,
        /// Answers at least this slow earn `min_points`.
        decay_cutoff_ms: u64,
    },
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::Flat { points: 100 }
    }
}

impl ScoringPolicy {
    /// Points awarded for a correct answer that took `time_taken_ms`.
    pub fn score(&self, time_taken_ms: u64) -> i32 {
        match *self {
            Self::Flat { points } => points,
            Self::TimeWeighted {
                max_points,
                min_points,
                full_credit_ms,
                decay_cutoff_ms,
            } => {
                if time_taken_ms <= full_credit_ms {
                    return max_points;
                }
                if time_taken_ms >= decay_cutoff_ms || decay_cutoff_ms <= full_credit_ms {
                    return min_points;
                }

                let window = (decay_cutoff_ms - full_credit_ms) as f64;
                let elapsed = (time_taken_ms - full_credit_ms) as f64;
                let range = (max_points - min_points) as f64;
                max_points - (range * elapsed / window).round() as i32
            }
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    starting_lives: u8,
    scoring: ScoringPolicy,
    questions: Vec<Question>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        questions = config.questions.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Lives granted to a fresh membership.
    pub fn starting_lives(&self) -> u8 {
        self.starting_lives
    }

    /// Scoring policy applied to correct answers.
    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// The configured question bank.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            starting_lives: DEFAULT_STARTING_LIVES,
            scoring: ScoringPolicy::default(),
            questions: default_questions(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    starting_lives: Option<u8>,
    #[serde(default)]
    scoring: Option<ScoringPolicy>,
    #[serde(default)]
    questions: Option<Vec<RawQuestion>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let questions = match value.questions {
            Some(raw) if !raw.is_empty() => raw.into_iter().map(Into::into).collect(),
            _ => default_questions(),
        };

        Self {
            starting_lives: value.starting_lives.unwrap_or(DEFAULT_STARTING_LIVES),
            scoring: value.scoring.unwrap_or_default(),
            questions,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single question inside the configuration file.
struct RawQuestion {
    #[serde(default)]
    id: Option<Uuid>,
    category: String,
    difficulty: Difficulty,
    prompt: String,
    options: Vec<String>,
    correct: char,
}

impl From<RawQuestion> for Question {
    fn from(value: RawQuestion) -> Self {
        Self {
            id: value.id.unwrap_or_else(Uuid::new_v4),
            category: value.category,
            difficulty: value.difficulty,
            prompt: value.prompt,
            options: labeled_options(value.options),
            correct: value.correct.to_ascii_uppercase(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn labeled_options(texts: Vec<String>) -> Vec<AnswerOption> {
    texts
        .into_iter()
        .zip('A'..='D')
        .map(|(text, label)| AnswerOption { label, text })
        .collect()
}

fn built_in(
    category: &str,
    difficulty: Difficulty,
    prompt: &str,
    options: [&str; 4],
    correct: char,
) -> Question {
    Question {
        id: Uuid::new_v4(),
        category: category.into(),
        difficulty,
        prompt: prompt.into(),
        options: labeled_options(options.iter().map(|text| text.to_string()).collect()),
        correct,
    }
}

/// Built-in question bank shipped with the binary so the service is playable
/// without any configuration.
fn default_questions() -> Vec<Question> {
    vec![
        built_in(
            "geography",
            Difficulty::Easy,
            "Which is the largest ocean on Earth?",
            ["Atlantic", "Pacific", "Indian", "Arctic"],
            'B',
        ),
        built_in(
            "geography",
            Difficulty::Medium,
            "Which country has the most time zones?",
            ["Russia", "United States", "France", "China"],
            'C',
        ),
        built_in(
            "science",
            Difficulty::Easy,
            "What gas do plants primarily absorb for photosynthesis?",
            ["Oxygen", "Nitrogen", "Carbon dioxide", "Hydrogen"],
            'C',
        ),
        built_in(
            "science",
            Difficulty::Medium,
            "What is the chemical symbol for gold?",
            ["Go", "Gd", "Ag", "Au"],
            'D',
        ),
        built_in(
            "science",
            Difficulty::Hard,
            "Which particle carries the strong nuclear force?",
            ["Photon", "Gluon", "W boson", "Graviton"],
            'B',
        ),
        built_in(
            "history",
            Difficulty::Easy,
            "In which year did the Berlin Wall fall?",
            ["1985", "1987", "1989", "1991"],
            'C',
        ),
        built_in(
            "history",
            Difficulty::Medium,
            "Who was the first emperor of Rome?",
            ["Julius Caesar", "Augustus", "Nero", "Tiberius"],
            'B',
        ),
        built_in(
            "history",
            Difficulty::Hard,
            "The Treaty of Tordesillas divided the New World between which two powers?",
            [
                "Spain and Portugal",
                "England and France",
                "Spain and England",
                "Portugal and the Netherlands",
            ],
            'A',
        ),
        built_in(
            "arts",
            Difficulty::Easy,
            "Who painted the Mona Lisa?",
            ["Michelangelo", "Raphael", "Leonardo da Vinci", "Donatello"],
            'C',
        ),
        built_in(
            "arts",
            Difficulty::Hard,
            "Which composer wrote The Rite of Spring?",
            ["Debussy", "Stravinsky", "Ravel", "Prokofiev"],
            'B',
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_policy_ignores_time_taken() {
        let policy = ScoringPolicy::Flat { points: 100 };
        assert_eq!(policy.score(0), 100);
        assert_eq!(policy.score(60_000), 100);
    }

    #[test]
    fn time_weighted_policy_decays_between_bounds() {
        let policy = ScoringPolicy::TimeWeighted {
            max_points: 100,
            min_points: 25,
            full_credit_ms: 5_000,
            decay_cutoff_ms: 30_000,
        };

        assert_eq!(policy.score(1_000), 100);
        assert_eq!(policy.score(5_000), 100);
        assert_eq!(policy.score(30_000), 25);
        assert_eq!(policy.score(45_000), 25);

        let mid = policy.score(17_500);
        assert!(mid > 25 && mid < 100, "expected mid-range score, got {mid}");
    }

    #[test]
    fn default_bank_has_four_labeled_options_per_question() {
        for question in default_questions() {
            assert_eq!(question.options.len(), 4);
            let labels: Vec<char> = question.options.iter().map(|o| o.label).collect();
            assert_eq!(labels, vec!['A', 'B', 'C', 'D']);
            assert!(labels.contains(&question.correct));
        }
    }

    #[test]
    fn raw_config_falls_back_to_defaults_for_missing_fields() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.starting_lives(), DEFAULT_STARTING_LIVES);
        assert!(!config.questions().is_empty());
        assert!(matches!(config.scoring(), ScoringPolicy::Flat { points: 100 }));
    }
}
