#[cfg(test)]
pub mod fixtures {
    use std::collections::BTreeMap;

    use chrono::{Duration, Utc};

    use crate::models::domain::quiz_question::{QuizOption, QuizQuestionType};
    use crate::models::domain::{AttemptStatus, Quiz, QuizAttempt, QuizQuestion};

    fn option(key: &str, correct: bool) -> QuizOption {
        QuizOption {
            key: key.to_string(),
            text: format!("Option {}", key),
            correct,
        }
    }

    /// 10-point quiz with one single-select and one multi-select question
    /// (two correct keys), 5 points each, 10-minute limit, 3 attempts.
    pub fn test_quiz() -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            title: "Unit 3 checkpoint".to_string(),
            description: Some("Covers the week 3 material".to_string()),
            time_limit_minutes: Some(10),
            max_attempts: 3,
            max_score: 10.0,
            passing_score: Some(6.0),
            available_from: None,
            available_to: None,
            questions: vec![
                QuizQuestion {
                    id: "q-1".to_string(),
                    prompt: "Pick the correct statement".to_string(),
                    question_type: QuizQuestionType::Single,
                    options: vec![option("a", true), option("b", false), option("c", false)],
                    points: 5.0,
                    order: 1,
                },
                QuizQuestion {
                    id: "q-2".to_string(),
                    prompt: "Select all that apply".to_string(),
                    question_type: QuizQuestionType::Multi,
                    options: vec![option("a", true), option("b", false), option("c", true)],
                    points: 5.0,
                    order: 2,
                },
            ],
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// A finished attempt for history fixtures.
    pub fn terminal_attempt(quiz_id: &str, number: i32, status: AttemptStatus) -> QuizAttempt {
        let started_at = Utc::now() - Duration::minutes(30);
        QuizAttempt {
            id: format!("attempt-{}", number),
            student_id: "student-1".to_string(),
            quiz_id: quiz_id.to_string(),
            attempt_number: number,
            status,
            started_at,
            submitted_at: Some(started_at + Duration::minutes(9)),
            score: Some(5.0),
            passed: Some(false),
        }
    }

    /// Shorthand for a response set keyed by question id.
    pub fn responses(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(question_id, keys)| {
                (
                    question_id.to_string(),
                    keys.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::AttemptStatus;

    #[test]
    fn test_quiz_points_add_up_to_max_score() {
        let quiz = test_quiz();
        let total: f64 = quiz.questions.iter().map(|q| q.points).sum();
        assert_eq!(total, quiz.max_score);
    }

    #[test]
    fn test_terminal_attempt_is_terminal() {
        let attempt = terminal_attempt("quiz-1", 1, AttemptStatus::Timeout);
        assert!(attempt.is_terminal());
        assert!(attempt.submitted_at.unwrap() >= attempt.started_at);
    }

    #[test]
    fn test_responses_builder_shape() {
        let set = responses(&[("q-1", &["a"]), ("q-2", &["a", "c"])]);
        assert_eq!(set.len(), 2);
        assert_eq!(set["q-2"], vec!["a", "c"]);
    }
}
