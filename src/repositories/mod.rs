pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod quiz_response_repository;

pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use quiz_response_repository::{MongoQuizResponseRepository, QuizResponseRepository};
