pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod quiz_response;
pub use quiz::Quiz;
pub use quiz_attempt::{AttemptStatus, QuizAttempt};
pub use quiz_question::QuizQuestion;
pub use quiz_response::QuizResponse;
