pub mod attempt_lifecycle;
pub mod attempt_policy;
pub mod availability;
pub mod deadline_clock;
pub mod response_recorder;
pub mod scoring;
pub mod session;

pub use attempt_lifecycle::AttemptLifecycleManager;
pub use attempt_policy::{AttemptPolicyEnforcer, Attemptability};
pub use availability::{Availability, AvailabilityStatus, AvailabilityWindowEvaluator};
pub use deadline_clock::{DeadlineClock, DeadlineEvent, RemainingTime, ThresholdLatch};
pub use response_recorder::ResponseRecorder;
pub use scoring::{ScoreSummary, ScoringEngine};
pub use session::AttemptSession;
