use chrono::{DateTime, Duration, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailabilityStatus {
    Upcoming,
    Active,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Availability {
    pub status: AvailabilityStatus,
    /// Time until the window opens; set only when Upcoming with a lower bound.
    pub opens_in: Option<Duration>,
    /// Time until the window closes; set only when Active with an upper bound.
    pub closes_in: Option<Duration>,
}

impl Availability {
    /// Human-displayable countdown to the close of the window.
    pub fn display_remaining(&self) -> Option<String> {
        self.closes_in.map(format_remaining)
    }
}

pub struct AvailabilityWindowEvaluator;

impl AvailabilityWindowEvaluator {
    /// Classifies a quiz's availability window at `now`. An absent bound is
    /// no constraint on that side; no bounds at all means always active.
    pub fn evaluate(
        available_from: Option<DateTime<Utc>>,
        available_to: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Availability {
        if let Some(from) = available_from {
            if now < from {
                return Availability {
                    status: AvailabilityStatus::Upcoming,
                    opens_in: Some(from - now),
                    closes_in: None,
                };
            }
        }

        if let Some(to) = available_to {
            if now > to {
                return Availability {
                    status: AvailabilityStatus::Ended,
                    opens_in: None,
                    closes_in: None,
                };
            }
            return Availability {
                status: AvailabilityStatus::Active,
                opens_in: None,
                closes_in: Some(to - now),
            };
        }

        Availability {
            status: AvailabilityStatus::Active,
            opens_in: None,
            closes_in: None,
        }
    }
}

pub fn format_remaining(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
