use std::time::{Duration, Instant};

/// Deadline for the next progress sample. Armed only while playing.
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl ProgressTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_some_and(|due| now >= due)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }
}
