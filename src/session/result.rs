use crate::event::Signal;

/// How a single attempt at a line ended.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Success,
    Mismatch { expected: char, actual: char },
    Terminated(Signal),
}

/// How a whole session ended.
#[derive(Debug, PartialEq)]
pub enum SessionEnd {
    Complete,
    Stopped(Signal),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Attempts that ran to a verdict. Attempts cut short by a signal are
    /// not counted.
    pub attempts: usize,
    pub successes: usize,
    pub mismatches: usize,
}

impl SessionStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success => {
                self.attempts += 1;
                self.successes += 1;
            }
            Outcome::Mismatch { .. } => {
                self.attempts += 1;
                self.mismatches += 1;
            }
            Outcome::Terminated(_) => {}
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 100.0;
        }
        self.successes as f64 / self.attempts as f64 * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} lines correct ({:.0}%)",
            self.successes,
            self.attempts,
            self.accuracy()
        )
    }
}

#[derive(Debug)]
pub struct SessionReport {
    pub end: SessionEnd,
    pub stats: SessionStats,
}
