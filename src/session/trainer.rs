use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::SessionError;
use crate::event::{EventStream, Signal};
use crate::session::attempt::attempt_line;
use crate::session::drain::DEFAULT_DRAIN_TIMEOUT;
use crate::session::result::{Outcome, SessionEnd, SessionReport, SessionStats};
use crate::terminal::RawMode;
use crate::ui::feedback::Feedback;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    /// Retry a line until it is typed correctly.
    pub repeat_until_correct: bool,
    /// Pick lines at random forever instead of going through them once.
    pub endless: bool,
}

/// Everything a session needs to know up front.
#[derive(Clone, Debug)]
pub struct TrainingPlan {
    pub lines: Vec<String>,
    pub policy: Policy,
    pub drain_timeout: Duration,
}

impl TrainingPlan {
    pub fn new(lines: Vec<String>, policy: Policy) -> Self {
        Self {
            lines,
            policy,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

/// Runs line attempts one at a time against a shared event stream.
pub struct Trainer<'a, M: RawMode + ?Sized, F: Feedback + ?Sized> {
    events: &'a EventStream,
    raw_mode: &'a mut M,
    feedback: &'a mut F,
}

impl<'a, M: RawMode + ?Sized, F: Feedback + ?Sized> Trainer<'a, M, F> {
    pub fn new(events: &'a EventStream, raw_mode: &'a mut M, feedback: &'a mut F) -> Self {
        Self {
            events,
            raw_mode,
            feedback,
        }
    }

    pub fn run<R: Rng + ?Sized>(
        &mut self,
        plan: &TrainingPlan,
        rng: &mut R,
    ) -> Result<SessionReport, SessionError> {
        tracing::info!(
            lines = plan.lines.len(),
            policy = ?plan.policy,
            "session started"
        );
        self.feedback.banner().map_err(SessionError::Render)?;

        let mut stats = SessionStats::default();
        let end = if plan.policy.endless {
            self.run_endless(plan, rng, &mut stats)?
        } else {
            self.run_linear(plan, &mut stats)?
        };

        tracing::info!(?end, ?stats, "session ended");
        Ok(SessionReport { end, stats })
    }

    fn run_linear(
        &mut self,
        plan: &TrainingPlan,
        stats: &mut SessionStats,
    ) -> Result<SessionEnd, SessionError> {
        for line in &plan.lines {
            if let Some(signal) = self.practice(line, plan, stats)? {
                return Ok(SessionEnd::Stopped(signal));
            }
        }
        Ok(SessionEnd::Complete)
    }

    fn run_endless<R: Rng + ?Sized>(
        &mut self,
        plan: &TrainingPlan,
        rng: &mut R,
        stats: &mut SessionStats,
    ) -> Result<SessionEnd, SessionError> {
        loop {
            let Some(line) = plan.lines.choose(rng) else {
                return Ok(SessionEnd::Complete);
            };
            if let Some(signal) = self.practice(line, plan, stats)? {
                return Ok(SessionEnd::Stopped(signal));
            }
        }
    }

    /// Attempts one line per the retry policy. Returns the signal that
    /// stopped the session, if any.
    fn practice(
        &mut self,
        line: &str,
        plan: &TrainingPlan,
        stats: &mut SessionStats,
    ) -> Result<Option<Signal>, SessionError> {
        loop {
            let outcome = attempt_line(
                line,
                self.events,
                &mut *self.raw_mode,
                &mut *self.feedback,
                plan.drain_timeout,
            )?;
            stats.record(&outcome);
            match outcome {
                Outcome::Success => return Ok(None),
                Outcome::Mismatch { .. } if plan.policy.repeat_until_correct => continue,
                Outcome::Mismatch { .. } => return Ok(None),
                Outcome::Terminated(signal) => return Ok(Some(signal)),
            }
        }
    }
}
