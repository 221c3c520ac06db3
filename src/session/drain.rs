use std::time::{Duration, Instant};

use crate::event::{EventStream, InputEvent, Wait};
use crate::session::result::Outcome;

/// How long stray keystrokes are swallowed after a mismatch.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Discards keystrokes typed past a mismatch until `timeout` has elapsed.
///
/// A signal arriving in the window replaces the mismatch as the outcome.
pub fn drain(events: &EventStream, timeout: Duration, expected: char, actual: char) -> Outcome {
    let deadline = Instant::now() + timeout;
    let mut discarded = 0usize;

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match events.next_timeout(deadline - now) {
            Wait::Event(InputEvent::Key(_)) => discarded += 1,
            Wait::Event(InputEvent::Signal(signal)) => {
                tracing::debug!(discarded, ?signal, "drain interrupted");
                return Outcome::Terminated(signal);
            }
            Wait::TimedOut => break,
        }
    }

    tracing::debug!(discarded, "drain finished");
    Outcome::Mismatch { expected, actual }
}
