use std::time::Duration;

use crate::error::SessionError;
use crate::event::{EventStream, InputEvent};
use crate::session::drain::drain;
use crate::session::result::Outcome;
use crate::terminal::{RawMode, RawModeGuard};
use crate::ui::feedback::Feedback;

/// Has the user copy one line, stopping at the first wrong key.
///
/// Raw mode is held from the first wait until the verdict, and is left
/// again on every path out of here.
pub fn attempt_line<M, F>(
    line: &str,
    events: &EventStream,
    raw_mode: &mut M,
    feedback: &mut F,
    drain_timeout: Duration,
) -> Result<Outcome, SessionError>
where
    M: RawMode + ?Sized,
    F: Feedback + ?Sized,
{
    feedback.prompt(line).map_err(SessionError::Render)?;

    let guard = RawModeGuard::acquire(raw_mode).map_err(SessionError::Terminal)?;
    let outcome = evaluate(line, events, feedback, drain_timeout);
    let restored = guard.release();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Err(restore_err) = restored {
                tracing::warn!(err = %restore_err, "failed to restore terminal attributes");
            }
            return Err(err);
        }
    };
    restored.map_err(SessionError::Terminal)?;
    feedback.end_line().map_err(SessionError::Render)?;

    tracing::debug!(line, ?outcome, "attempt finished");
    Ok(outcome)
}

fn evaluate<F>(
    line: &str,
    events: &EventStream,
    feedback: &mut F,
    drain_timeout: Duration,
) -> Result<Outcome, SessionError>
where
    F: Feedback + ?Sized,
{
    for expected in line.chars() {
        match events.next() {
            InputEvent::Key(actual) if actual == expected => {
                feedback.matched(actual).map_err(SessionError::Render)?;
            }
            InputEvent::Key(actual) => {
                feedback
                    .mismatched(expected, actual)
                    .map_err(SessionError::Render)?;
                return Ok(drain(events, drain_timeout, expected, actual));
            }
            InputEvent::Signal(signal) => return Ok(Outcome::Terminated(signal)),
        }
    }
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Signal;
    use crate::terminal::tests::FakeRawMode;
    use crate::ui::feedback::tests::{RecordingFeedback, Render};
    use std::io;
    use std::sync::{Arc, Mutex, mpsc};

    const DRAIN: Duration = Duration::from_millis(20);

    fn keys(text: &str) -> Vec<InputEvent> {
        text.chars().map(InputEvent::Key).collect()
    }

    fn run(
        line: &str,
        input: Vec<InputEvent>,
    ) -> (Outcome, RecordingFeedback, FakeRawMode, mpsc::Sender<InputEvent>) {
        let (tx, rx) = mpsc::channel();
        for event in input {
            tx.send(event).unwrap();
        }
        let events = EventStream::from_receiver(rx);
        let mut mode = FakeRawMode::default();
        let mut feedback = RecordingFeedback::default();
        let outcome = attempt_line(line, &events, &mut mode, &mut feedback, DRAIN).unwrap();
        (outcome, feedback, mode, tx)
    }

    #[test]
    fn test_exact_copy_succeeds() {
        let (outcome, feedback, mode, _tx) = run("cat", keys("cat"));
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(feedback.matches(), 3);
        assert!(feedback.mismatches().is_empty());
        assert_eq!(mode.entered, 1);
        assert_eq!(mode.left, 1);
        assert_eq!(
            feedback.renders,
            vec![
                Render::Prompt("cat".to_string()),
                Render::Match('c'),
                Render::Match('a'),
                Render::Match('t'),
                Render::EndLine,
            ]
        );
    }

    #[test]
    fn test_mismatch_stops_at_first_wrong_key() {
        let (outcome, feedback, mode, _tx) = run("cat", keys("cxt"));
        assert_eq!(
            outcome,
            Outcome::Mismatch {
                expected: 'a',
                actual: 'x'
            }
        );
        assert_eq!(feedback.matches(), 1);
        assert_eq!(feedback.mismatches(), vec![('a', 'x')]);
        assert!(!mode.raw);
    }

    #[test]
    fn test_divergence_at_every_position() {
        let line = "strict";
        for i in 0..line.chars().count() {
            let mut typed: Vec<char> = line.chars().collect();
            typed[i] = '#';
            let typed: String = typed.into_iter().collect();
            let (outcome, feedback, _, _tx) = run(line, keys(&typed));
            let expected = line.chars().nth(i).unwrap();
            assert_eq!(
                outcome,
                Outcome::Mismatch {
                    expected,
                    actual: '#'
                }
            );
            assert_eq!(feedback.matches(), i);
            assert_eq!(feedback.mismatches(), vec![(expected, '#')]);
        }
    }

    #[test]
    fn test_keys_after_mismatch_are_drained() {
        let (tx, rx) = mpsc::channel();
        for event in keys("cxyz") {
            tx.send(event).unwrap();
        }
        let events = EventStream::from_receiver(rx);
        let mut mode = FakeRawMode::default();
        let mut feedback = RecordingFeedback::default();
        attempt_line("cat", &events, &mut mode, &mut feedback, DRAIN).unwrap();
        assert_eq!(feedback.mismatches().len(), 1);
        tx.send(InputEvent::Key('d')).unwrap();
        assert_eq!(events.next(), InputEvent::Key('d'));
    }

    #[test]
    fn test_escape_before_first_key() {
        let (outcome, feedback, mode, _tx) =
            run("cat", vec![InputEvent::Signal(Signal::Escape)]);
        assert_eq!(outcome, Outcome::Terminated(Signal::Escape));
        assert_eq!(feedback.matches(), 0);
        assert_eq!(mode.left, 1);
        assert_eq!(feedback.renders.last(), Some(&Render::EndLine));
    }

    #[test]
    fn test_signal_mid_line_abandons_it() {
        let mut input = keys("ca");
        input.push(InputEvent::Signal(Signal::Interrupt));
        input.extend(keys("t"));
        let (outcome, feedback, _, _tx) = run("cat", input);
        assert_eq!(outcome, Outcome::Terminated(Signal::Interrupt));
        assert_eq!(feedback.matches(), 2);
    }

    #[test]
    fn test_signal_during_drain_wins_over_mismatch() {
        let mut input = keys("cxy");
        input.push(InputEvent::Signal(Signal::Escape));
        let (outcome, feedback, mode, _tx) = run("cat", input);
        assert_eq!(outcome, Outcome::Terminated(Signal::Escape));
        assert_eq!(feedback.mismatches().len(), 1);
        assert!(!mode.raw);
    }

    #[test]
    fn test_empty_line_succeeds_without_input() {
        let (outcome, feedback, mode, _tx) = run("", Vec::new());
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(feedback.matches(), 0);
        assert_eq!(mode.entered, 1);
        assert_eq!(mode.left, 1);
    }

    #[test]
    fn test_unicode_line() {
        let (outcome, feedback, _, _tx) = run("naïve", keys("naïve"));
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(feedback.matches(), 5);
    }

    #[test]
    fn test_terminal_failure_is_an_error() {
        let (_tx, rx) = mpsc::channel();
        let events = EventStream::from_receiver(rx);
        let mut mode = FakeRawMode {
            fail_enter: true,
            ..Default::default()
        };
        let mut feedback = RecordingFeedback::default();
        let err = attempt_line("cat", &events, &mut mode, &mut feedback, DRAIN).unwrap_err();
        assert!(matches!(err, SessionError::Terminal(_)));
    }

    struct BrokenFeedback;

    impl Feedback for BrokenFeedback {
        fn banner(&mut self) -> io::Result<()> {
            Ok(())
        }
        fn prompt(&mut self, _line: &str) -> io::Result<()> {
            Ok(())
        }
        fn matched(&mut self, _ch: char) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }
        fn mismatched(&mut self, _expected: char, _actual: char) -> io::Result<()> {
            Ok(())
        }
        fn end_line(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_failure_still_restores_terminal() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputEvent::Key('c')).unwrap();
        let events = EventStream::from_receiver(rx);
        let mut mode = FakeRawMode::default();
        let err = attempt_line("cat", &events, &mut mode, &mut BrokenFeedback, DRAIN).unwrap_err();
        assert!(matches!(err, SessionError::Render(_)));
        assert!(!mode.raw);
        assert_eq!(mode.left, 1);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_failure_logs_failed_restore() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputEvent::Key('c')).unwrap();
        let events = EventStream::from_receiver(rx);
        let mut mode = FakeRawMode {
            fail_leave: true,
            ..Default::default()
        };

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let err = tracing::subscriber::with_default(subscriber, || {
            attempt_line("cat", &events, &mut mode, &mut BrokenFeedback, DRAIN).unwrap_err()
        });

        // The render fault is what surfaces; the restore fault is logged.
        assert!(matches!(err, SessionError::Render(_)));
        assert_eq!(mode.left, 1);
        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("failed to restore terminal attributes"));
        assert!(logged.contains("WARN"));
    }
}
