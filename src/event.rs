use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Ctrl+C as delivered by a terminal in raw mode.
pub const INTERRUPT: char = '\u{3}';
/// The escape key.
pub const ESCAPE: char = '\u{1b}';

/// A session-ending condition raised by the input side.
#[derive(Debug)]
pub enum Signal {
    Interrupt,
    Escape,
    InputError(io::Error),
}

impl Signal {
    pub fn reason(&self) -> String {
        match self {
            Signal::Interrupt => "Ctrl+c".to_string(),
            Signal::Escape => "ESC".to_string(),
            Signal::InputError(err) => format!("input error: {err}"),
        }
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Signal::Interrupt, Signal::Interrupt) | (Signal::Escape, Signal::Escape) => true,
            (Signal::InputError(a), Signal::InputError(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum InputEvent {
    Key(char),
    Signal(Signal),
}

/// What a single wait on the event stream produced.
#[derive(Debug, PartialEq)]
pub enum Wait {
    Event(InputEvent),
    TimedOut,
}

/// Consumer end of the keystroke stream.
///
/// Keystrokes and signals share one ordered queue, so whichever was read
/// first is always observed first.
pub struct EventStream {
    rx: mpsc::Receiver<InputEvent>,
}

impl EventStream {
    pub fn from_receiver(rx: mpsc::Receiver<InputEvent>) -> Self {
        Self { rx }
    }

    /// Blocks until the next event. A vanished reader counts as an input error.
    pub fn next(&self) -> InputEvent {
        match self.rx.recv() {
            Ok(event) => event,
            Err(_) => InputEvent::Signal(Signal::InputError(reader_gone())),
        }
    }

    /// Like [`EventStream::next`] but gives up after `timeout`.
    pub fn next_timeout(&self, timeout: Duration) -> Wait {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Wait::Event(event),
            Err(mpsc::RecvTimeoutError::Timeout) => Wait::TimedOut,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Wait::Event(InputEvent::Signal(Signal::InputError(reader_gone())))
            }
        }
    }
}

fn reader_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "keystroke reader stopped")
}

/// Background reader that turns a byte stream into keystrokes and signals.
///
/// The thread lives for the rest of the process. It is never joined; it
/// stops by itself only once its input fails or the stream is dropped.
pub struct KeystrokeSource;

impl KeystrokeSource {
    pub fn spawn<R>(input: R) -> EventStream
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("keystroke-source".to_string())
            .spawn(move || read_loop(input, tx));
        if let Err(err) = spawned {
            // The consumer sees a disconnected channel from here on.
            tracing::error!(%err, "failed to spawn keystroke reader");
        }

        EventStream::from_receiver(rx)
    }

    pub fn spawn_stdin() -> EventStream {
        Self::spawn(io::stdin())
    }
}

fn read_loop<R: Read>(input: R, tx: mpsc::Sender<InputEvent>) {
    let mut input = BufReader::new(input);
    loop {
        let event = match read_char(&mut input) {
            Ok(INTERRUPT) => InputEvent::Signal(Signal::Interrupt),
            Ok(ESCAPE) => InputEvent::Signal(Signal::Escape),
            Ok(ch) => InputEvent::Key(ch),
            Err(err) => {
                tracing::debug!(%err, "keystroke reader stopping");
                let _ = tx.send(InputEvent::Signal(Signal::InputError(err)));
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

/// Reads exactly one UTF-8 encoded code point.
///
/// Malformed input decodes to U+FFFD. A byte that breaks a sequence is
/// left unread, so it is decoded on its own by the next call. End of input
/// is reported as `UnexpectedEof`.
pub fn read_char<R: BufRead>(input: &mut R) -> io::Result<char> {
    let lead = peek_byte(input)?.ok_or_else(end_of_input)?;
    input.consume(1);

    let width = match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Ok(char::REPLACEMENT_CHARACTER),
    };
    let mut buf = [lead, 0, 0, 0];
    for slot in buf.iter_mut().take(width).skip(1) {
        match peek_byte(input)? {
            Some(byte) if byte & 0xc0 == 0x80 => {
                *slot = byte;
                input.consume(1);
            }
            _ => return Ok(char::REPLACEMENT_CHARACTER),
        }
    }

    Ok(std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER))
}

/// The next byte without consuming it, or `None` at end of input.
fn peek_byte<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    loop {
        match input.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

fn end_of_input() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")
}
