use std::io;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Switches a terminal between line-buffered and character-at-a-time input.
pub trait RawMode {
    fn enter_raw(&mut self) -> io::Result<()>;
    fn leave_raw(&mut self) -> io::Result<()>;
}

/// The controlling terminal, via crossterm. Entering raw mode saves the
/// current attributes; leaving restores exactly those.
#[derive(Debug, Default)]
pub struct CrosstermRawMode;

impl RawMode for CrosstermRawMode {
    fn enter_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn leave_raw(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }
}

/// Raw mode held for as long as the guard lives.
///
/// The guard borrows its [`RawMode`] mutably, so two guards can never be
/// active at once. Dropping it restores the terminal on every exit path.
pub struct RawModeGuard<'a, M: RawMode + ?Sized> {
    mode: &'a mut M,
    released: bool,
}

impl<'a, M: RawMode + ?Sized> RawModeGuard<'a, M> {
    pub fn acquire(mode: &'a mut M) -> io::Result<Self> {
        mode.enter_raw()?;
        Ok(Self {
            mode,
            released: false,
        })
    }

    /// Restores the terminal now and reports whether that worked.
    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        self.mode.leave_raw()
    }
}

impl<M: RawMode + ?Sized> Drop for RawModeGuard<'_, M> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.mode.leave_raw() {
            tracing::warn!(%err, "failed to restore terminal attributes");
        }
    }
}
