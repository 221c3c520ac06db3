use std::io;

use thiserror::Error;

/// Faults that end a training session. Stop signals and mismatches are not
/// errors; see [`crate::session::result`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not switch terminal mode")]
    Terminal(#[source] io::Error),
    #[error("could not write to the terminal")]
    Render(#[source] io::Error),
}
