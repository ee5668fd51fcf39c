//! Printing of handled failures.
//!
//! Commands return a [`Failure`] (wrapped in `anyhow::Error`) for the
//! expected stop conditions. `main` prints it in the run's voice on stdout
//! and exits with status 1; anything else propagates as a plain error.

use std::fmt;
use std::process::ExitCode;

use qm_kernel::render_failure;
use qm_types::Mode;

#[derive(Debug)]
pub struct Failure {
    pub mode: Mode,
    pub headline: String,
    pub detail: String,
}

impl Failure {
    pub fn report(&self) -> ExitCode {
        print!("{}", render_failure(self.mode, &self.headline, &self.detail));
        ExitCode::from(1)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.headline)
        } else {
            write!(f, "{}: {}", self.headline, self.detail)
        }
    }
}

impl std::error::Error for Failure {}

pub fn fail(mode: Mode, headline: &str, detail: impl fmt::Display) -> anyhow::Error {
    Failure {
        mode,
        headline: headline.to_string(),
        detail: detail.to_string(),
    }
    .into()
}
