//! Process-level error type.
//!
//! Every fallible operation in the crate returns `AppError`, which carries the
//! exit code the `tfd` binary should terminate with. Conventions:
//!
//! - 2: input/configuration problems (unreadable list, bad catalog row)
//! - 3: data problems (malformed profile, degenerate threshold, singular
//!   inclination, empty calibration yield)
//! - 4: fit problems (relation did not converge)
//!
//! Per-source errors are built with these same constructors but are caught by
//! the pipeline, logged, and never abort the batch.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Input/configuration error (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Data error (exit code 3).
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Fit error (exit code 4).
    pub fn fit(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
