//! Process-boundary error type.
//!
//! The numeric core itself never raises: degenerate fits come back as `None`
//! and out-of-bounds search candidates score infinite error. `AppError` is
//! reserved for the orchestration boundary (bad input, bad dates, I/O), where
//! the exit code matters to shell callers.

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

    /// Non-finite or out-of-contract caller input (exit code 2).
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Unparsable calendar input for the duration utility (exit code 2).
    pub fn date(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Filesystem/serialization failure during export (exit code 3).
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(3, message)
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
