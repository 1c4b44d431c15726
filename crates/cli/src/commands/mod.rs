pub mod analyze;
pub mod config;
pub mod generate;
pub mod route;
pub mod submit;

/// Outcome of one CLI command: what to print and the process exit code.
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self { exit_code: 1, output: format!("Error: {message}") }
    }
}
