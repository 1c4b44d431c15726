use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    engagegov_cli::run().await
}
