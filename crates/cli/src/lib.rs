pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use engagegov_core::config::{AppConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "engagegov",
    about = "Citizen engagement and reporting CLI",
    long_about = "Submit citizen inquiries and image reports, preview ministry routing, \
                  and generate outreach content.",
    after_help = "Examples:\n  engagegov route \"pothole on the highway\"\n  engagegov submit \"who fixes broken streetlights?\"\n  engagegov analyze report.jpg"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Submit a text inquiry through the flow endpoint and show the response")]
    Submit {
        #[arg(help = "Report or inquiry text")]
        text: String,
    },
    #[command(about = "Run an image report through OCR, summarization, and insight generation")]
    Analyze {
        #[arg(help = "Path to a PNG or JPEG image")]
        image: std::path::PathBuf,
    },
    #[command(about = "Show the ministry suggested for a piece of text, without network calls")]
    Route {
        #[arg(help = "Text to classify")]
        text: String,
    },
    #[command(about = "Generate outreach content from a prompt")]
    Generate {
        #[arg(help = "Prompt guiding the generated content")]
        prompt: String,
        #[arg(long, help = "Desired tone, e.g. professional, casual, persuasive")]
        tone: Option<String>,
        #[arg(long, help = "Creativity level in 0.0..=1.0")]
        temperature: Option<f64>,
        #[arg(long, help = "Maximum length of the generated text in tokens")]
        max_tokens: Option<u32>,
        #[arg(long, help = "Write the generated content to this file")]
        out: Option<std::path::PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with secrets redacted")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Submit { text } => commands::submit::run(&text).await,
        Command::Analyze { image } => commands::analyze::run(&image).await,
        Command::Route { text } => commands::route::run(&text),
        Command::Generate { prompt, tone, temperature, max_tokens, out } => {
            commands::generate::run(&prompt, tone, temperature, max_tokens, out.as_deref()).await
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

pub(crate) fn load_config_and_logging() -> Result<AppConfig, engagegov_core::ConfigError> {
    let config = AppConfig::load(Default::default())?;
    init_logging(&config);
    Ok(config)
}
