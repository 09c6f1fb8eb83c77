use crate::commands::{list_courses, submit_draft, validate_draft};
use clap::{Args, Parser, Subcommand};
use enrollment_intake::config::AppConfig;
use enrollment_intake::error::AppError;
use enrollment_intake::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Training Application Intake",
    about = "Browse open courses and submit training applications from the command line",
    version
)]
struct Cli {
    /// Override the configured intake service origin (e.g. http://localhost:8000)
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the courses currently open for applications
    Courses,
    /// Check a draft file against the form rules without sending it
    Validate(DraftArgs),
    /// Validate a draft file and submit it to the intake service
    Submit(DraftArgs),
}

#[derive(Args, Debug)]
pub(crate) struct DraftArgs {
    /// JSON object keyed by field name; file fields hold paths relative to the draft file
    #[arg(long)]
    pub(crate) draft: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(base_url) = cli.base_url {
        config.endpoints.base_url = base_url;
        config.endpoints.courses_url()?;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    match cli.command {
        Command::Courses => list_courses(&config).await,
        Command::Validate(args) => validate_draft(&config, args),
        Command::Submit(args) => submit_draft(&config, args).await,
    }
}
