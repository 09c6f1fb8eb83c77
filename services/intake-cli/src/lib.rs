mod cli;
mod commands;
mod draft_file;

use enrollment_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
