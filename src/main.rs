//! chartfile binary entry point

use chartfile::cli::{parse_args, Commands};
use chartfile::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chartfile={}", cli.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::List { patient, category } => {
            chartfile::cli::commands::handle_list(&cli, patient, category.as_deref()).await
        }
        Commands::Upload { patient, file, mime } => {
            chartfile::cli::commands::handle_upload(&cli, patient, file, mime.as_deref()).await
        }
        Commands::Delete { patient, ids, yes } => {
            chartfile::cli::commands::handle_delete(&cli, patient, ids, *yes).await
        }
        Commands::Download {
            patient,
            ids,
            out,
            force,
        } => chartfile::cli::commands::handle_download(&cli, patient, ids, out, *force).await,
        Commands::Config { init } => chartfile::cli::commands::handle_config(&cli, *init).await,
    }
}
