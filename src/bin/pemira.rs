use clap::Parser;
use pemira_admin::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so PEMIRA_API_URL and friends are picked up.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = pemira_admin::cli::run(cli).await {
        match std::env::var("PEMIRA_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
