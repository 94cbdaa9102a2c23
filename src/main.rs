//! FANBOX Archiver - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use fanbox_archiver::{
    api::{CookieSession, FanboxApi},
    cli::Args,
    config::{parse_creator_id, validate_config, Config},
    download::{sync_creator, AssetFetcher, HttpTransport, SyncState},
    error::{exit_codes, Result},
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_info, print_success,
        print_sync_stats, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Nothing to archive
    let Some(creator_input) = args.creator.as_deref() else {
        tracing::debug!("No creator given, nothing to do");
        return Ok(());
    };

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;
    let creator_id = parse_creator_id(creator_input)?;

    print_config_summary(
        &creator_id,
        &config.download_directory().display().to_string(),
        config.session.session_id.is_some(),
    );

    // Establish session
    let spinner = create_spinner("Connecting to FANBOX...");
    let session = CookieSession::establish(&config, &creator_id).await;
    spinner.finish_and_clear();
    let session = session?;
    let api = FanboxApi::new(session);

    let transport = HttpTransport::new(&config.session.user_agent)?;
    let fetcher = AssetFetcher::new(Arc::new(transport), config.retry_policy());

    print_info(&format!("Processing creator: {}", creator_id));
    let mut state = SyncState::new(creator_id);
    sync_creator(&api, &fetcher, &config, &mut state).await?;

    print_sync_stats(&state);
    print_success(&format!("{} file(s) written", state.files_written()));

    Ok(())
}
