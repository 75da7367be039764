mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::{BodyArgs, Command};
use commands::{Context, Verb};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv(); // load .env if present

    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cancel = setup_signal_handlers();

    let ctx = match Context::new(cli.session_file, cli.json, cancel) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Command::Convert(args) => commands::convert(&ctx, &args),
        Command::Status(args) => commands::status(&ctx, &args),
        Command::Login(args) => commands::login(&ctx, &args),
        Command::Logout => commands::logout(&ctx),
        Command::Get(args) => {
            let args = BodyArgs {
                path: args.path,
                body: None,
            };
            commands::request(&ctx, Verb::Get, &args).await
        }
        Command::Post(args) => commands::request(&ctx, Verb::Post, &args).await,
        Command::Put(args) => commands::request(&ctx, Verb::Put, &args).await,
        Command::Delete(args) => {
            let args = BodyArgs {
                path: args.path,
                body: None,
            };
            commands::request(&ctx, Verb::Delete, &args).await
        }
        Command::Score(args) => commands::score(&ctx, &args.address).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

/// Register a SIGINT handler that triggers the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, cancelling");
        cancel_clone.cancel();
    });

    cancel
}
