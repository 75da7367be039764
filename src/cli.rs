use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// passport: amount conversion, session management and authenticated API calls.
#[derive(Parser, Debug)]
#[command(name = "passport", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Session file (defaults to $PASSPORT_SESSION_FILE or ./.passport/session.json)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a decimal amount to base units (or back with --reverse)
    Convert(ConvertArgs),

    /// Resolve the wallet connection status from the given signals
    Status(StatusArgs),

    /// Store a session token obtained from a login
    Login(LoginArgs),

    /// Remove the stored session
    Logout,

    /// Authenticated GET
    Get(PathArgs),

    /// Authenticated POST
    Post(BodyArgs),

    /// Authenticated PUT
    Put(BodyArgs),

    /// Authenticated DELETE
    Delete(PathArgs),

    /// Look up the score of a wallet address
    Score(ScoreArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Amount, e.g. 1.2345 (or a base-unit integer with --reverse)
    pub amount: String,

    /// Decimal places of the asset
    #[arg(long, short, default_value = "8")]
    pub precision: u32,

    /// Reject malformed input and precision loss instead of truncating
    #[arg(long)]
    pub strict: bool,

    /// Convert base units back to a decimal amount
    #[arg(long, conflicts_with = "strict")]
    pub reverse: bool,
}

/// Arguments for the `status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// The wallet adapter reports a connection
    #[arg(long)]
    pub wallet_connected: bool,

    /// Treat the user as authenticated (defaults to whether a session is stored)
    #[arg(long)]
    pub authenticated: Option<bool>,

    /// The wallet adapter exposes a transaction signer
    #[arg(long)]
    pub can_submit: bool,
}

/// Arguments for the `login` subcommand.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Bearer token
    #[arg(long, env = "PASSPORT_TOKEN")]
    pub token: String,

    /// User profile as JSON
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Path relative to the API base URL
    pub path: String,
}

#[derive(Args, Debug)]
pub struct BodyArgs {
    /// Path relative to the API base URL
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Wallet address
    pub address: String,
}
