//! Subcommand handlers.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use passport::{
    amount, ApiClient, Amount, ClientConfig, ConnectionStatus, FileSessionStore, ScoreClient,
    Session, SessionStore, UserProfile,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{BodyArgs, ConvertArgs, LoginArgs, StatusArgs};
use crate::error::CliError;
use crate::output;

/// Default session file, relative to the working directory.
const DEFAULT_SESSION_FILE: &str = ".passport/session.json";

/// Everything a subcommand may need.
pub struct Context {
    pub config: ClientConfig,
    pub store: Arc<FileSessionStore>,
    pub json: bool,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn new(session_file: Option<PathBuf>, json: bool, cancel: CancellationToken) -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let path = session_file
            .or_else(|| std::env::var_os("PASSPORT_SESSION_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
        Ok(Self {
            config,
            store: Arc::new(FileSessionStore::new(path)),
            json,
            cancel,
        })
    }

    fn api(&self) -> ApiClient {
        ApiClient::from_config(&self.config, self.store.clone())
    }
}

pub fn convert(ctx: &Context, args: &ConvertArgs) -> Result<(), CliError> {
    let result = if args.reverse {
        amount::from_base_units(&args.amount, args.precision)?
    } else if args.strict {
        let parsed: Amount = args.amount.parse()?;
        if parsed.loses_precision(args.precision) {
            return Err(CliError::Rejected(format!(
                "{} has {} fractional digits, asset precision is {}",
                parsed,
                parsed.fraction_digits(),
                args.precision
            )));
        }
        parsed.to_base_units(args.precision)
    } else {
        amount::to_base_units(&args.amount, args.precision)
    };

    output::write_amount(&mut io::stdout().lock(), &args.amount, &result, args.precision, ctx.json)?;
    Ok(())
}

/// Resolve the status; without `--authenticated`, a stored session counts.
fn resolve_status(ctx: &Context, args: &StatusArgs) -> Result<ConnectionStatus, CliError> {
    let authenticated = match args.authenticated {
        Some(flag) => flag,
        None => ctx.store.token()?.is_some(),
    };
    Ok(ConnectionStatus::resolve(
        args.wallet_connected,
        authenticated,
        args.can_submit,
    ))
}

pub fn status(ctx: &Context, args: &StatusArgs) -> Result<(), CliError> {
    let status = resolve_status(ctx, args)?;
    output::write_status(&mut io::stdout().lock(), status, ctx.json)?;
    Ok(())
}

pub fn login(ctx: &Context, args: &LoginArgs) -> Result<(), CliError> {
    let mut session = Session::new(args.token.trim());
    if let Some(raw) = &args.profile {
        let profile: UserProfile = serde_json::from_str(raw).map_err(CliError::bad_json("--profile"))?;
        session = session.with_profile(profile);
    }
    ctx.api().sign_in(&session)?;
    info!(path = %ctx.store.path().display(), "logged in");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CliError> {
    if !ctx.api().sign_out()? {
        warn!("no session to remove");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// Run one authenticated request and print the body, or the failure outcome.
pub async fn request(ctx: &Context, verb: Verb, args: &BodyArgs) -> Result<(), CliError> {
    let body: Option<Value> = args
        .body
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(CliError::bad_json("--body"))?;

    let api = ctx.api();
    let res: passport::Result<Value> = match verb {
        Verb::Get => api.get_with_cancel(&args.path, &ctx.cancel).await,
        Verb::Post => api.post_with_cancel(&args.path, body.as_ref(), &ctx.cancel).await,
        Verb::Put => api.put_with_cancel(&args.path, body.as_ref(), &ctx.cancel).await,
        Verb::Delete => api.delete_with_cancel(&args.path, &ctx.cancel).await,
    };

    match res {
        Ok(value) => {
            output::write_value(&mut io::stdout().lock(), &value, ctx.json)?;
            Ok(())
        }
        Err(e) => {
            output::write_failure(&mut io::stderr().lock(), &e, ctx.json)?;
            Err(e.into())
        }
    }
}

pub async fn score(ctx: &Context, address: &str) -> Result<(), CliError> {
    let client = ScoreClient::from_config(&ctx.config);
    let score = tokio::select! {
        s = client.fetch_score(address) => s,
        _ = ctx.cancel.cancelled() => return Err(passport::PassportError::Cancelled.into()),
    };
    let value = serde_json::json!({ "address": address, "totalScore": score });
    output::write_value(&mut io::stdout().lock(), &value, ctx.json)?;
    Ok(())
}
