//! Login command: establish or resume a session.

use anyhow::Result;
use sxt_auth::{ActiveSession, BootstrapOutcome, Credentials};
use tracing::info;

use crate::AppContext;
use crate::config_bridge::{build_session, resolve_join_code, resolve_user_id};
use crate::theme::Theme;

/// Flags shared by commands that need a session.
#[derive(Debug, Default, clap::Args)]
pub(crate) struct LoginArgs {
    /// User id (falls back to `identity.user_id` / `SXT_USER_ID`)
    #[arg(long)]
    pub(crate) userid: Option<String>,

    /// Join code for first enrollment (falls back to `SXT_JOIN_CODE`)
    #[arg(long)]
    pub(crate) joincode: Option<String>,

    /// Base64 public key; requires --privkey
    #[arg(long, requires = "privkey")]
    pub(crate) pubkey: Option<String>,

    /// Base64 private key (32-byte seed or 64-byte keypair); requires --pubkey
    #[arg(long, requires = "pubkey")]
    pub(crate) privkey: Option<String>,
}

/// Resolve credentials and bootstrap a session.
pub(crate) fn establish(ctx: &AppContext, args: &LoginArgs) -> Result<ActiveSession> {
    let user_id = resolve_user_id(args.userid.as_deref(), &ctx.config)?;
    let join_code = resolve_join_code(args.joincode.as_deref(), &ctx.config)?;
    let credentials = Credentials::from_parts(
        user_id,
        join_code,
        args.pubkey.as_deref(),
        args.privkey.as_deref(),
    )?;

    let mut session = build_session(&ctx.config, &ctx.home)?;
    let active = session.bootstrap(credentials)?;
    info!(
        user_id = %active.user_id(),
        outcome = %active.outcome(),
        state = %session.state(),
        "Session ready"
    );
    Ok(active)
}

/// Run `sxt login`.
pub(crate) fn run_login(ctx: &AppContext, args: &LoginArgs, show_token: bool) -> Result<()> {
    let active = establish(ctx, args)?;

    let headline = match active.outcome() {
        BootstrapOutcome::Reused => "Existing session is still valid.",
        BootstrapOutcome::Refreshed => "Session refreshed.",
        BootstrapOutcome::NewLogin | BootstrapOutcome::ReLogin | BootstrapOutcome::ExplicitLogin => {
            "Logged in."
        },
    };
    println!("{}", Theme::success(headline));
    println!("{}", Theme::kv("User", active.user_id().as_str()));
    println!("{}", Theme::kv("Outcome", &active.outcome().to_string()));
    println!("{}", Theme::kv("Key ID", &active.keypair().key_id_hex()));
    if let Some(expires) = active.tokens().access_expires_at() {
        println!("{}", Theme::kv("Expires", &expires.to_rfc3339()));
    }
    if show_token {
        println!("{}", Theme::kv("Access", active.access_token()));
    } else {
        println!("{}", Theme::dimmed("  (use --show-token to print the access token)"));
    }

    Ok(())
}
