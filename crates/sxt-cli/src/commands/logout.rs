//! Logout command: revoke and forget the stored session.

use anyhow::Result;

use crate::AppContext;
use crate::config_bridge::{build_session, resolve_user_id};
use crate::theme::Theme;

/// Run `sxt logout`.
pub(crate) fn run_logout(ctx: &AppContext, userid: Option<&str>) -> Result<()> {
    let user_id = resolve_user_id(userid, &ctx.config)?;
    let mut session = build_session(&ctx.config, &ctx.home)?;

    if session.logout_stored(&user_id)? {
        println!("{}", Theme::success(&format!("Logged out {user_id}.")));
    } else {
        println!(
            "{}",
            Theme::info(&format!("No stored session for {user_id}."))
        );
    }
    Ok(())
}
