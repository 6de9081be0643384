//! Biscuit command: mint a capability token signed by the session key.

use anyhow::{Context, Result};
use sxt_capabilities::{Capability, CapabilityTokenBuilder, operation};
use tracing::warn;

use crate::AppContext;
use crate::commands::login::{LoginArgs, establish};
use crate::theme::Theme;

/// Parse `operation:resource` arguments.
pub(crate) fn parse_capabilities(raw: &[String]) -> Result<Vec<Capability>> {
    raw.iter()
        .map(|s| {
            let capability: Capability = s
                .parse()
                .with_context(|| format!("invalid capability {s:?}"))?;
            if !operation::is_known(capability.operation()) {
                warn!(operation = capability.operation(), "Unknown operation name");
            }
            Ok(capability)
        })
        .collect()
}

/// Run `sxt biscuit`.
///
/// The token goes to stdout on its own line; everything else to stderr.
pub(crate) fn run_biscuit(ctx: &AppContext, args: &LoginArgs, raw: &[String]) -> Result<()> {
    let capabilities = parse_capabilities(raw)?;
    let active = establish(ctx, args)?;

    let token = CapabilityTokenBuilder::new()
        .capabilities(capabilities)
        .build(active.keypair())?;

    eprintln!(
        "{}",
        Theme::header(&format!("Capability token for {}", active.user_id()))
    );
    eprintln!(
        "{}",
        Theme::kv("Public key", &active.keypair().export_public_key().to_base64())
    );
    println!("{}", token.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capabilities() {
        let caps = parse_capabilities(&[
            "dql_select:eth.testtable106".to_owned(),
            "dml_insert:eth.blocks".to_owned(),
        ])
        .unwrap();
        assert_eq!(caps.len(), 2);
        assert_eq!(caps[0].operation(), "dql_select");
        assert_eq!(caps[0].resource(), "eth.testtable106");
    }

    #[test]
    fn test_parse_capabilities_rejects_missing_resource() {
        assert!(parse_capabilities(&["dql_select".to_owned()]).is_err());
    }
}
