//! Keys command: generate key material for registration.

use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sxt_crypto::KeyPair;

use crate::theme::Theme;

/// Generate a fresh key pair and print it as standard base64.
///
/// Nothing is written to disk.
pub(crate) fn generate_key(json: bool) -> Result<()> {
    let key = KeyPair::generate()?;
    let public = key.export_public_key().to_base64();
    let private = STANDARD.encode(key.keypair_bytes().as_slice());

    if json {
        let out = serde_json::json!({
            "keyId": key.key_id_hex(),
            "publicKey": public,
            "privateKey": private,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", Theme::success("New key pair generated."));
    println!("{}", Theme::kv("Key ID", &key.key_id_hex()));
    println!("{}", Theme::kv("Public key", &public));
    println!("{}", Theme::kv("Private key", &private));
    println!();
    println!(
        "{}",
        Theme::warning("The private key is shown once and not stored. Keep it secret.")
    );
    Ok(())
}
