//! Vault JWT Signing Tool
//!
//! Signs a token with a Vault transit key, then parses it back to show the
//! signature verifies. Endpoint settings come from the `VAULT_*` environment
//! variables (a `.env` file is honored).
//!
//! # Usage
//!
//! ```bash
//! VAULT_ADDR=http://127.0.0.1:8200 VAULT_TOKEN=root \
//!   cargo run --example sign_token -- --key jwt --subject alice --ttl 300
//! ```
//!
//! # Requirements
//!
//! A Vault server with the transit engine mounted and an HMAC-capable key.
use clap::Parser;
use eyre::{eyre, Result};
use vault_jwt::{
    bootstrap::initialize_vault_jwt_from_env,
    constants::VAULT_SIGNING_METHOD_NAME,
    jwt::{get_signing_method, parse_with_claims, RegisteredClaims, Token},
    logging::setup_logging,
    models::{RemoteSigningConfig, SecretString},
    utils::now_timestamp,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sign and verify a JWT with a Vault transit key")]
struct Args {
    /// Name of the transit key
    #[arg(long)]
    key: String,

    /// Transit engine mount path
    #[arg(long, default_value = "transit")]
    mount: String,

    /// Vault token; falls back to VAULT_TOKEN
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    token: String,

    /// Value for the `sub` claim
    #[arg(long)]
    subject: Option<String>,

    /// Seconds until the token expires
    #[arg(long, default_value_t = 300)]
    ttl: i64,

    /// Require an https Vault address
    #[arg(long)]
    tls: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging()?;

    let args = Args::parse();
    initialize_vault_jwt_from_env()?;

    let key = RemoteSigningConfig::new(args.key, SecretString::new(&args.token))
        .with_mount_path(args.mount)
        .with_tls(args.tls);

    let method = get_signing_method(VAULT_SIGNING_METHOD_NAME)
        .ok_or_else(|| eyre!("'{}' signing method is not registered", VAULT_SIGNING_METHOD_NAME))?;

    let now = now_timestamp();
    let claims = RegisteredClaims {
        sub: args.subject,
        iat: Some(now),
        exp: Some(now + args.ttl),
        ..RegisteredClaims::default()
    };

    let token = Token::new_with_claims(method, claims)
        .signed_string(&key)
        .await?;
    println!("{}", token);

    let parsed = parse_with_claims::<RegisteredClaims>(&token, &key).await?;
    println!("Verified token claims: {:?}", parsed.claims);

    Ok(())
}
