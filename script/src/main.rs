//! Circuit input CLI for JWT transaction validation.
//!
//! Subcommands:
//!   generate-input      - Assemble the main circuit's input JSON from a raw JWT
//!   create-nonce        - Derive the address-bound nonce for a recovery transaction
//!   digest              - Print the OIDC digest of a token and salt
//!   nonce-check-input   - Input JSON for the nonce gadget on its own
//!   digest-check-input  - Input JSON for the digest gadget on its own
//!
//! Every argument can also come from the environment (or a `.env` file).

use std::fs;
use std::str::FromStr;

use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jwt_tx_validation_lib::{
    create_nonce_v2, parse_integer, ByteVector, CircuitInput, DigestCheckInput,
    Jwt, JwtTxValidationInputs, NonceCheckInput, NonceContext, OidcDigest, ProtocolConfig,
};

#[derive(Parser)]
#[command(name = "jwt-tx-validation")]
#[command(about = "Circuit input generation for JWT-authorized transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the jwt-tx-validation circuit input
    GenerateInput {
        /// Compact ID token (header.payload.signature)
        #[arg(long, env = "RAW_JWT")]
        jwt: String,
        /// Base64url RSA modulus of the provider key (JWK `n`)
        #[arg(long, env = "JWK_MODULUS")]
        jwk_modulus: String,
        /// Hex-encoded user salt
        #[arg(long, env = "SALT")]
        salt: String,
        /// Hex-encoded 32-byte nonce content
        #[arg(long, env = "NONCE_CONTENT")]
        nonce_content: String,
        /// Decimal or 0x-hex blinding factor
        #[arg(long, env = "BLINDING_FACTOR")]
        blinding_factor: String,
        /// Path to write the input JSON
        #[arg(long)]
        output: String,
    },
    /// Derive the JWT nonce bound to a recovery transaction
    CreateNonce {
        /// Account being recovered
        sender: String,
        /// Contract the transaction calls
        target: String,
        /// Hash of the new passkey (hex, left-padded to 32 bytes)
        passkey_hash: String,
        /// Account nonce on the recovery contract
        contract_nonce: String,
        /// Decimal or 0x-hex blinding factor
        #[arg(long, env = "BLINDING_FACTOR")]
        blinding_factor: String,
        /// Unix timestamp after which the nonce is void
        #[arg(long, env = "TIMESTAMP_LIMIT")]
        timestamp_limit: String,
    },
    /// Print the OIDC digest of a token's iss/aud/sub and a salt
    Digest {
        /// Compact ID token (header.payload.signature)
        #[arg(long, env = "RAW_JWT")]
        jwt: String,
        /// Hex-encoded user salt
        #[arg(long, env = "SALT")]
        salt: String,
    },
    /// Input for the nonce commitment gadget
    NonceCheckInput {
        #[arg(long, env = "NONCE_CONTENT")]
        nonce_content: String,
        #[arg(long, env = "BLINDING_FACTOR")]
        blinding_factor: String,
        #[arg(long)]
        output: String,
    },
    /// Input for the OIDC digest gadget
    DigestCheckInput {
        #[arg(long)]
        iss: String,
        #[arg(long)]
        aud: String,
        #[arg(long)]
        sub: String,
        #[arg(long, env = "SALT")]
        salt: String,
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jwt_tx_validation=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateInput {
            jwt,
            jwk_modulus,
            salt,
            nonce_content,
            blinding_factor,
            output,
        } => {
            let inputs = JwtTxValidationInputs::new(
                &jwt,
                &jwk_modulus,
                &salt,
                &nonce_content,
                parse_blinding(&blinding_factor)?,
            )?;
            info!(
                iss = %inputs.jwt().claims().iss,
                kid = %inputs.jwt().claims().kid,
                "parsed token"
            );
            write_input("jwt-tx-validation", &inputs, &output)?;
        }
        Commands::CreateNonce {
            sender,
            target,
            passkey_hash,
            contract_nonce,
            blinding_factor,
            timestamp_limit,
        } => {
            let passkey = ByteVector::from_hex(&passkey_hash)
                .context("invalid passkey hash")?
                .pad_left(0, 32)
                .context("passkey hash longer than 32 bytes")?;
            let context = NonceContext {
                sender: Address::from_str(&sender).context("invalid sender address")?,
                target: Address::from_str(&target).context("invalid target address")?,
                passkey_hash: B256::from_slice(passkey.as_bytes()),
                contract_nonce: U256::from_str(&contract_nonce).context("invalid contract nonce")?,
                timestamp_limit: U256::from_str(&timestamp_limit)
                    .context("TIMESTAMP_LIMIT must be an integer")?,
            };
            let (content, nonce) =
                create_nonce_v2(&context, &parse_blinding(&blinding_factor)?, &ProtocolConfig::V1)?;
            println!("NONCE_CONTENT: {}", content);
            println!("JWT_NONCE: {}", nonce);
        }
        Commands::Digest { jwt, salt } => {
            let jwt = Jwt::parse(&jwt).context("invalid RAW_JWT")?;
            let salt = ByteVector::from_hex(&salt).context("invalid salt")?;
            let claims = jwt.claims();
            let digest = OidcDigest::new(&*claims.iss, &*claims.aud, &*claims.sub, salt)
                .serialize(&ProtocolConfig::V1)?;
            println!("OIDC_DIGEST: {}", digest);
        }
        Commands::NonceCheckInput {
            nonce_content,
            blinding_factor,
            output,
        } => {
            let input = NonceCheckInput::new(&nonce_content, parse_blinding(&blinding_factor)?);
            write_input("nonce-check", &input, &output)?;
        }
        Commands::DigestCheckInput {
            iss,
            aud,
            sub,
            salt,
            output,
        } => {
            let salt = ByteVector::from_hex(&salt).context("invalid salt")?;
            let input = DigestCheckInput::new(&iss, &aud, &sub, salt);
            write_input("digest-check", &input, &output)?;
        }
    }

    Ok(())
}

fn parse_blinding(value: &str) -> Result<BigUint> {
    parse_integer(value).context("BLINDING_FACTOR must be a decimal or 0x-hex integer")
}

fn write_input<T: CircuitInput>(name: &str, input: &T, output_path: &str) -> Result<()> {
    let signals = input
        .to_signals()
        .with_context(|| format!("failed to assemble {} input", name))?;
    fs::write(output_path, serde_json::to_string_pretty(&signals)?)?;
    println!("[{}] Input written to {}", name, output_path);
    Ok(())
}
