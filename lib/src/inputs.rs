//! Circuit input assembly.
//!
//! Every signal is a decimal string (or an array of them): that is how the
//! witness generator reads BN254 scalars from JSON. Key names and array
//! lengths are part of the circuit's interface and must not drift.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::byte_vector::ByteVector;
use crate::codec::{to_scalar, CircomBigInt};
use crate::config::ProtocolConfig;
use crate::digest::{padded_claim, OidcDigest};
use crate::error::InputError;
use crate::jwt::Jwt;
use crate::nonce::{create_nonce_b64, nonce_content_fields};
use crate::sha::PaddedMessage;

/// Anything that can be turned into a JSON object of circuit signals.
pub trait CircuitInput {
    type Signals: Serialize;

    fn to_signals(&self) -> Result<Self::Signals, InputError>;
}

fn decimal_strings(values: &[BigUint]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// =============================================================================
//                      JWT TRANSACTION VALIDATION
// =============================================================================

/// Signals of the main `jwt-tx-validation` circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtTxValidationData {
    pub message: Vec<String>,
    pub message_length: String,
    pub pubkey: Vec<String>,
    pub signature: Vec<String>,
    pub period_index: String,
    pub nonce_key_start_index: String,
    pub nonce_length: String,
    pub iss_key_start_index: String,
    pub iss_length: String,
    pub expected_iss: Vec<String>,
    pub aud_key_start_index: String,
    pub aud_length: String,
    pub expected_aud: Vec<String>,
    pub sub_key_start_index: String,
    pub sub_length: String,
    pub salt: String,
    pub oidc_digest: String,
    pub nonce_content_hash: Vec<String>,
    pub blinding_factor: String,
}

/// The five raw inputs of the main circuit.
#[derive(Clone, Debug)]
pub struct JwtTxValidationInputs {
    jwt: Jwt,
    jwk_modulus: String,
    salt: ByteVector,
    nonce_content: ByteVector,
    blinding: BigUint,
    config: ProtocolConfig,
}

impl JwtTxValidationInputs {
    /// Parse and validate the token and hex inputs. Assembly itself happens
    /// in [`CircuitInput::to_signals`].
    pub fn new(
        raw_jwt: &str,
        jwk_modulus: &str,
        salt_hex: &str,
        nonce_content_hex: &str,
        blinding: BigUint,
    ) -> Result<Self, InputError> {
        Ok(JwtTxValidationInputs {
            jwt: Jwt::parse(raw_jwt)?,
            jwk_modulus: jwk_modulus.to_string(),
            salt: ByteVector::from_hex(salt_hex)?,
            nonce_content: ByteVector::from_hex(nonce_content_hex)?,
            blinding,
            config: ProtocolConfig::V1,
        })
    }

    pub fn with_config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }

    pub fn jwt(&self) -> &Jwt {
        &self.jwt
    }

    fn message(&self) -> Result<PaddedMessage, InputError> {
        let message = ByteVector::from_ascii(&self.jwt.message_for_signing())?;
        PaddedMessage::new(&message, self.config.max_msg_length)
    }

    fn nonce_length(&self) -> Result<usize, InputError> {
        let length = ByteVector::from_ascii(&self.jwt.claims().nonce)?.len();
        if length > self.config.max_b64_nonce_length {
            return Err(InputError::NonceTooLong {
                length,
                max: self.config.max_b64_nonce_length,
            });
        }
        Ok(length)
    }

    fn claim_length(claim: &'static str, value: &str, max: usize) -> Result<usize, InputError> {
        let length = ByteVector::from_ascii(value)?.len();
        if length > max {
            return Err(InputError::ClaimTooLong { claim, length, max });
        }
        Ok(length)
    }
}

impl CircuitInput for JwtTxValidationInputs {
    type Signals = JwtTxValidationData;

    fn to_signals(&self) -> Result<JwtTxValidationData, InputError> {
        let cfg = &self.config;
        let claims = self.jwt.claims();

        let message = self.message()?;
        debug!(
            message_length = message.message_length(),
            padded_length = message.padded_length(),
            "padded signed message"
        );

        let pubkey = CircomBigInt::from_base64(&self.jwk_modulus)?.serialize(cfg)?;
        let signature = CircomBigInt::from_base64(self.jwt.signature())?.serialize(cfg)?;

        let nonce_key_start_index = self.jwt.claim_key_offset("nonce")?;
        let iss_key_start_index = self.jwt.claim_key_offset("iss")?;
        let aud_key_start_index = self.jwt.claim_key_offset("aud")?;
        let sub_key_start_index = self.jwt.claim_key_offset("sub")?;
        debug!(
            nonce_key_start_index,
            iss_key_start_index, aud_key_start_index, sub_key_start_index, "located claim keys"
        );

        let nonce_length = self.nonce_length()?;
        let iss_length = Self::claim_length("iss", &claims.iss, cfg.iss_max_length)?;
        let aud_length = Self::claim_length("aud", &claims.aud, cfg.aud_max_length)?;
        let sub_length = Self::claim_length("sub", &claims.sub, cfg.sub_max_length)?;

        let expected_iss = padded_claim("iss", &claims.iss, cfg.iss_max_length)?;
        let expected_aud = padded_claim("aud", &claims.aud, cfg.aud_max_length)?;

        let oidc_digest = OidcDigest::new(&*claims.iss, &*claims.aud, &*claims.sub, self.salt.clone())
            .serialize(cfg)?;

        let nonce_content_hash = nonce_content_fields(&self.nonce_content, cfg)?;
        to_scalar("blinding factor", &self.blinding)?;

        Ok(JwtTxValidationData {
            message: message.bytes().to_decimal_strings(),
            message_length: message.padded_length().to_string(),
            pubkey,
            signature,
            period_index: self.jwt.period_index().to_string(),
            nonce_key_start_index: nonce_key_start_index.to_string(),
            nonce_length: nonce_length.to_string(),
            iss_key_start_index: iss_key_start_index.to_string(),
            iss_length: iss_length.to_string(),
            expected_iss: expected_iss.to_decimal_strings(),
            aud_key_start_index: aud_key_start_index.to_string(),
            aud_length: aud_length.to_string(),
            expected_aud: expected_aud.to_decimal_strings(),
            sub_key_start_index: sub_key_start_index.to_string(),
            sub_length: sub_length.to_string(),
            salt: self.salt.to_biguint().to_string(),
            oidc_digest,
            nonce_content_hash: decimal_strings(&nonce_content_hash),
            blinding_factor: self.blinding.to_string(),
        })
    }
}

// =============================================================================
//                          GADGET TEST INPUTS
// =============================================================================

/// Signals for the nonce-commitment gadget on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceCheckData {
    pub b64_nonce: Vec<String>,
    pub blinding_factor: String,
    pub nonce_content: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct NonceCheckInput {
    nonce_content_hex: String,
    blinding: BigUint,
    config: ProtocolConfig,
}

impl NonceCheckInput {
    pub fn new(nonce_content_hex: &str, blinding: BigUint) -> Self {
        NonceCheckInput {
            nonce_content_hex: nonce_content_hex.to_string(),
            blinding,
            config: ProtocolConfig::V1,
        }
    }

    pub fn with_config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }
}

impl CircuitInput for NonceCheckInput {
    type Signals = NonceCheckData;

    fn to_signals(&self) -> Result<NonceCheckData, InputError> {
        let cfg = &self.config;
        let nonce = create_nonce_b64(&self.nonce_content_hex, &self.blinding, cfg)?;
        let content = ByteVector::from_hex(&self.nonce_content_hex)?;
        Ok(NonceCheckData {
            b64_nonce: ByteVector::from_ascii(&nonce)?
                .pad_right(0, cfg.max_b64_nonce_length)?
                .to_decimal_strings(),
            blinding_factor: self.blinding.to_string(),
            nonce_content: decimal_strings(&nonce_content_fields(&content, cfg)?),
        })
    }
}

/// Signals for the OIDC digest gadget on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestCheckData {
    pub expected_iss: Vec<String>,
    pub expected_aud: Vec<String>,
    pub expected_sub: Vec<String>,
    pub salt: String,
    pub oidc_digest: String,
}

#[derive(Clone, Debug)]
pub struct DigestCheckInput {
    iss: String,
    aud: String,
    sub: String,
    salt: ByteVector,
    config: ProtocolConfig,
}

impl DigestCheckInput {
    pub fn new(iss: &str, aud: &str, sub: &str, salt: ByteVector) -> Self {
        DigestCheckInput {
            iss: iss.to_string(),
            aud: aud.to_string(),
            sub: sub.to_string(),
            salt,
            config: ProtocolConfig::V1,
        }
    }

    pub fn with_config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }
}

impl CircuitInput for DigestCheckInput {
    type Signals = DigestCheckData;

    fn to_signals(&self) -> Result<DigestCheckData, InputError> {
        let cfg = &self.config;
        Ok(DigestCheckData {
            expected_iss: padded_claim("iss", &self.iss, cfg.iss_max_length)?.to_decimal_strings(),
            expected_aud: padded_claim("aud", &self.aud, cfg.aud_max_length)?.to_decimal_strings(),
            expected_sub: padded_claim("sub", &self.sub, cfg.sub_max_length)?.to_decimal_strings(),
            salt: self.salt.to_biguint().to_string(),
            oidc_digest: OidcDigest::new(&*self.iss, &*self.aud, &*self.sub, self.salt.clone())
                .serialize(cfg)?,
        })
    }
}
