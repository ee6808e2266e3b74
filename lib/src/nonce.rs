//! Transaction-bound JWT nonces.
//!
//!   nonce = Poseidon(content_fields[0], content_fields[1], blinding)
//!   jwt_nonce = base64url(be_bytes_32(nonce))
//!
//! The address-bound variant first derives the content as
//!   content = keccak256(abi.encode(sender, target, passkeyHash, contractNonce, timestampLimit))
//! so a nonce cannot be replayed for another account or operation.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolValue;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::byte_vector::ByteVector;
use crate::codec::{to_field_array, to_scalar};
use crate::config::ProtocolConfig;
use crate::digest::poseidon_hash;
use crate::error::{CodecError, InputError};
use crate::keccak256;

/// Pack the nonce content into exactly `nonce_content_fields` elements.
///
/// Content must be `nonce_content_bytes` wide; it is zero-padded on the
/// right to a whole number of fields before chunking.
pub fn nonce_content_fields(content: &ByteVector, cfg: &ProtocolConfig) -> Result<Vec<BigUint>, InputError> {
    if content.len() != cfg.nonce_content_bytes {
        return Err(CodecError::ContentWidth {
            expected: cfg.nonce_content_bytes,
            actual: content.len(),
        }
        .into());
    }
    let padded = content.pad_right(0, cfg.nonce_content_padded_bytes())?;
    let fields = to_field_array(&padded, cfg)?;
    debug_assert_eq!(fields.len(), cfg.nonce_content_fields);
    Ok(fields)
}

/// Poseidon(content fields ++ [blinding]) as an integer.
pub fn create_nonce(content_hex: &str, blinding: &BigUint, cfg: &ProtocolConfig) -> Result<BigUint, InputError> {
    let mut inputs = nonce_content_fields(&ByteVector::from_hex(content_hex)?, cfg)?;
    to_scalar("blinding factor", blinding)?;
    inputs.push(blinding.clone());
    poseidon_hash(&inputs)
}

/// Big-endian bytes, left-padded to `nonce_bytes`, as padded base64url.
pub fn encode_nonce(nonce: &BigUint, cfg: &ProtocolConfig) -> Result<String, InputError> {
    Ok(ByteVector::from_biguint(nonce)
        .pad_left(0, cfg.nonce_bytes)?
        .to_base64_url())
}

/// The string placed in the token's `nonce` claim.
pub fn create_nonce_b64(content_hex: &str, blinding: &BigUint, cfg: &ProtocolConfig) -> Result<String, InputError> {
    encode_nonce(&create_nonce(content_hex, blinding, cfg)?, cfg)
}

/// Recompute the nonce and compare it with the one found in a token.
pub fn verify_nonce(
    b64_nonce: &str,
    content_hex: &str,
    blinding: &BigUint,
    cfg: &ProtocolConfig,
) -> Result<bool, InputError> {
    let presented = ByteVector::from_base64_url(b64_nonce)?.to_biguint();
    Ok(presented == create_nonce(content_hex, blinding, cfg)?)
}

// =============================================================================
//                          ADDRESS-BOUND NONCE
// =============================================================================

/// Everything the recovery transaction commits to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceContext {
    pub sender: Address,
    pub target: Address,
    pub passkey_hash: B256,
    pub contract_nonce: U256,
    pub timestamp_limit: U256,
}

impl NonceContext {
    /// abi.encode(address, address, bytes32, uint256, uint256): 5 static words.
    pub fn abi_encode(&self) -> Vec<u8> {
        (
            self.sender,
            self.target,
            self.passkey_hash,
            self.contract_nonce,
            self.timestamp_limit,
        )
            .abi_encode_params()
    }

    pub fn content_hash(&self) -> [u8; 32] {
        keccak256(&self.abi_encode())
    }
}

/// Returns `(content_hash_hex, jwt_nonce)`.
pub fn create_nonce_v2(
    context: &NonceContext,
    blinding: &BigUint,
    cfg: &ProtocolConfig,
) -> Result<(String, String), InputError> {
    let content_hex = ByteVector::from(&context.content_hash()[..]).to_hex();
    let jwt_nonce = create_nonce_b64(&content_hex, blinding, cfg)?;
    debug!(sender = %context.sender, target = %context.target, content = %content_hex, "derived address-bound nonce");
    Ok((content_hex, jwt_nonce))
}
