//! Input encoding for the JWT transaction-validation circuit.
//!
//! Turns an OIDC ID token, the provider's RSA modulus and a handful of
//! prover secrets into the JSON signals a Circom witness generator expects:
//! byte arrays as decimal strings, big integers as 121-bit limbs, and
//! commitments as BN254 Poseidon hashes.

pub mod byte_vector;
pub mod codec;
pub mod config;
pub mod digest;
pub mod error;
pub mod inputs;
pub mod jwt;
pub mod nonce;
pub mod sha;

pub use byte_vector::ByteVector;
pub use codec::{
    bn254_modulus, chunk, from_field_array, from_limbs, parse_integer, to_field_array, to_limbs,
    CircomBigInt, Endianness,
};
pub use config::ProtocolConfig;
pub use digest::{poseidon_hash, OidcDigest};
pub use error::{ByteError, CodecError, InputError, TokenError};
pub use inputs::{
    CircuitInput, DigestCheckData, DigestCheckInput, JwtTxValidationData, JwtTxValidationInputs,
    NonceCheckData, NonceCheckInput,
};
pub use jwt::{Jwt, JwtClaims};
pub use nonce::{create_nonce, create_nonce_b64, create_nonce_v2, verify_nonce, NonceContext};
pub use sha::{sha256_pad, BitBlocks, PaddedMessage};

use tiny_keccak::{Hasher, Keccak};

// =============================================================================
//                          KECCAK256 HELPERS
// =============================================================================

/// Compute keccak256 hash. This matches Solidity's keccak256() opcode.
/// Note: tiny_keccak::Keccak is the original Keccak-256 (NOT SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}
