//! OIDC digest: a Poseidon commitment to (iss, aud, sub, salt).
//!
//! digest = Poseidon(iss_fields ++ aud_fields ++ sub_fields ++ [salt])
//!
//! Each claim is zero-padded to its protocol maximum and packed with
//! [`to_field_array`], so the arity is fixed (7 under V1).

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use num_bigint::BigUint;
use tracing::trace;

use crate::byte_vector::ByteVector;
use crate::codec::{scalar_to_biguint, to_field_array, to_scalar};
use crate::config::ProtocolConfig;
use crate::error::InputError;

// =============================================================================
//                              POSEIDON
// =============================================================================

/// circomlib-compatible Poseidon over BN254 with arity `inputs.len()`.
///
/// Every input must already be a canonical scalar.
pub fn poseidon_hash(inputs: &[BigUint]) -> Result<BigUint, InputError> {
    let scalars = inputs
        .iter()
        .map(|value| to_scalar("poseidon input", value))
        .collect::<Result<Vec<Fr>, _>>()?;
    let mut hasher = Poseidon::<Fr>::new_circom(scalars.len())?;
    let hash = hasher.hash(&scalars)?;
    Ok(scalar_to_biguint(hash))
}

// =============================================================================
//                              CLAIM PACKING
// =============================================================================

/// ASCII bytes of a claim, zero-padded to `max_length`.
pub fn padded_claim(claim: &'static str, value: &str, max_length: usize) -> Result<ByteVector, InputError> {
    let bytes = ByteVector::from_ascii(value)?;
    if bytes.len() > max_length {
        return Err(InputError::ClaimTooLong {
            claim,
            length: bytes.len(),
            max: max_length,
        });
    }
    Ok(bytes.pad_right(0, max_length)?)
}

/// A padded claim packed into field elements.
pub fn claim_fields(
    claim: &'static str,
    value: &str,
    max_length: usize,
    cfg: &ProtocolConfig,
) -> Result<Vec<BigUint>, InputError> {
    Ok(to_field_array(&padded_claim(claim, value, max_length)?, cfg)?)
}

// =============================================================================
//                              DIGEST
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OidcDigest {
    iss: String,
    aud: String,
    sub: String,
    salt: ByteVector,
}

impl OidcDigest {
    pub fn new(iss: impl Into<String>, aud: impl Into<String>, sub: impl Into<String>, salt: ByteVector) -> Self {
        OidcDigest {
            iss: iss.into(),
            aud: aud.into(),
            sub: sub.into(),
            salt,
        }
    }

    /// The Poseidon inputs in circuit order: [iss, aud.., sub, salt].
    pub fn fields(&self, cfg: &ProtocolConfig) -> Result<Vec<BigUint>, InputError> {
        let salt = self.salt.to_biguint();
        to_scalar("salt", &salt)?;

        let mut fields = claim_fields("iss", &self.iss, cfg.iss_max_length, cfg)?;
        fields.extend(claim_fields("aud", &self.aud, cfg.aud_max_length, cfg)?);
        fields.extend(claim_fields("sub", &self.sub, cfg.sub_max_length, cfg)?);
        fields.push(salt);
        debug_assert_eq!(fields.len(), cfg.digest_arity());
        Ok(fields)
    }

    pub fn to_biguint(&self, cfg: &ProtocolConfig) -> Result<BigUint, InputError> {
        let fields = self.fields(cfg)?;
        trace!(arity = fields.len(), "hashing oidc digest");
        poseidon_hash(&fields)
    }

    /// Decimal string, the circuit's scalar format.
    pub fn serialize(&self, cfg: &ProtocolConfig) -> Result<String, InputError> {
        Ok(self.to_biguint(cfg)?.to_string())
    }
}
