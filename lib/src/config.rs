//! Protocol constants shared by every encoder in this crate.
//!
//! All bounds and chunk widths live in one versioned struct. A protocol
//! change means a new associated constant next to [`ProtocolConfig::V1`],
//! never an edit scattered across call sites.

use serde::{Deserialize, Serialize};

/// Fixed layout parameters of the `jwt-tx-validation` circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Layout revision. Bump when any field below changes.
    pub version: u32,
    /// Bytes packed into one BN254 field element (31 * 8 = 248 < 254 bits).
    pub field_bytes: usize,
    /// Bit width of one big-integer limb.
    pub limb_bits: usize,
    /// Limbs per RSA-2048 value (121 * 17 = 2057 bits).
    pub limb_count: usize,
    /// Size of the zero-filled SHA-256 message array.
    pub max_msg_length: usize,
    /// Number of 512-bit blocks in the bit-level message layout.
    pub max_sha_blocks: usize,
    /// Longest accepted `nonce` claim (32 bytes as padded base64url).
    pub max_b64_nonce_length: usize,
    pub iss_max_length: usize,
    pub aud_max_length: usize,
    pub sub_max_length: usize,
    /// Exact byte width of the nonce content hash.
    pub nonce_content_bytes: usize,
    /// Field elements the nonce content is packed into.
    pub nonce_content_fields: usize,
    /// Byte width of the nonce scalar before base64url encoding.
    pub nonce_bytes: usize,
}

impl ProtocolConfig {
    pub const V1: ProtocolConfig = ProtocolConfig {
        version: 1,
        field_bytes: 31,
        limb_bits: 121,
        limb_count: 17,
        max_msg_length: 1024,
        max_sha_blocks: 16,
        max_b64_nonce_length: 44,
        iss_max_length: 31,
        aud_max_length: 100,
        sub_max_length: 31,
        nonce_content_bytes: 32,
        nonce_content_fields: 2,
        nonce_bytes: 32,
    };

    /// Number of field elements needed to hold `bytes` bytes.
    pub const fn fields_for(&self, bytes: usize) -> usize {
        bytes.div_ceil(self.field_bytes)
    }

    /// Arity of the Poseidon call producing the OIDC digest:
    /// iss fields + aud fields + sub fields + salt.
    pub const fn digest_arity(&self) -> usize {
        self.fields_for(self.iss_max_length)
            + self.fields_for(self.aud_max_length)
            + self.fields_for(self.sub_max_length)
            + 1
    }

    /// Largest bit length representable by the limb layout.
    pub const fn limb_capacity_bits(&self) -> u64 {
        (self.limb_bits * self.limb_count) as u64
    }

    /// Zero-padded width of the nonce content before chunking.
    pub const fn nonce_content_padded_bytes(&self) -> usize {
        self.nonce_content_fields * self.field_bytes
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::V1
    }
}
