//! Field-element and limb transcoding.
//!
//! Two representations are produced for the circuit:
//! - field arrays: bytes packed `field_bytes` at a time into BN254 scalars,
//!   little-endian inside each chunk (the circuit unpacks byte 0 from the
//!   low bits);
//! - limb arrays: an arbitrary-precision integer cut into `limb_count`
//!   limbs of `limb_bits` bits, least significant limb first.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::BigUint;

use crate::byte_vector::ByteVector;
use crate::config::ProtocolConfig;
use crate::error::{CodecError, InputError};

/// Byte order used to read each chunk as an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    /// First byte of the chunk is the most significant.
    Big,
    /// First byte of the chunk is the least significant.
    Little,
}

// =============================================================================
//                              CHUNKING
// =============================================================================

/// Split `bytes` into consecutive `chunk_size` groups and read each as an
/// integer. The last group may be shorter.
pub fn chunk(
    bytes: &ByteVector,
    chunk_size: usize,
    order: Endianness,
) -> Result<Vec<BigUint>, CodecError> {
    if chunk_size == 0 {
        return Err(CodecError::ZeroChunkSize);
    }
    Ok(bytes
        .as_bytes()
        .chunks(chunk_size)
        .map(|group| match order {
            Endianness::Big => BigUint::from_bytes_be(group),
            Endianness::Little => BigUint::from_bytes_le(group),
        })
        .collect())
}

/// Pack bytes into field elements the way the circuit unpacks them.
pub fn to_field_array(bytes: &ByteVector, cfg: &ProtocolConfig) -> Result<Vec<BigUint>, CodecError> {
    chunk(bytes, cfg.field_bytes, Endianness::Little)
}

/// Inverse of [`to_field_array`] for a known total byte length.
pub fn from_field_array(
    fields: &[BigUint],
    total_len: usize,
    cfg: &ProtocolConfig,
) -> Result<ByteVector, CodecError> {
    let mut out = Vec::with_capacity(total_len);
    for (index, field) in fields.iter().enumerate() {
        let width = cfg.field_bytes.min(total_len.saturating_sub(index * cfg.field_bytes));
        if field.bits() > (width as u64) * 8 {
            return Err(CodecError::ChunkOverflow { index, width });
        }
        let mut le = field.to_bytes_le();
        le.resize(width, 0);
        out.extend_from_slice(&le);
    }
    Ok(ByteVector::new(out))
}

// =============================================================================
//                              LIMBS
// =============================================================================

/// Cut `n` into `limb_count` limbs of `limb_bits` bits, least significant
/// first. Fails when `n` needs more bits than the layout holds.
pub fn to_limbs(n: &BigUint, limb_bits: usize, limb_count: usize) -> Result<Vec<BigUint>, CodecError> {
    let capacity = (limb_bits * limb_count) as u64;
    if n.bits() > capacity {
        return Err(CodecError::LimbOverflow {
            bits: n.bits(),
            capacity,
        });
    }
    let mask = (BigUint::from(1u8) << limb_bits) - 1u8;
    Ok((0..limb_count)
        .map(|i| (n >> (i * limb_bits)) & &mask)
        .collect())
}

/// Sum of limb_i * 2^(i * limb_bits).
pub fn from_limbs(limbs: &[BigUint], limb_bits: usize) -> BigUint {
    limbs
        .iter()
        .enumerate()
        .fold(BigUint::from(0u8), |acc, (i, limb)| acc + (limb << (i * limb_bits)))
}

/// An RSA-sized integer in the circuit's big-integer limb layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircomBigInt {
    value: BigUint,
}

impl CircomBigInt {
    pub fn new(value: BigUint) -> Self {
        CircomBigInt { value }
    }

    /// Read a base64 / base64url encoded big-endian integer (JWK modulus,
    /// JWT signature).
    pub fn from_base64(data: &str) -> Result<Self, InputError> {
        Ok(Self::from_byte_vector(&ByteVector::from_base64_url(data)?))
    }

    pub fn from_byte_vector(bytes: &ByteVector) -> Self {
        CircomBigInt {
            value: bytes.to_biguint(),
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn limbs(&self, cfg: &ProtocolConfig) -> Result<Vec<BigUint>, CodecError> {
        to_limbs(&self.value, cfg.limb_bits, cfg.limb_count)
    }

    /// Limbs as decimal strings.
    pub fn serialize(&self, cfg: &ProtocolConfig) -> Result<Vec<String>, CodecError> {
        Ok(self.limbs(cfg)?.iter().map(ToString::to_string).collect())
    }
}

// =============================================================================
//                              BN254 SCALARS
// =============================================================================

/// Order of the BN254 scalar field.
pub fn bn254_modulus() -> BigUint {
    Fr::MODULUS.into()
}

/// Convert to a field element, rejecting non-canonical values instead of
/// reducing them.
pub fn to_scalar(name: &'static str, value: &BigUint) -> Result<Fr, CodecError> {
    if *value >= bn254_modulus() {
        return Err(CodecError::FieldOverflow { name });
    }
    Ok(Fr::from(value.clone()))
}

pub fn scalar_to_biguint(value: Fr) -> BigUint {
    value.into_bigint().into()
}

/// Parse a decimal or `0x`-prefixed hex integer.
pub fn parse_integer(data: &str) -> Result<BigUint, CodecError> {
    let trimmed = data.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(digits) => BigUint::parse_bytes(digits.as_bytes(), 16),
        None => BigUint::parse_bytes(trimmed.as_bytes(), 10),
    };
    parsed.ok_or_else(|| CodecError::InvalidInteger(data.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_big_endian() {
        let bytes = ByteVector::new(vec![1, 2, 3, 4, 5]);
        let chunks = chunk(&bytes, 2, Endianness::Big).unwrap();
        assert_eq!(
            chunks,
            vec![
                BigUint::from(0x0102u32),
                BigUint::from(0x0304u32),
                BigUint::from(5u32)
            ]
        );
        assert_eq!(chunk(&bytes, 0, Endianness::Big), Err(CodecError::ZeroChunkSize));
    }

    #[test]
    fn test_field_array_pinned_vector() {
        let cfg = ProtocolConfig::V1;
        // "abc" is read little-endian: 0x636261.
        let fields = to_field_array(&ByteVector::from_ascii("abc").unwrap(), &cfg).unwrap();
        assert_eq!(fields, vec![BigUint::from(6513249u32)]);

        // Bytes 1..=32: first chunk holds 1..=31 little-endian, second holds 32.
        let bytes = ByteVector::new((1..=32).collect());
        let fields = to_field_array(&bytes, &cfg).unwrap();
        assert_eq!(fields.len(), 2);
        let expected_first = BigUint::from_bytes_le(&(1..=31).collect::<Vec<u8>>());
        assert_eq!(fields[0], expected_first);
        assert_eq!(fields[1], BigUint::from(32u32));
    }

    #[test]
    fn test_trailing_zero_padding_does_not_change_fields() {
        let cfg = ProtocolConfig::V1;
        let bytes = ByteVector::new((1..=32).collect());
        let padded = bytes.pad_right(0, 62).unwrap();
        assert_eq!(
            to_field_array(&bytes, &cfg).unwrap(),
            to_field_array(&padded, &cfg).unwrap()
        );
    }

    #[test]
    fn test_field_array_reconstruction() {
        let cfg = ProtocolConfig::V1;
        let bytes = ByteVector::new((0..100).map(|i| (i * 7 % 256) as u8).collect());
        let fields = to_field_array(&bytes, &cfg).unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(from_field_array(&fields, bytes.len(), &cfg).unwrap(), bytes);
    }

    #[test]
    fn test_from_field_array_rejects_wide_chunk() {
        let cfg = ProtocolConfig::V1;
        let fields = vec![BigUint::from(0x1_0000u32)];
        assert_eq!(
            from_field_array(&fields, 2, &cfg),
            Err(CodecError::ChunkOverflow { index: 0, width: 2 })
        );
    }

    #[test]
    fn test_limbs_round_trip() {
        let n = (BigUint::from(1u8) << 2047) + BigUint::from(12345u32);
        let limbs = to_limbs(&n, 121, 17).unwrap();
        assert_eq!(limbs.len(), 17);
        assert!(limbs.iter().all(|l| l.bits() <= 121));
        assert_eq!(limbs[0], BigUint::from(12345u32));
        assert_eq!(from_limbs(&limbs, 121), n);
    }

    #[test]
    fn test_limbs_overflow() {
        let n = BigUint::from(1u8) << (121 * 17);
        assert_eq!(
            to_limbs(&n, 121, 17),
            Err(CodecError::LimbOverflow {
                bits: 2058,
                capacity: 2057
            })
        );
    }

    #[test]
    fn test_circom_big_int_from_base64() {
        // 0x010001 = 65537
        let value = CircomBigInt::from_base64("AQAB").unwrap();
        assert_eq!(value.value(), &BigUint::from(65537u32));
        let limbs = value.serialize(&ProtocolConfig::V1).unwrap();
        assert_eq!(limbs[0], "65537");
        assert!(limbs[1..].iter().all(|l| l == "0"));
    }

    #[test]
    fn test_scalar_bounds() {
        let r = bn254_modulus();
        assert_eq!(
            r.to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
        assert!(to_scalar("salt", &(&r - 1u8)).is_ok());
        assert_eq!(
            to_scalar("salt", &r),
            Err(CodecError::FieldOverflow { name: "salt" })
        );
        let x = BigUint::from(987654321u64);
        assert_eq!(scalar_to_biguint(to_scalar("x", &x).unwrap()), x);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("255").unwrap(), BigUint::from(255u32));
        assert_eq!(parse_integer("0xff").unwrap(), BigUint::from(255u32));
        assert!(parse_integer("12a").is_err());
    }
}
