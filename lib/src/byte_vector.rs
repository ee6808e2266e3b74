//! Immutable byte sequences and their textual / integer encodings.
//!
//! `ByteVector` is the value every other encoder in the crate consumes.
//! Operations that "modify" it (padding, appending, reversing) return a
//! new vector.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};
use num_bigint::BigUint;

use crate::error::ByteError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteVector(Vec<u8>);

// =============================================================================
//                              CONSTRUCTION
// =============================================================================

impl ByteVector {
    pub fn new(bytes: Vec<u8>) -> Self {
        ByteVector(bytes)
    }

    /// Build from arbitrary integers, rejecting anything outside [0, 255].
    pub fn from_values<I>(values: I) -> Result<Self, ByteError>
    where
        I: IntoIterator<Item = i64>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| u8::try_from(value).map_err(|_| ByteError::OutOfRange { index, value }))
            .collect::<Result<Vec<_>, _>>()
            .map(ByteVector)
    }

    /// Parse the per-byte decimal signal format back into bytes.
    pub fn from_decimal_strings<S: AsRef<str>>(values: &[S]) -> Result<Self, ByteError> {
        let parsed = values
            .iter()
            .map(|s| {
                s.as_ref()
                    .parse::<i64>()
                    .map_err(|_| ByteError::InvalidDecimal(s.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(parsed)
    }

    /// One byte per character code. Code points above 255 are rejected.
    pub fn from_ascii(data: &str) -> Result<Self, ByteError> {
        data.chars()
            .enumerate()
            .map(|(index, c)| {
                u8::try_from(u32::from(c)).map_err(|_| ByteError::NonAscii {
                    index,
                    code_point: u32::from(c),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ByteVector)
    }

    /// Decode hex, with or without a `0x` prefix.
    pub fn from_hex(data: &str) -> Result<Self, ByteError> {
        let digits = data.strip_prefix("0x").unwrap_or(data);
        hex::decode(digits).map(ByteVector).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => ByteError::InvalidHexDigit {
                index,
                character: c,
            },
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                ByteError::OddHexLength
            }
        })
    }

    /// Decode base64url (or plain base64), padded or not.
    ///
    /// The URL-safe alphabet is translated to the standard one and the
    /// input is `=`-padded to a multiple of 4 before decoding.
    pub fn from_base64_url(data: &str) -> Result<Self, ByteError> {
        let mut standard: String = data
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();
        while standard.len() % 4 != 0 {
            standard.push('=');
        }
        STANDARD
            .decode(standard.as_bytes())
            .map(ByteVector)
            .map_err(|e| ByteError::InvalidBase64(e.to_string()))
    }

    /// Big-endian bytes of `n`. Zero yields an empty vector; callers that
    /// need a fixed width must pad.
    pub fn from_biguint(n: &BigUint) -> Self {
        if n.bits() == 0 {
            return ByteVector(Vec::new());
        }
        ByteVector(n.to_bytes_be())
    }
}

impl From<Vec<u8>> for ByteVector {
    fn from(bytes: Vec<u8>) -> Self {
        ByteVector(bytes)
    }
}

impl From<&[u8]> for ByteVector {
    fn from(bytes: &[u8]) -> Self {
        ByteVector(bytes.to_vec())
    }
}

// =============================================================================
//                              TRANSFORMS
// =============================================================================

impl ByteVector {
    pub fn pad_left(&self, fill: u8, target_len: usize) -> Result<Self, ByteError> {
        if target_len < self.0.len() {
            return Err(ByteError::PadTooShort {
                current: self.0.len(),
                target: target_len,
            });
        }
        let mut bytes = vec![fill; target_len - self.0.len()];
        bytes.extend_from_slice(&self.0);
        Ok(ByteVector(bytes))
    }

    pub fn pad_right(&self, fill: u8, target_len: usize) -> Result<Self, ByteError> {
        if target_len < self.0.len() {
            return Err(ByteError::PadTooShort {
                current: self.0.len(),
                target: target_len,
            });
        }
        let mut bytes = self.0.clone();
        bytes.resize(target_len, fill);
        Ok(ByteVector(bytes))
    }

    pub fn append(&self, other: &ByteVector) -> Self {
        let mut bytes = Vec::with_capacity(self.0.len() + other.0.len());
        bytes.extend_from_slice(&self.0);
        bytes.extend_from_slice(&other.0);
        ByteVector(bytes)
    }

    pub fn reverse(&self) -> Self {
        ByteVector(self.0.iter().rev().copied().collect())
    }

    /// Byte offset of the first occurrence of `needle`.
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return Some(0);
        }
        self.0.windows(needle.len()).position(|window| window == needle)
    }
}

// =============================================================================
//                              ENCODINGS
// =============================================================================

impl ByteVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Big-endian interpretation: sum of byte_i * 256^(len-1-i). Empty is 0.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// URL-safe alphabet, `=`-padded (32 bytes encode to 44 characters).
    pub fn to_base64_url(&self) -> String {
        URL_SAFE.encode(&self.0)
    }

    /// Each byte mapped to the character with the same code point.
    pub fn to_ascii_string(&self) -> String {
        self.0.iter().map(|&b| char::from(b)).collect()
    }

    /// Each byte as its decimal string, the per-byte circuit signal format.
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.0.iter().map(|b| b.to_string()).collect()
    }

    /// Each byte as 8 bits, most significant first.
    pub fn to_bits(&self) -> Vec<u8> {
        self.0
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
            .collect()
    }
}
