//! Error types for circuit input preparation.
//!
//! Every failure is terminal: nothing here is retried, and no partial
//! result is ever returned alongside an error.

use thiserror::Error;

/// Byte-level conversion failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    #[error("value {value} at index {index} is outside the byte range [0, 255]")]
    OutOfRange { index: usize, value: i64 },

    #[error("character with code point {code_point} at index {index} is not a single byte")]
    NonAscii { index: usize, code_point: u32 },

    #[error("hex string has odd length")]
    OddHexLength,

    #[error("invalid hex digit {character:?} at index {index}")]
    InvalidHexDigit { index: usize, character: char },

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid decimal byte {0:?}")]
    InvalidDecimal(String),

    #[error("cannot pad {current} bytes to shorter length {target}")]
    PadTooShort { current: usize, target: usize },
}

/// Field and limb transcoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("integer of {bits} bits does not fit in {capacity} limb bits")]
    LimbOverflow { bits: u64, capacity: u64 },

    #[error("{name} is not a canonical BN254 scalar")]
    FieldOverflow { name: &'static str },

    #[error("field element {index} does not fit in its {width}-byte chunk")]
    ChunkOverflow { index: usize, width: usize },

    #[error("nonce content must be exactly {expected} bytes, got {actual}")]
    ContentWidth { expected: usize, actual: usize },

    #[error("invalid integer {0:?}")]
    InvalidInteger(String),
}

/// Compact token decomposition failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT is missing its {0} segment")]
    MissingSegment(&'static str),

    #[error("JWT has {0} segments, expected 3")]
    TooManySegments(usize),

    #[error("JWT {segment} is not a JSON object: {reason}")]
    InvalidJson { segment: &'static str, reason: String },

    #[error("missing '{claim}' inside JWT {segment}")]
    MissingClaim { segment: &'static str, claim: &'static str },

    #[error("property '{claim}' inside JWT {segment} is not a string")]
    ClaimNotString { segment: &'static str, claim: &'static str },
}

/// Top-level error returned by the assemblers.
#[derive(Error, Debug)]
pub enum InputError {
    #[error(transparent)]
    Bytes(#[from] ByteError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("message too long: {length} padded bytes exceed the maximum of {max}")]
    MessageTooLong { length: usize, max: usize },

    #[error("nonce too long: {length} characters exceed the maximum of {max}")]
    NonceTooLong { length: usize, max: usize },

    #[error("claim '{claim}' is {length} bytes, maximum is {max}")]
    ClaimTooLong { claim: &'static str, length: usize, max: usize },

    #[error("missing {0} inside JWT payload")]
    ClaimKeyNotFound(String),

    #[error("poseidon hash failed: {0}")]
    Poseidon(#[from] light_poseidon::PoseidonError),
}

pub type Result<T, E = InputError> = core::result::Result<T, E>;
