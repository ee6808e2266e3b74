//! SHA-256 message padding (RFC 4634 §4.1), computed outside the circuit.
//!
//! The circuit runs the compression function over a fixed-size byte array,
//! so the prover supplies the already padded message plus the number of
//! bytes that are real message-and-padding rather than trailing filler.

use tracing::trace;

use crate::byte_vector::ByteVector;
use crate::error::InputError;

const BLOCK_BYTES: usize = 64;
const LENGTH_OFFSET: usize = 56;

/// Append `0x80`, zero-fill to 56 mod 64, then the 64-bit big-endian bit
/// length of the original message.
pub fn sha256_pad(message: &ByteVector) -> ByteVector {
    let bit_length = (message.len() as u64) * 8;

    let mut bytes = message.as_bytes().to_vec();
    bytes.push(0x80);
    while bytes.len() % BLOCK_BYTES != LENGTH_OFFSET {
        bytes.push(0);
    }
    bytes.extend_from_slice(&bit_length.to_be_bytes());
    ByteVector::new(bytes)
}

/// A SHA-256 padded message zero-filled to the circuit's fixed width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedMessage {
    bytes: ByteVector,
    padded_length: usize,
    message_length: usize,
}

impl PaddedMessage {
    /// Pad `message` and zero-fill to `max_length` bytes.
    pub fn new(message: &ByteVector, max_length: usize) -> Result<Self, InputError> {
        let padded = sha256_pad(message);
        let padded_length = padded.len();
        if padded_length > max_length {
            return Err(InputError::MessageTooLong {
                length: padded_length,
                max: max_length,
            });
        }
        trace!(message_length = message.len(), padded_length, "sha256 padded message");
        Ok(PaddedMessage {
            bytes: padded.pad_right(0, max_length)?,
            padded_length,
            message_length: message.len(),
        })
    }

    /// The full fixed-width array, filler included.
    pub fn bytes(&self) -> &ByteVector {
        &self.bytes
    }

    /// Length of message plus SHA padding, before filler.
    pub fn padded_length(&self) -> usize {
        self.padded_length
    }

    pub fn message_length(&self) -> usize {
        self.message_length
    }

    /// Lay the padded message out as `max_blocks` blocks of 512 bits.
    pub fn to_bit_blocks(&self, max_blocks: usize) -> Result<BitBlocks, InputError> {
        let used_blocks = self.padded_length / BLOCK_BYTES;
        if used_blocks > max_blocks {
            return Err(InputError::MessageTooLong {
                length: self.padded_length,
                max: max_blocks * BLOCK_BYTES,
            });
        }
        let mut blocks: Vec<Vec<u8>> = self.bytes.as_bytes()[..self.padded_length]
            .chunks(BLOCK_BYTES)
            .map(|block| ByteVector::from(block).to_bits())
            .collect();
        blocks.resize(max_blocks, vec![0; BLOCK_BYTES * 8]);
        Ok(BitBlocks {
            blocks,
            final_block: used_blocks,
        })
    }
}

/// Bit-level message layout for circuits that take 512-bit blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitBlocks {
    pub blocks: Vec<Vec<u8>>,
    /// 1-based index of the block holding the encoded length.
    pub final_block: usize,
}

impl BitBlocks {
    pub fn to_signals(&self) -> Vec<Vec<String>> {
        self.blocks
            .iter()
            .map(|block| block.iter().map(|bit| bit.to_string()).collect())
            .collect()
    }
}
