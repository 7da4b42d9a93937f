use rayon::prelude::*;

use super::error::DecodeError;

/// Splits a capture buffer into its header and payload.
pub struct PayloadReader<'a> {
    buffer: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    fn require_len(&self, needed: u64) -> Result<(), DecodeError> {
        let actual = self.buffer.len() as u64;
        if actual < needed {
            return Err(DecodeError::BufferTooShort { needed, actual });
        }
        Ok(())
    }

    /// Length of everything preceding a payload of `payload_len` bytes.
    pub fn header_len(&self, payload_len: u64) -> Result<usize, DecodeError> {
        self.require_len(payload_len)?;
        let payload_len = usize::try_from(payload_len).map_err(|_| DecodeError::BufferTooShort {
            needed: payload_len,
            actual: self.buffer.len() as u64,
        })?;
        Ok(self.buffer.len() - payload_len)
    }

    /// The trailing `payload_len` bytes.
    pub fn payload(&self, payload_len: u64) -> Result<&'a [u8], DecodeError> {
        let header_len = self.header_len(payload_len)?;
        Ok(&self.buffer[header_len..])
    }
}

pub fn u8_samples(payload: &[u8]) -> Vec<u8> {
    payload.to_vec()
}

/// Little-endian 16-bit samples. A trailing odd byte is ignored.
pub fn u16_le_samples(payload: &[u8]) -> Vec<u16> {
    payload
        .par_chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Little-endian 16-bit samples narrowed to their low 8 bits.
///
/// This is plain truncation (`0x1234` becomes `0x34`), matching the legacy
/// HSC170X conversion bit for bit.
pub fn u16_le_samples_truncated(payload: &[u8]) -> Vec<u8> {
    payload
        .par_chunks_exact(2)
        .map(|pair| truncate_to_u8(u16::from_le_bytes([pair[0], pair[1]])))
        .collect()
}

pub fn truncate_to_u8(sample: u16) -> u8 {
    (sample & 0x00ff) as u8
}
