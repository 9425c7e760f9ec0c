//! Variable-length length prefix
//!
//! Unsigned LEB128: 7 payload bits per byte, high bit set on every byte
//! except the last. A record of fewer than 128 bytes costs one prefix byte.

use std::io::{self, Read};

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Encode a varint to bytes
pub fn encode(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Read a varint from a reader, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - The reader ends mid-varint (`UnexpectedEof`)
/// - Varint exceeds MAX_VARINT_BYTES or overflows u64 (`InvalidData`)
pub fn read_from<R: Read>(reader: &mut R) -> io::Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;
    let mut byte = [0u8; 1];

    for consumed in 1..=MAX_VARINT_BYTES {
        reader.read_exact(&mut byte)?;
        let bits = (byte[0] & 0x7F) as u64;

        // The tenth byte may only carry the single remaining bit of a u64
        if consumed == MAX_VARINT_BYTES && bits > 1 {
            break;
        }

        result |= bits << shift;
        if byte[0] & 0x80 == 0 {
            return Ok((result, consumed));
        }
        shift += 7;
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "Varint exceeds maximum length (possible corruption)",
    ))
}
