//! Packed file header
//!
//! ```text
//! offset  size  field
//!      0     8  original size (big-endian)
//!      8     4  tree bit length (big-endian)
//!     12     1  padding bits (0-7)
//!     13     N  payload: tree bits, then data bits, MSB-first, zero padded
//! ```

use crate::error::{CodecError, Result};

pub const HEADER_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedHeader {
    pub original_size: u64,
    pub tree_bit_len: u32,
    pub padding_bits: u8,
}

impl PackedHeader {
    /// Header of an encoded empty input.
    pub const EMPTY: PackedHeader = PackedHeader {
        original_size: 0,
        tree_bit_len: 0,
        padding_bits: 0,
    };

    /// Append the 13 header bytes to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.original_size.to_be_bytes());
        out.extend_from_slice(&self.tree_bit_len.to_be_bytes());
        out.push(self.padding_bits);
    }

    /// Split a packed file into its header and payload.
    pub fn parse(data: &[u8]) -> Result<(PackedHeader, &[u8])> {
        if data.len() < HEADER_LEN {
            return Err(CodecError::corrupt(format!(
                "file is {} bytes, shorter than the {HEADER_LEN}-byte header",
                data.len()
            )));
        }
        let (head, payload) = data.split_at(HEADER_LEN);
        let mut size = [0u8; 8];
        size.copy_from_slice(&head[0..8]);
        let mut tree = [0u8; 4];
        tree.copy_from_slice(&head[8..12]);

        let header = PackedHeader {
            original_size: u64::from_be_bytes(size),
            tree_bit_len: u32::from_be_bytes(tree),
            padding_bits: head[12],
        };
        Ok((header, payload))
    }

    /// Meaningful bits in a payload of `payload_len` bytes, checked against
    /// the padding and tree length this header declares.
    pub fn payload_bit_len(&self, payload_len: usize) -> Result<u64> {
        if self.padding_bits > 7 {
            return Err(CodecError::corrupt(format!(
                "padding of {} bits is not in 0..=7",
                self.padding_bits
            )));
        }
        let total = payload_len as u64 * 8;
        let padding = u64::from(self.padding_bits);
        if padding > total {
            return Err(CodecError::corrupt("padding declared for an empty payload"));
        }
        let bits = total - padding;
        if u64::from(self.tree_bit_len) > bits {
            return Err(CodecError::corrupt(format!(
                "tree length of {} bits exceeds the {bits} payload bits",
                self.tree_bit_len
            )));
        }
        Ok(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_layout() {
        let header = PackedHeader {
            original_size: 0x0102_0304_0506_0708,
            tree_bit_len: 0x0A0B_0C0D,
            padding_bits: 5,
        };
        let mut out = Vec::new();
        header.write_to(&mut out);
        assert_eq!(
            out,
            vec![1, 2, 3, 4, 5, 6, 7, 8, 0x0A, 0x0B, 0x0C, 0x0D, 5]
        );

        out.extend_from_slice(&[0xEE, 0xFF]);
        let (parsed, payload) = PackedHeader::parse(&out).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(payload, &[0xEEu8, 0xFF]);
    }

    #[test]
    fn test_short_header() {
        let err = PackedHeader::parse(&[0u8; 12]).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_payload_bit_len() {
        let header = PackedHeader {
            original_size: 3,
            tree_bit_len: 19,
            padding_bits: 3,
        };
        assert_eq!(header.payload_bit_len(3).unwrap(), 21);
        // 2 bytes minus padding leaves 13 bits, not enough for the tree
        assert!(header.payload_bit_len(2).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_bad_padding() {
        let header = PackedHeader {
            padding_bits: 8,
            ..PackedHeader::EMPTY
        };
        assert!(header.payload_bit_len(4).is_err());

        let header = PackedHeader {
            padding_bits: 1,
            ..PackedHeader::EMPTY
        };
        assert!(header.payload_bit_len(0).is_err());
    }

    #[test]
    fn test_empty_header() {
        let mut out = Vec::new();
        PackedHeader::EMPTY.write_to(&mut out);
        assert_eq!(out, vec![0u8; HEADER_LEN]);
        assert_eq!(PackedHeader::EMPTY.payload_bit_len(0).unwrap(), 0);
    }
}
