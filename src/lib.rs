//! huffpack: lossless byte-stream compression with static Huffman coding.
//!
//! Encoding pipeline:
//! - Count byte frequencies
//! - Build the Huffman tree with a min-priority queue
//! - Derive the prefix-free code table from the tree
//! - Pack the serialized tree and the encoded data MSB-first behind a
//!   13-byte header (see [`header`])
//!
//! Decoding rebuilds the tree from the payload alone and walks it bit by bit
//! until the declared original size has been produced.
//!
//! ```
//! let packed = huffpack::encode(b"abracadabra")?;
//! assert_eq!(huffpack::decode(&packed)?, b"abracadabra");
//! # Ok::<(), huffpack::CodecError>(())
//! ```

pub mod bits;
pub mod code_table;
pub mod config;
pub mod error;
pub mod file;
pub mod frequency;
pub mod header;
pub mod tree;

use tracing::{debug, trace};

use crate::bits::{BitPacker, BitUnpacker};
use crate::code_table::CodeTable;
use crate::header::{PackedHeader, HEADER_LEN};
use crate::tree::{HuffmanTree, Node};

pub use crate::config::CodecConfig;
pub use crate::error::{CodecError, Result};
pub use crate::file::{compress_file, decompress_file, CompressionReport};
pub use crate::frequency::FrequencyTable;

/// Encode `data` with the default configuration.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().encode(data)
}

/// Decode a packed file with the default configuration.
pub fn decode(packed: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().decode(packed)
}

/// The Huffman codec. Holds only configuration; every call builds and
/// discards its own tree, code table and bit buffers.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Compress `data` into a self-contained packed file.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() > self.config.max_input_size {
            return Err(CodecError::SizeLimit {
                size: data.len() as u64,
                limit: self.config.max_input_size as u64,
            });
        }

        let freqs = FrequencyTable::count(data);
        let Some(tree) = HuffmanTree::from_frequencies(&freqs) else {
            debug!("empty input, writing bare header");
            let mut out = Vec::with_capacity(HEADER_LEN);
            PackedHeader::EMPTY.write_to(&mut out);
            return Ok(out);
        };
        let table = CodeTable::from_tree(&tree);
        for (byte, code) in table.iter() {
            trace!(byte, code = %code, "assigned code");
        }

        let tree_bits = tree.serialized_bit_len();
        let data_bits = table.encoded_bit_len(&freqs);
        let mut packer = BitPacker::with_capacity(tree_bits + data_bits);
        tree.serialize(&mut packer)?;
        for &b in data {
            let code = table.get(b).ok_or(CodecError::MissingCode(b))?;
            packer.push_code(code)?;
        }
        debug_assert_eq!(packer.bit_len(), tree_bits + data_bits);
        let packed = packer.finish()?;

        let header = PackedHeader {
            original_size: data.len() as u64,
            // at most 10 * 256 - 1
            tree_bit_len: tree_bits as u32,
            padding_bits: packed.padding,
        };
        let mut out = Vec::with_capacity(HEADER_LEN + packed.bytes.len());
        header.write_to(&mut out);
        out.extend_from_slice(&packed.bytes);

        debug!(
            original_size = data.len(),
            distinct = freqs.distinct(),
            tree_bits,
            data_bits,
            padding = packed.padding,
            compressed_size = out.len(),
            "encoded"
        );
        Ok(out)
    }

    /// Restore the original bytes from a packed file.
    pub fn decode(&self, packed: &[u8]) -> Result<Vec<u8>> {
        let (header, payload) = PackedHeader::parse(packed)?;
        let bit_len = header.payload_bit_len(payload.len())?;
        if header.original_size == 0 {
            if bit_len != 0 || header.tree_bit_len != 0 {
                return Err(CodecError::corrupt(format!(
                    "header declares empty input but payload holds {bit_len} bits"
                )));
            }
            debug!("packed file holds empty input");
            return Ok(Vec::new());
        }
        if header.original_size > self.config.max_output_size {
            return Err(CodecError::SizeLimit {
                size: header.original_size,
                limit: self.config.max_output_size,
            });
        }

        let mut bits = BitUnpacker::new(payload, bit_len)?;
        let tree = HuffmanTree::deserialize(&mut bits)?;
        if bits.position() != u64::from(header.tree_bit_len) {
            return Err(CodecError::corrupt(format!(
                "tree occupies {} bits but header declares {}",
                bits.position(),
                header.tree_bit_len
            )));
        }
        // every byte costs at least one data bit
        if header.original_size > bits.remaining() {
            return Err(CodecError::corrupt(format!(
                "{} data bits cannot hold {} bytes",
                bits.remaining(),
                header.original_size
            )));
        }
        let size = usize::try_from(header.original_size)
            .map_err(|_| CodecError::corrupt("original size does not fit in memory"))?;

        let mut out = Vec::with_capacity(size);
        match tree.root() {
            Node::Leaf { byte, .. } => {
                while out.len() < size {
                    if bits.read_bit()? {
                        return Err(CodecError::corrupt(
                            "unexpected 1 bit in single-symbol data",
                        ));
                    }
                    out.push(*byte);
                }
            }
            root @ Node::Internal { .. } => {
                while out.len() < size {
                    out.push(decode_symbol(root, &mut bits, out.len(), size)?);
                }
            }
        }

        if bits.remaining() > 0 {
            return Err(CodecError::corrupt(format!(
                "{} data bits left after decoding {size} bytes",
                bits.remaining()
            )));
        }
        debug!(
            original_size = size,
            leaves = tree.leaf_count(),
            tree_bits = header.tree_bit_len,
            "decoded"
        );
        Ok(out)
    }
}

/// Walk from `root` to a leaf, consuming one bit per edge (0 = left).
fn decode_symbol(root: &Node, bits: &mut BitUnpacker<'_>, done: usize, size: usize) -> Result<u8> {
    let mut node = root;
    loop {
        match node {
            Node::Leaf { byte, .. } => return Ok(*byte),
            Node::Internal { left, right, .. } => {
                let bit = bits.read_bit().map_err(|_| {
                    CodecError::corrupt(format!(
                        "data bits end after {done} of {size} bytes"
                    ))
                })?;
                node = if bit { right.as_ref() } else { left.as_ref() };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let codec = HuffmanCodec::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let packed = codec.encode(data).unwrap();
        assert_eq!(codec.decode(&packed).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let packed = encode(b"").unwrap();
        assert_eq!(packed, vec![0u8; HEADER_LEN]);
        assert!(decode(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol() {
        let data = vec![0x41u8; 50];
        let packed = encode(&data).unwrap();
        // 9 tree bits + 50 data bits = 59 bits = 8 bytes, 5 padding
        assert_eq!(packed.len(), HEADER_LEN + 8);
        assert_eq!(packed[12], 5);
        assert_eq!(decode(&packed).unwrap(), data);
    }

    #[test]
    fn test_known_layout() {
        // tree (b a): 0 1 01100010 1 01100001, data a a b = 1 1 0
        let packed = encode(b"aab").unwrap();
        let expected_header: [u8; HEADER_LEN] = [0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 19, 2];
        assert_eq!(&packed[..HEADER_LEN], &expected_header);
        assert_eq!(
            &packed[HEADER_LEN..],
            &[0b0101_1000u8, 0b1010_1100, 0b0011_1000]
        );
    }

    #[test]
    fn test_compression_ratio() {
        let data = "aaaaaaaaaa".repeat(100);
        let packed = encode(data.as_bytes()).unwrap();
        assert!(packed.len() < data.len(), "repetitive data should compress well");
    }

    #[test]
    fn test_input_size_limit() {
        let codec = HuffmanCodec::new(CodecConfig {
            max_input_size: 4,
            ..CodecConfig::default()
        });
        let err = codec.encode(b"hello").unwrap_err();
        assert!(matches!(err, CodecError::SizeLimit { size: 5, limit: 4 }));
    }

    #[test]
    fn test_output_size_limit() {
        let packed = encode(b"hello world").unwrap();
        let codec = HuffmanCodec::new(CodecConfig {
            max_output_size: 10,
            ..CodecConfig::default()
        });
        assert!(matches!(
            codec.decode(&packed).unwrap_err(),
            CodecError::SizeLimit { size: 11, limit: 10 }
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let packed = encode(b"hello world hello world").unwrap();
        let err = decode(&packed[..packed.len() - 2]).unwrap_err();
        assert!(err.is_corrupt(), "{err}");
    }

    #[test]
    fn test_tree_length_past_payload() {
        let mut packed = encode(b"abc").unwrap();
        packed[8..12].copy_from_slice(&10_000u32.to_be_bytes());
        assert!(decode(&packed).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_tree_length_mismatch() {
        let mut packed = encode(b"abcabc").unwrap();
        let declared = u32::from_be_bytes([packed[8], packed[9], packed[10], packed[11]]);
        packed[8..12].copy_from_slice(&(declared - 1).to_be_bytes());
        let err = decode(&packed).unwrap_err();
        assert!(err.to_string().contains("tree occupies"), "{err}");
    }

    #[test]
    fn test_original_size_too_large_for_data() {
        let mut packed = encode(b"abcabc").unwrap();
        packed[0..8].copy_from_slice(&1_000u64.to_be_bytes());
        assert!(decode(&packed).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_original_size_smaller_than_data() {
        let mut packed = encode(&[9u8; 16]).unwrap();
        packed[0..8].copy_from_slice(&10u64.to_be_bytes());
        let err = decode(&packed).unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("left after decoding"), "{err}");
    }

    #[test]
    fn test_zero_size_with_payload() {
        let mut packed = encode(b"abcabc").unwrap();
        packed[0..8].copy_from_slice(&0u64.to_be_bytes());
        assert!(decode(&packed).unwrap_err().is_corrupt());

        // bare header claiming a tree but no payload
        let mut empty = encode(b"").unwrap();
        empty[8..12].copy_from_slice(&1u32.to_be_bytes());
        assert!(decode(&empty).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_single_symbol_rejects_one_bits() {
        let mut packed = encode(&[7u8; 8]).unwrap();
        // tree is 9 bits: 1 00000111, data starts at bit 9
        packed[HEADER_LEN + 1] |= 0b0100_0000;
        assert!(decode(&packed).unwrap_err().is_corrupt());
    }
}
