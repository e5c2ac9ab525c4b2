//! File-level helpers around [`HuffmanCodec`]
//!
//! The codec itself never touches the filesystem; these functions read the
//! whole input, run the codec, and write the result verbatim.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::HuffmanCodec;

/// Sizes observed for one compress or decompress run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    pub original_size: usize,
    pub compressed_size: usize,
    /// compressed / original, 0 for empty input
    pub ratio: f64,
    pub entropy_bits_per_byte: f64,
}

impl CompressionReport {
    pub fn new(original: &[u8], compressed_size: usize) -> Self {
        let ratio = if original.is_empty() {
            0.0
        } else {
            compressed_size as f64 / original.len() as f64
        };
        Self {
            original_size: original.len(),
            compressed_size,
            ratio,
            entropy_bits_per_byte: FrequencyTable::count(original).entropy(),
        }
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original size: {} bytes", self.original_size)?;
        writeln!(f, "Compressed size: {} bytes", self.compressed_size)?;
        write!(f, "Compression ratio: {:.2}%", self.ratio * 100.0)
    }
}

pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    codec: &HuffmanCodec,
) -> Result<CompressionReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let data = fs::read(input)?;
    let packed = codec.encode(&data)?;
    fs::write(output, &packed)?;
    info!(input = %input.display(), output = %output.display(), "compressed");
    Ok(CompressionReport::new(&data, packed.len()))
}

pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    codec: &HuffmanCodec,
) -> Result<CompressionReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let packed = fs::read(input)?;
    let data = codec.decode(&packed)?;
    fs::write(output, &data)?;
    info!(input = %input.display(), output = %output.display(), "decompressed");
    Ok(CompressionReport::new(&data, packed.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_ratio() {
        let report = CompressionReport::new(b"aaaa", 2);
        assert_eq!(report.original_size, 4);
        assert!((report.ratio - 0.5).abs() < 1e-12);
        assert_eq!(
            report.to_string(),
            "Original size: 4 bytes\nCompressed size: 2 bytes\nCompression ratio: 50.00%"
        );
    }

    #[test]
    fn test_report_empty() {
        let report = CompressionReport::new(b"", 13);
        assert_eq!(report.ratio, 0.0);
        assert_eq!(report.entropy_bits_per_byte, 0.0);
    }

    #[test]
    fn test_report_json() {
        let report = CompressionReport::new(b"abab", 16);
        let json = serde_json::to_string(&report).unwrap();
        let back: CompressionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert!(json.contains("\"compressed_size\":16"));
    }
}
