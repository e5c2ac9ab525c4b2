//! Bit-level packing and unpacking
//!
//! Bits are packed most-significant-bit first: the first bit pushed lands in
//! bit 7 of byte 0. The final byte is filled with zero bits up to the next
//! byte boundary and the number of filler bits is reported as padding.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::code_table::Code;
use crate::error::{CodecError, Result};

/// Output of [`BitPacker::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub bytes: Vec<u8>,
    /// Meaningful bits, excluding padding
    pub bit_len: u64,
    /// Zero bits appended to reach a byte boundary (0-7)
    pub padding: u8,
}

pub struct BitPacker {
    writer: BitWriter<Vec<u8>, BigEndian>,
    bit_len: u64,
}

impl BitPacker {
    /// Create an empty packer
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Reserve room for roughly `bits` bits up front.
    pub fn with_capacity(bits: u64) -> Self {
        let bytes = usize::try_from(bits.div_ceil(8)).unwrap_or(0);
        Self {
            writer: BitWriter::endian(Vec::with_capacity(bytes), BigEndian),
            bit_len: 0,
        }
    }

    /// Append a single bit
    pub fn push_bit(&mut self, bit: bool) -> Result<()> {
        self.writer.write_bit(bit)?;
        self.bit_len += 1;
        Ok(())
    }

    /// Push the low `count` bits of `value`, highest of them first.
    pub fn push_bits(&mut self, value: u64, count: u32) -> Result<()> {
        debug_assert!(count <= 64);
        if count == 0 {
            return Ok(());
        }
        let masked = if count == 64 { value } else { value & ((1u64 << count) - 1) };
        self.writer.write(count, masked)?;
        self.bit_len += u64::from(count);
        Ok(())
    }

    /// Append a code word, first bit of the code first
    pub fn push_code(&mut self, code: &Code) -> Result<()> {
        let len = u32::from(code.len());
        let bits = code.bits();
        if len > 64 {
            self.push_bits((bits >> 64) as u64, len - 64)?;
            self.push_bits(bits as u64, 64)
        } else {
            self.push_bits(bits as u64, len)
        }
    }

    /// Bits pushed so far
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Zero-pad to a byte boundary and hand back the bytes
    pub fn finish(mut self) -> Result<PackedBits> {
        let padding = ((8 - self.bit_len % 8) % 8) as u8;
        self.writer.byte_align()?;
        Ok(PackedBits {
            bytes: self.writer.into_writer(),
            bit_len: self.bit_len,
            padding,
        })
    }
}

impl Default for BitPacker {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads back bits produced by [`BitPacker`], refusing to go past the
/// declared bit length.
pub struct BitUnpacker<'a> {
    reader: BitReader<&'a [u8], BigEndian>,
    bit_len: u64,
    position: u64,
}

impl<'a> BitUnpacker<'a> {
    /// `bit_len` must not exceed `bytes.len() * 8`.
    pub fn new(bytes: &'a [u8], bit_len: u64) -> Result<Self> {
        let available = bytes.len() as u64 * 8;
        if bit_len > available {
            return Err(CodecError::corrupt(format!(
                "declared {bit_len} bits but buffer holds {available}"
            )));
        }
        Ok(Self {
            reader: BitReader::endian(bytes, BigEndian),
            bit_len,
            position: 0,
        })
    }

    /// Read the next bit
    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure(1)?;
        let bit = self.reader.read_bit().map_err(read_failed)?;
        self.position += 1;
        Ok(bit)
    }

    /// Read `count` bits (at most 64) as an unsigned integer, first bit highest.
    pub fn read_bits(&mut self, count: u32) -> Result<u64> {
        debug_assert!(count <= 64);
        if count == 0 {
            return Ok(0);
        }
        self.ensure(u64::from(count))?;
        let value = self.reader.read::<u64>(count).map_err(read_failed)?;
        self.position += u64::from(count);
        Ok(value)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bits left before the declared length is reached
    pub fn remaining(&self) -> u64 {
        self.bit_len - self.position
    }

    fn ensure(&self, count: u64) -> Result<()> {
        if count > self.remaining() {
            return Err(CodecError::corrupt(format!(
                "read of {count} bits at offset {} runs past end of {}-bit stream",
                self.position, self.bit_len
            )));
        }
        Ok(())
    }
}

fn read_failed(e: std::io::Error) -> CodecError {
    CodecError::corrupt(format!("bit read failed: {e}"))
}
