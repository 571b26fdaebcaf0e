// Block Codec
// Packs byte buffers into fixed-width integer blocks and back

use log::debug;
use num_traits::Zero;

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{RsaError, RsaResult};

/// One block read from a bit stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block value, most significant bit first. A short final block is
    /// left-aligned: its missing low bits are zero.
    pub value: RsaBigInt,
    /// Number of stream bits this block consumed
    pub bits: usize,
    pub is_last: bool,
}

/// Iterator over `width`-bit blocks of a byte slice, MSB first per byte
pub struct Blocks<'a> {
    bytes: &'a [u8],
    width: usize,
    offset: usize,
}

impl<'a> Blocks<'a> {
    pub fn new(bytes: &'a [u8], width: usize) -> Self {
        Self {
            bytes,
            width,
            offset: 0,
        }
    }

    fn total_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    fn bit_at(&self, idx: usize) -> bool {
        self.bytes[idx / 8] & (0x80 >> (idx % 8)) != 0
    }
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let total = self.total_bits();
        if self.width == 0 || self.offset >= total {
            return None;
        }

        let bits = self.width.min(total - self.offset);
        let mut value = RsaBigInt::zero();
        for i in 0..bits {
            if self.bit_at(self.offset + i) {
                value.set_bit((self.width - 1 - i) as u64, true);
            }
        }

        self.offset += bits;
        Some(Block {
            value,
            bits,
            is_last: self.offset >= total,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.width == 0 {
            return (0, Some(0));
        }
        let left = self.total_bits() - self.offset;
        let n = (left + self.width - 1) / self.width;
        (n, Some(n))
    }
}

/// Bit accumulator; the final partial byte is zero-filled on the right
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity((bits + 7) / 8),
            len: 0,
        }
    }

    fn push_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> (self.len % 8);
            }
        }
        self.len += 1;
    }

    /// Append `value` as exactly `width` bits, left-padded with zeros
    pub fn push(&mut self, value: &RsaBigInt, width: usize) -> RsaResult<()> {
        let bits = value.bits();
        if bits > width as u64 {
            return Err(RsaError::BlockWidthMismatch { bits, width });
        }
        for i in (0..width as u64).rev() {
            self.push_bit(value.bit(i));
        }
        Ok(())
    }

    pub fn bit_len(&self) -> usize {
        self.len
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn modulus_bits(modulus: &RsaBigInt) -> RsaResult<usize> {
    let bits = modulus.bits() as usize;
    if bits < 2 {
        return Err(RsaError::InvalidBitWidth(bits));
    }
    Ok(bits)
}

/// (read, write) widths for encryption: plaintext blocks stay below the
/// modulus, ciphertext blocks use its full width
pub fn encrypt_widths(modulus: &RsaBigInt) -> RsaResult<(usize, usize)> {
    let bits = modulus_bits(modulus)?;
    Ok((bits - 1, bits))
}

/// (read, write) widths for decryption, the mirror of `encrypt_widths`
pub fn decrypt_widths(modulus: &RsaBigInt) -> RsaResult<(usize, usize)> {
    let bits = modulus_bits(modulus)?;
    Ok((bits, bits - 1))
}

/// Split `bytes` into `read_bits`-wide blocks, raise each to `exponent` mod
/// `modulus` and concatenate the results as `write_bits`-wide fields
///
/// Blocks are transformed independently and written in input order.
pub fn encode_blocks(
    bytes: &[u8],
    read_bits: usize,
    write_bits: usize,
    exponent: &RsaBigInt,
    modulus: &RsaBigInt,
) -> RsaResult<Vec<u8>> {
    if read_bits == 0 {
        return Err(RsaError::InvalidBitWidth(read_bits));
    }
    if write_bits == 0 {
        return Err(RsaError::InvalidBitWidth(write_bits));
    }
    if modulus.is_zero() {
        return Err(RsaError::InvalidBitWidth(0));
    }

    let blocks = Blocks::new(bytes, read_bits);
    let mut writer = BitWriter::with_capacity(blocks.size_hint().0 * write_bits);
    let mut count = 0usize;

    for block in blocks {
        let transformed = mod_pow(&block.value, exponent, modulus);
        writer.push(&transformed, write_bits)?;
        count += 1;
    }

    debug!(
        "transformed {} blocks ({} -> {} bits each), {} output bits",
        count,
        read_bits,
        write_bits,
        writer.bit_len()
    );

    Ok(writer.into_bytes())
}

/// Inverse direction of `encode_blocks`; call it with the swapped widths
pub fn decode_blocks(
    bytes: &[u8],
    read_bits: usize,
    write_bits: usize,
    exponent: &RsaBigInt,
    modulus: &RsaBigInt,
) -> RsaResult<Vec<u8>> {
    encode_blocks(bytes, read_bits, write_bits, exponent, modulus)
}
