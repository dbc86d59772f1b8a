//! LUT (lookup table) compression.
//!
//! The multi-chunk file reader that consumes a LUT to plan chunk fetches is
//! out of scope; what lives here is just the fixed-stride block compressor
//! (grounded in `om_encoder_lut_buffer_size`/`om_encoder_compress_lut`) and
//! a matching single-block decoder, needed to exercise the round trip.

use crate::entropy::{lut_decode, lut_encode};

/// Number of offsets packed into one independently PFor-64-encoded block.
pub const LUT_CHUNK_COUNT: u64 = 256;

fn n_lut_chunks(count: u64) -> u64 {
    crate::utils::divide_rounded_up_u64(count, LUT_CHUNK_COUNT)
}

/// Worst-case byte size of the compressed LUT: every block sized to the
/// widest block actually produced, plus 32 `u64`s of entropy-coder slack.
pub fn lut_buffer_size(lookup_table: &[u64]) -> u64 {
    let n_blocks = n_lut_chunks(lookup_table.len() as u64);
    let mut max_len: u64 = 0;
    for i in 0..n_blocks {
        let start = (i * LUT_CHUNK_COUNT) as usize;
        let end = std::cmp::min(start as u64 + LUT_CHUNK_COUNT, lookup_table.len() as u64) as usize;
        let mut block = lookup_table[start..end].to_vec();
        let mut scratch = vec![0u8; (LUT_CHUNK_COUNT as usize + 32) * 8];
        let len = lut_encode(&mut block, &mut scratch) as u64;
        max_len = max_len.max(len);
    }
    max_len * n_blocks + 32 * 8
}

/// Compresses `lookup_table` into `out`, `⌈M / 256⌉` independently decodable
/// blocks of equal stride `(out.len() - 32·8) / nBlocks`, each zero-padded
/// past its encoded length to keep the stride fixed. Returns the number of
/// bytes actually used (`out.len() - 32·8`).
///
/// # Panics
///
/// Panics if `out` is smaller than [`lut_buffer_size`] would report for
/// `lookup_table` -- a caller contract, not a data-dependent failure.
pub fn compress_lut(lookup_table: &[u64], out: &mut [u8]) -> u64 {
    let n_blocks = n_lut_chunks(lookup_table.len() as u64);
    let lut_size = out.len() as u64 - 32 * 8;
    let lut_chunk_length = lut_size / n_blocks;

    for i in 0..n_blocks {
        let start = (i * LUT_CHUNK_COUNT) as usize;
        let end = std::cmp::min(start as u64 + LUT_CHUNK_COUNT, lookup_table.len() as u64) as usize;
        let mut block = lookup_table[start..end].to_vec();

        let slot_start = (i * lut_chunk_length) as usize;
        let slot_end = ((i + 1) * lut_chunk_length) as usize;
        let len = lut_encode(&mut block, &mut out[slot_start..slot_end]) as usize;
        for b in &mut out[slot_start + len..slot_end] {
            *b = 0;
        }
    }
    lut_size
}

/// Decodes entry `k` out of a LUT compressed with [`compress_lut`] using the
/// same `lut_chunk_length` stride. Companion to the encoder above: the
/// LUT-driven reader this would ultimately serve is out of scope, but
/// decoding one block is needed to test round-trips.
pub fn decode_lut_block(compressed: &mut [u8], lut_chunk_length: u64, block_index: u64, block_len: u64) -> Vec<u64> {
    let slot_start = (block_index * lut_chunk_length) as usize;
    let slot_end = slot_start + lut_chunk_length as usize;
    let mut decoded = vec![0u64; block_len as usize];
    lut_decode(&mut compressed[slot_start..slot_end], block_len as usize, &mut decoded);
    decoded
}
