//! Per-chunk decompression: entropy-decode, invert the predictor, then
//! scatter into the caller's destination region.
//!
//! Symmetric to [`crate::encoder`] with the stages reversed: there is no
//! direct reference implementation for this side (the reference decoder
//! delegates entirely to the LUT-driven multi-chunk reader, which is out
//! of scope here), so this module mirrors the encoder's stage order and
//! reuses the exact same [`crate::chunk_iter::walk_chunk`] addressing,
//! just with `cube_coordinate` now naming a destination index and
//! `chunk_coordinate` a source index into the freshly decoded buffer.
//!
//! When the destination sub-region does not cover a chunk's full extent,
//! the whole chunk is still entropy-decoded and inverse-predicted -- only
//! the final scatter skips elements outside `array_count`.

use crate::aligned_buffer::{as_typed_slice_mut, as_typed_slice};
use crate::chunk_iter::{chunk_shape, walk_chunk, ChunkShape};
use crate::config::{CodecConfig, Pipeline};
use crate::delta2d::*;
use crate::entropy::*;
use crate::errors::CodecError;
use crate::quantize;

trait Rows {
    fn rows(&self) -> usize;
}

impl Rows for ChunkShape {
    fn rows(&self) -> usize {
        (self.length_in_chunk / self.length_last) as usize
    }
}

macro_rules! native_signed_pipeline {
    ($t:ty, $delta_decode:path, $entropy_decode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $dst:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr) => {{
        let shape = chunk_shape($cfg.dimensions(), $cfg.chunks(), $chunk_index);
        let available = $src.len();
        let consumed = {
            let buf_t: &mut [$t] = as_typed_slice_mut($chunk_bytes);
            $entropy_decode($src, shape.length_in_chunk as usize, &mut buf_t[..shape.length_in_chunk as usize])
        };
        if consumed > available {
            return Err(CodecError::DeflatedSizeMismatch);
        }
        {
            let buf_t: &mut [$t] = as_typed_slice_mut($chunk_bytes);
            $delta_decode(shape.rows(), shape.length_last as usize, &mut buf_t[..shape.length_in_chunk as usize]);
        }
        let buf_t: &mut [$t] = as_typed_slice_mut($chunk_bytes);
        let dst_t: &mut [$t] = as_typed_slice_mut($dst);
        scatter($cfg, buf_t, dst_t, $array_dims, $array_offset, $array_count, $chunk_index, $chunk_index_offset);
        Ok(consumed)
    }};
}

macro_rules! native_unsigned_pipeline {
    ($u:ty, $s:ty, $delta_decode:path, $entropy_decode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $dst:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr) => {{
        let shape = chunk_shape($cfg.dimensions(), $cfg.chunks(), $chunk_index);
        let available = $src.len();
        let consumed = {
            let buf_t: &mut [$u] = as_typed_slice_mut($chunk_bytes);
            $entropy_decode($src, shape.length_in_chunk as usize, &mut buf_t[..shape.length_in_chunk as usize])
        };
        if consumed > available {
            return Err(CodecError::DeflatedSizeMismatch);
        }
        {
            let buf_s: &mut [$s] = as_typed_slice_mut($chunk_bytes);
            $delta_decode(shape.rows(), shape.length_last as usize, &mut buf_s[..shape.length_in_chunk as usize]);
        }
        let buf_t: &mut [$u] = as_typed_slice_mut($chunk_bytes);
        let dst_t: &mut [$u] = as_typed_slice_mut($dst);
        scatter($cfg, buf_t, dst_t, $array_dims, $array_offset, $array_count, $chunk_index, $chunk_index_offset);
        Ok(consumed)
    }};
}

macro_rules! float_xor_pipeline {
    ($float:ty, $bits:ty, $delta_decode:path, $entropy_decode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $dst:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr) => {{
        let shape = chunk_shape($cfg.dimensions(), $cfg.chunks(), $chunk_index);
        let available = $src.len();
        let consumed = {
            let buf_bits: &mut [$bits] = as_typed_slice_mut($chunk_bytes);
            $entropy_decode($src, shape.length_in_chunk as usize, &mut buf_bits[..shape.length_in_chunk as usize])
        };
        if consumed > available {
            return Err(CodecError::DeflatedSizeMismatch);
        }
        {
            let buf_t: &mut [$float] = as_typed_slice_mut($chunk_bytes);
            $delta_decode(shape.rows(), shape.length_last as usize, &mut buf_t[..shape.length_in_chunk as usize]);
        }
        let buf_t: &mut [$float] = as_typed_slice_mut($chunk_bytes);
        let dst_t: &mut [$float] = as_typed_slice_mut($dst);
        scatter($cfg, buf_t, dst_t, $array_dims, $array_offset, $array_count, $chunk_index, $chunk_index_offset);
        Ok(consumed)
    }};
}

macro_rules! dequantized_pipeline {
    ($src_t:ty, $dst_t:ty, $dequantize_fn:path, $delta_decode:path, $entropy_decode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $dst:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr) => {{
        let shape = chunk_shape($cfg.dimensions(), $cfg.chunks(), $chunk_index);
        let available = $src.len();
        let consumed = {
            let buf_t: &mut [$src_t] = as_typed_slice_mut($chunk_bytes);
            $entropy_decode($src, shape.length_in_chunk as usize, &mut buf_t[..shape.length_in_chunk as usize])
        };
        if consumed > available {
            return Err(CodecError::DeflatedSizeMismatch);
        }
        {
            let buf_t: &mut [$src_t] = as_typed_slice_mut($chunk_bytes);
            $delta_decode(shape.rows(), shape.length_last as usize, &mut buf_t[..shape.length_in_chunk as usize]);
        }
        let scale_factor = $cfg.scale_factor;
        let add_offset = $cfg.add_offset;
        let buf_t: &[$src_t] = as_typed_slice($chunk_bytes);
        let dst_t: &mut [$dst_t] = as_typed_slice_mut($dst);
        walk_chunk(
            $cfg.dimensions(),
            $cfg.chunks(),
            $array_dims,
            $array_offset,
            $array_count,
            $chunk_index,
            $chunk_index_offset,
            |cube, chunk, len| {
                $dequantize_fn(
                    len as usize,
                    scale_factor,
                    add_offset,
                    &buf_t[chunk as usize..(chunk + len) as usize],
                    &mut dst_t[cube as usize..(cube + len) as usize],
                );
            },
        );
        Ok(consumed)
    }};
}

/// Scatters a fully decoded, inverse-predicted chunk buffer into `dst`, one
/// contiguous run at a time, with a straight element copy.
fn scatter<T: Copy>(
    cfg: &CodecConfig,
    chunk_buf: &[T],
    dst: &mut [T],
    array_dims: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
    chunk_index: u64,
    chunk_index_offset: u64,
) {
    walk_chunk(
        cfg.dimensions(),
        cfg.chunks(),
        array_dims,
        array_offset,
        array_count,
        chunk_index,
        chunk_index_offset,
        |cube, chunk, len| {
            quantize::copy(
                len as usize,
                &chunk_buf[chunk as usize..(chunk + len) as usize],
                &mut dst[cube as usize..(cube + len) as usize],
            );
        },
    );
}

/// Decompresses one chunk: entropy-decodes `src` into `chunk_buffer`
/// scratch, inverse-predicts, then scatters into `dst` (a
/// `cfg.data_type`-typed byte buffer shaped like `array_dims`). Returns the
/// number of compressed bytes consumed from `src`.
///
/// `src` must hold at least as many bytes as were written by the matching
/// `compress_chunk` call -- the entropy decoder may still read a few bytes
/// of padding slack past that (see [`crate::entropy`]). Returns
/// `Err(CodecError::DeflatedSizeMismatch)` if the entropy stage reports
/// consuming more bytes than `src` actually holds, the signature of
/// corrupted compressed data rather than a caller bug.
#[allow(clippy::too_many_arguments)]
pub fn decompress_chunk(
    cfg: &CodecConfig,
    src: &mut [u8],
    dst: &mut [u8],
    array_dims: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
    chunk_index: u64,
    chunk_index_offset_in_this_array: u64,
    chunk_buffer: &mut [u8],
) -> Result<usize, CodecError> {
    use Pipeline::*;

    let chunk_index_offset = chunk_index_offset_in_this_array;

    match cfg.pipeline {
        CopyDeltaZigzag8 => native_signed_pipeline!(
            i8, delta2d_decode8, pfor_zigzag_decode8,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaPlain8 => native_unsigned_pipeline!(
            u8, i8, delta2d_decode8, pfor_plain_decode8,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaZigzag16 => native_signed_pipeline!(
            i16, delta2d_decode16, pfor_zigzag_decode16,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaPlain16 => native_unsigned_pipeline!(
            u16, i16, delta2d_decode16, pfor_plain_decode16,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaZigzag32 => native_signed_pipeline!(
            i32, delta2d_decode32, pfor_zigzag_decode32,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaPlain32 => native_unsigned_pipeline!(
            u32, i32, delta2d_decode32, pfor_plain_decode32,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaZigzag64 => native_signed_pipeline!(
            i64, delta2d_decode64, pfor_zigzag_decode64,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        CopyDeltaPlain64 => native_unsigned_pipeline!(
            u64, i64, delta2d_decode64, pfor_plain_decode64,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        FloatXor2D => float_xor_pipeline!(
            f32, u32, delta2d_decode_xor32, fpx_decode32,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        DoubleXor2D => float_xor_pipeline!(
            f64, u64, delta2d_decode_xor64, fpx_decode64,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        FloatToInt32DeltaZigzag32 => dequantized_pipeline!(
            i32, f32, quantize::int32_to_float_linear, delta2d_decode32, pfor_zigzag_decode32,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        DoubleToInt64DeltaZigzag64 => dequantized_pipeline!(
            i64, f64, quantize::int64_to_double_linear, delta2d_decode64, pfor_zigzag_decode64,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        FloatToInt16LinearDeltaZigzag16 => dequantized_pipeline!(
            i16, f32, quantize::int16_to_float_linear, delta2d_decode16, pfor_zigzag_decode16,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
        FloatToInt16Log10DeltaZigzag16 => dequantized_pipeline!(
            i16, f32, quantize::int16_to_float_log10, delta2d_decode16, pfor_zigzag_decode16,
            cfg, src, chunk_buffer, dst, array_dims, array_offset, array_count, chunk_index, chunk_index_offset
        ),
    }
}
