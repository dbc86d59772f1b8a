//! Per-chunk compression: gather the user's array region into a dense
//! chunk buffer, run the in-place predictor, then entropy-encode.
//!
//! Grounded in the reference encoder's `om_encoder_compress_chunk`: the
//! copy/quantise, predictor and entropy stages run in that exact order,
//! once per chunk, with the predictor and entropy stage firing only after
//! the whole chunk has been gathered (`chunk_iter::walk_chunk` returns).

use crate::aligned_buffer::{as_typed_slice, as_typed_slice_mut};
use crate::chunk_iter::{walk_chunk, ChunkShape};
use crate::compression::p4nenc256_bound;
use crate::config::{CodecConfig, Pipeline};
use crate::delta2d::*;
use crate::entropy::*;
use crate::quantize;

macro_rules! native_signed_pipeline {
    ($t:ty, $delta_encode:path, $entropy_encode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr, $out:expr) => {{
        let src_t: &[$t] = as_typed_slice($src);
        let shape = {
            let buf_t: &mut [$t] = as_typed_slice_mut($chunk_bytes);
            gather(
                $cfg, src_t, buf_t, $array_dims, $array_offset, $array_count, $chunk_index,
                $chunk_index_offset,
            )
        };
        {
            let buf_t: &mut [$t] = as_typed_slice_mut($chunk_bytes);
            $delta_encode(
                shape.rows(),
                shape.length_last as usize,
                &mut buf_t[..shape.length_in_chunk as usize],
            );
        }
        let buf_t: &mut [$t] = as_typed_slice_mut($chunk_bytes);
        $entropy_encode(&mut buf_t[..shape.length_in_chunk as usize], $out)
    }};
}

macro_rules! native_unsigned_pipeline {
    ($u:ty, $s:ty, $delta_encode:path, $entropy_encode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr, $out:expr) => {{
        let src_t: &[$u] = as_typed_slice($src);
        let shape = {
            let buf_t: &mut [$u] = as_typed_slice_mut($chunk_bytes);
            gather(
                $cfg, src_t, buf_t, $array_dims, $array_offset, $array_count, $chunk_index,
                $chunk_index_offset,
            )
        };
        {
            let buf_s: &mut [$s] = as_typed_slice_mut($chunk_bytes);
            $delta_encode(
                shape.rows(),
                shape.length_last as usize,
                &mut buf_s[..shape.length_in_chunk as usize],
            );
        }
        let buf_t: &mut [$u] = as_typed_slice_mut($chunk_bytes);
        $entropy_encode(&mut buf_t[..shape.length_in_chunk as usize], $out)
    }};
}

macro_rules! float_xor_pipeline {
    ($float:ty, $bits:ty, $delta_encode:path, $entropy_encode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr, $out:expr) => {{
        let src_t: &[$float] = as_typed_slice($src);
        let shape = {
            let buf_t: &mut [$float] = as_typed_slice_mut($chunk_bytes);
            gather(
                $cfg, src_t, buf_t, $array_dims, $array_offset, $array_count, $chunk_index,
                $chunk_index_offset,
            )
        };
        {
            let buf_t: &mut [$float] = as_typed_slice_mut($chunk_bytes);
            $delta_encode(
                shape.rows(),
                shape.length_last as usize,
                &mut buf_t[..shape.length_in_chunk as usize],
            );
        }
        let buf_bits: &mut [$bits] = as_typed_slice_mut($chunk_bytes);
        $entropy_encode(&mut buf_bits[..shape.length_in_chunk as usize], $out)
    }};
}

macro_rules! quantized_pipeline {
    ($src_t:ty, $dst_t:ty, $quantize_fn:path, $delta_encode:path, $entropy_encode:path, $cfg:expr, $src:expr, $chunk_bytes:expr, $array_dims:expr, $array_offset:expr, $array_count:expr, $chunk_index:expr, $chunk_index_offset:expr, $out:expr) => {{
        let src_t: &[$src_t] = as_typed_slice($src);
        let scale_factor = $cfg.scale_factor;
        let add_offset = $cfg.add_offset;
        let shape = {
            let buf_t: &mut [$dst_t] = as_typed_slice_mut($chunk_bytes);
            walk_chunk(
                $cfg.dimensions(),
                $cfg.chunks(),
                $array_dims,
                $array_offset,
                $array_count,
                $chunk_index,
                $chunk_index_offset,
                |cube, chunk, len| {
                    $quantize_fn(
                        len as usize,
                        scale_factor,
                        add_offset,
                        &src_t[cube as usize..(cube + len) as usize],
                        &mut buf_t[chunk as usize..(chunk + len) as usize],
                    );
                },
            )
        };
        {
            let buf_t: &mut [$dst_t] = as_typed_slice_mut($chunk_bytes);
            $delta_encode(
                shape.rows(),
                shape.length_last as usize,
                &mut buf_t[..shape.length_in_chunk as usize],
            );
        }
        let buf_t: &mut [$dst_t] = as_typed_slice_mut($chunk_bytes);
        $entropy_encode(&mut buf_t[..shape.length_in_chunk as usize], $out)
    }};
}

trait Rows {
    fn rows(&self) -> usize;
}

impl Rows for ChunkShape {
    /// `lengthInChunk / lengthLast`: the row count the 2-D predictor sees.
    fn rows(&self) -> usize {
        (self.length_in_chunk / self.length_last) as usize
    }
}

/// Gathers a sub-region into `dst`, one contiguous run at a time, with a
/// straight element copy (no quantisation).
fn gather<T: Copy>(
    cfg: &CodecConfig,
    src: &[T],
    dst: &mut [T],
    array_dims: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
    chunk_index: u64,
    chunk_index_offset: u64,
) -> ChunkShape {
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
                &src[cube as usize..(cube + len) as usize],
                &mut dst[chunk as usize..(chunk + len) as usize],
            );
        },
    )
}

/// Compresses one chunk: gathers `src` (a `cfg.data_type`-typed byte
/// buffer) into `chunk_buffer` scratch, predicts, then entropy-encodes into
/// `out`. Returns the number of compressed bytes written.
///
/// `chunk_buffer` must be at least [`CodecConfig::chunk_buffer_size`] bytes
/// and `out` at least [`CodecConfig::compressed_chunk_buffer_size`] bytes.
#[allow(clippy::too_many_arguments)]
pub fn compress_chunk(
    cfg: &CodecConfig,
    src: &[u8],
    array_dims: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
    chunk_index: u64,
    chunk_index_offset_in_this_array: u64,
    out: &mut [u8],
    chunk_buffer: &mut [u8],
) -> usize {
    use Pipeline::*;

    let chunk_index_offset = chunk_index_offset_in_this_array;

    match cfg.pipeline {
        CopyDeltaZigzag8 => native_signed_pipeline!(
            i8, delta2d_encode8, pfor_zigzag_encode8,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaPlain8 => native_unsigned_pipeline!(
            u8, i8, delta2d_encode8, pfor_plain_encode8,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaZigzag16 => native_signed_pipeline!(
            i16, delta2d_encode16, pfor_zigzag_encode16,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaPlain16 => native_unsigned_pipeline!(
            u16, i16, delta2d_encode16, pfor_plain_encode16,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaZigzag32 => native_signed_pipeline!(
            i32, delta2d_encode32, pfor_zigzag_encode32,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaPlain32 => native_unsigned_pipeline!(
            u32, i32, delta2d_encode32, pfor_plain_encode32,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaZigzag64 => native_signed_pipeline!(
            i64, delta2d_encode64, pfor_zigzag_encode64,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        CopyDeltaPlain64 => native_unsigned_pipeline!(
            u64, i64, delta2d_encode64, pfor_plain_encode64,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        FloatXor2D => float_xor_pipeline!(
            f32, u32, delta2d_encode_xor32, fpx_encode32,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        DoubleXor2D => float_xor_pipeline!(
            f64, u64, delta2d_encode_xor64, fpx_encode64,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        FloatToInt32DeltaZigzag32 => quantized_pipeline!(
            f32, i32, quantize::float_to_int32_linear, delta2d_encode32, pfor_zigzag_encode32,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        DoubleToInt64DeltaZigzag64 => quantized_pipeline!(
            f64, i64, quantize::double_to_int64_linear, delta2d_encode64, pfor_zigzag_encode64,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        FloatToInt16LinearDeltaZigzag16 => quantized_pipeline!(
            f32, i16, quantize::float_to_int16_linear, delta2d_encode16, pfor_zigzag_encode16,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
        FloatToInt16Log10DeltaZigzag16 => quantized_pipeline!(
            f32, i16, quantize::float_to_int16_log10, delta2d_encode16, pfor_zigzag_encode16,
            cfg, src, chunk_buffer, array_dims, array_offset, array_count, chunk_index, chunk_index_offset, out
        ),
    }
}

/// Worst-case compressed size for one chunk -- scratch sizing helper
/// mirrored from [`CodecConfig::compressed_chunk_buffer_size`] but usable
/// without a full config when only the element width is known.
pub fn compressed_chunk_buffer_size(n_elements: usize, bytes_per_element_compressed: usize) -> usize {
    p4nenc256_bound(n_elements, bytes_per_element_compressed)
}
