//! The chunk iterator / gather-scatter engine.
//!
//! Walks a chunk's footprint inside an arbitrary hyper-rectangular
//! sub-region (`array_offset`, `array_count`) of a larger N-D array
//! (`array_dims`), and invokes a caller-supplied callback once per maximal
//! contiguous run of elements. The same addressing arithmetic drives both
//! directions: the encoder gathers from the user array into a densely
//! packed chunk buffer, and the decoder scatters from a fully decoded
//! chunk buffer back into the user's destination region -- only the
//! direction the callback copies matters, so both orchestrators share this
//! one walk.
//!
//! The iterator is width-agnostic: it produces element *indices*, not byte
//! offsets, and leaves the actual copy/quantise work (which does depend on
//! element width) to the callback.

use crate::utils::divide_rounded_up_u64;

/// Outcome of walking one chunk's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkShape {
    /// Total element count of this chunk (may be less than
    /// `product(chunks)` for an edge chunk).
    pub length_in_chunk: u64,
    /// Extent of the chunk along the innermost (fastest-varying) axis --
    /// fed to the 2-D predictor as `length1`.
    pub length_last: u64,
}

/// Computes a chunk's shape without touching any array data. Depends only
/// on the chunk's position in the grid (`dims`, `chunks`, `chunk_index`) --
/// not on where a sub-region of interest sits, so the decoder can size its
/// entropy-decode and inverse-predictor buffers before it has anything to
/// scatter into.
pub fn chunk_shape(dims: &[u64], chunks: &[u64], chunk_index: u64) -> ChunkShape {
    let rank = dims.len();
    let mut rolling_multiply: u64 = 1;
    let mut rolling_multiply_chunk_length: u64 = 1;
    let mut length_last: u64 = 0;

    for i_forward in 0..rank {
        let i = rank - i_forward - 1;
        let dimension = dims[i];
        let chunk = chunks[i];

        let n_chunks_in_this_dimension = divide_rounded_up_u64(dimension, chunk);
        let c0 = (chunk_index / rolling_multiply) % n_chunks_in_this_dimension;
        let length0 = std::cmp::min((c0 + 1) * chunk, dimension) - c0 * chunk;

        if i == rank - 1 {
            length_last = length0;
        }

        rolling_multiply *= n_chunks_in_this_dimension;
        rolling_multiply_chunk_length *= length0;
    }

    ChunkShape {
        length_in_chunk: rolling_multiply_chunk_length,
        length_last,
    }
}

/// Walks chunk `chunk_index` (in the full array's chunk grid) as it
/// appears inside the sub-region `array_offset..array_offset+array_count`
/// of a cube shaped `array_dims`. `chunk_index_offset_in_array` locates
/// where that sub-region itself sits within the full chunk grid (pass `0`
/// when the sub-region's origin is chunk-aligned with the full array).
///
/// For every maximal contiguous run found, calls `copy_fn(cube_coordinate,
/// chunk_coordinate, run_len)` where `cube_coordinate` is a flat index into
/// `array_dims` and `chunk_coordinate` is a flat index into the packed,
/// row-major chunk buffer of `length_in_chunk` elements.
///
/// # Panics
///
/// In debug builds, panics (via `debug_assert!`) if the caller-supplied
/// dimensions are inconsistent -- e.g. a chunk's edge-truncated extent
/// exceeding the sub-region's declared count. These are programming
/// errors, not recoverable data conditions (see [`crate::errors`]).
pub fn walk_chunk<F>(
    dims: &[u64],
    chunks: &[u64],
    array_dims: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
    chunk_index: u64,
    chunk_index_offset_in_array: u64,
    mut copy_fn: F,
) -> ChunkShape
where
    F: FnMut(u64, u64, u64),
{
    let rank = dims.len();
    debug_assert_eq!(rank, chunks.len());
    debug_assert_eq!(rank, array_dims.len());
    debug_assert_eq!(rank, array_offset.len());
    debug_assert_eq!(rank, array_count.len());

    let array_total_count: u64 = array_dims.iter().product();

    let mut rolling_multiply: u64 = 1;
    let mut rolling_multiply_chunk_length: u64 = 1;
    let mut rolling_multiply_target_cube: u64 = 1;
    let mut read_coordinate: u64 = 0;
    let mut write_coordinate: u64 = 0;
    let mut linear_read_count: u64 = 1;
    let mut linear_read = true;
    let mut length_last: u64 = 0;

    for i_forward in 0..rank {
        let i = rank - i_forward - 1;
        let dimension = dims[i];
        let chunk = chunks[i];

        let n_chunks_in_this_dimension = divide_rounded_up_u64(dimension, chunk);
        let c0 = (chunk_index / rolling_multiply) % n_chunks_in_this_dimension;
        let c0_offset = (chunk_index_offset_in_array / rolling_multiply) % n_chunks_in_this_dimension;
        let length0 = std::cmp::min((c0 + 1) * chunk, dimension) - c0 * chunk;

        if i == rank - 1 {
            length_last = length0;
        }

        read_coordinate += rolling_multiply_target_cube * (c0_offset * chunk + array_offset[i]);

        debug_assert!(length0 <= array_count[i]);
        debug_assert!(length0 <= array_dims[i]);

        if i == rank - 1 && !(array_count[i] == length0 && array_dims[i] == length0) {
            linear_read_count = length0;
            linear_read = false;
        }
        if linear_read && array_count[i] == length0 && array_dims[i] == length0 {
            linear_read_count *= length0;
        } else {
            linear_read = false;
        }

        rolling_multiply *= n_chunks_in_this_dimension;
        rolling_multiply_target_cube *= array_dims[i];
        rolling_multiply_chunk_length *= length0;
    }

    let length_in_chunk = rolling_multiply_chunk_length;

    'outer: loop {
        debug_assert!(read_coordinate + linear_read_count <= array_total_count);
        debug_assert!(write_coordinate + linear_read_count <= length_in_chunk);

        copy_fn(read_coordinate, write_coordinate, linear_read_count);

        read_coordinate += linear_read_count - 1;
        write_coordinate += linear_read_count;

        rolling_multiply_target_cube = 1;
        linear_read = true;
        linear_read_count = 1;

        for i_forward in 0..rank {
            let i = rank - i_forward - 1;
            let chunk = chunks[i];

            let q_pos = ((read_coordinate / rolling_multiply_target_cube) % array_dims[i]
                - array_offset[i])
                / chunk;
            let length0 = std::cmp::min((q_pos + 1) * chunk, array_count[i]) - q_pos * chunk;
            read_coordinate += rolling_multiply_target_cube;

            if i == rank - 1 && !(array_count[i] == length0 && array_dims[i] == length0) {
                linear_read_count = length0;
                linear_read = false;
            }
            if linear_read && array_count[i] == length0 && array_dims[i] == length0 {
                linear_read_count *= length0;
            } else {
                linear_read = false;
            }

            let q0 = ((read_coordinate / rolling_multiply_target_cube) % array_dims[i]
                - array_offset[i])
                % chunks[i];
            if q0 != 0 && q0 != length0 {
                continue 'outer;
            }

            read_coordinate -= length0 * rolling_multiply_target_cube;
            rolling_multiply_target_cube *= array_dims[i];

            if i == 0 {
                break 'outer;
            }
        }
    }

    ChunkShape {
        length_in_chunk,
        length_last,
    }
}
