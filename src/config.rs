//! Immutable per-array codec configuration.
//!
//! Construction is the only place `(data_type, compression)` is validated
//! and the only place the concrete [`Pipeline`] is chosen -- every
//! `compress_chunk`/`decompress_chunk` call afterwards just dispatches on
//! that already-resolved value instead of re-deriving it per chunk.

use crate::compression::{element_sizes, Compression, ElementSizes};
use crate::data_type::DataType;
use crate::dimensions::ArrayDescriptor;
use crate::errors::CodecError;
use crate::utils::divide_rounded_up_u64;

/// The concrete copy/predict/entropy pipeline for one `(data_type,
/// compression)` pair, resolved once at [`CodecConfig::new`]. Mirrors the
/// reference encoder's `compress_copy_callback` / `compress_filter_callback`
/// / `compress_callback` triple, collapsed into a plain enum since Rust's
/// per-width function signatures aren't uniform enough for one function
/// pointer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pipeline {
    CopyDeltaZigzag8,
    CopyDeltaPlain8,
    CopyDeltaZigzag16,
    CopyDeltaPlain16,
    CopyDeltaZigzag32,
    CopyDeltaPlain32,
    CopyDeltaZigzag64,
    CopyDeltaPlain64,
    FloatToInt32DeltaZigzag32,
    DoubleToInt64DeltaZigzag64,
    FloatXor2D,
    DoubleXor2D,
    FloatToInt16LinearDeltaZigzag16,
    FloatToInt16Log10DeltaZigzag16,
}

fn select_pipeline(data_type: DataType, compression: Compression) -> Result<Pipeline, CodecError> {
    use Compression::*;
    use DataType::*;
    use Pipeline::*;

    match compression {
        PforDelta2DInt16 => match data_type {
            FloatArray => Ok(FloatToInt16LinearDeltaZigzag16),
            _ => Err(CodecError::InvalidDataType),
        },
        PforDelta2DInt16Log => match data_type {
            FloatArray => Ok(FloatToInt16Log10DeltaZigzag16),
            _ => Err(CodecError::InvalidDataType),
        },
        FpxXor2D => match data_type {
            FloatArray => Ok(FloatXor2D),
            DoubleArray => Ok(DoubleXor2D),
            _ => Err(CodecError::InvalidDataType),
        },
        PforDelta2D => match data_type {
            Int8Array => Ok(CopyDeltaZigzag8),
            UInt8Array => Ok(CopyDeltaPlain8),
            Int16Array => Ok(CopyDeltaZigzag16),
            UInt16Array => Ok(CopyDeltaPlain16),
            Int32Array => Ok(CopyDeltaZigzag32),
            UInt32Array => Ok(CopyDeltaPlain32),
            Int64Array => Ok(CopyDeltaZigzag64),
            UInt64Array => Ok(CopyDeltaPlain64),
            FloatArray => Ok(FloatToInt32DeltaZigzag32),
            DoubleArray => Ok(DoubleToInt64DeltaZigzag64),
            _ => Err(CodecError::InvalidDataType),
        },
    }
}

/// A validated, immutable handle threaded through every per-chunk call.
/// Construction is the only fallible step; `compress_chunk` and
/// `decompress_chunk` trust it completely (see [`crate::errors`]).
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub scale_factor: f32,
    pub add_offset: f32,
    pub compression: Compression,
    pub data_type: DataType,
    pub(crate) dims: ArrayDescriptor,
    pub(crate) sizes: ElementSizes,
    pub(crate) pipeline: Pipeline,
}

impl CodecConfig {
    pub fn new(
        scale_factor: f32,
        add_offset: f32,
        compression: Compression,
        data_type: DataType,
        dimensions: Vec<u64>,
        chunks: Vec<u64>,
    ) -> Result<Self, CodecError> {
        let dims = ArrayDescriptor::new(dimensions, chunks)?;
        let sizes = element_sizes(data_type, compression)?;
        let pipeline = select_pipeline(data_type, compression)?;
        Ok(Self {
            scale_factor,
            add_offset,
            compression,
            data_type,
            dims,
            sizes,
            pipeline,
        })
    }

    pub fn rank(&self) -> usize {
        self.dims.rank()
    }

    pub fn dimensions(&self) -> &[u64] {
        &self.dims.dimensions
    }

    pub fn chunks(&self) -> &[u64] {
        &self.dims.chunks
    }

    pub fn count_chunks(&self) -> u64 {
        self.dims.count_chunks()
    }

    pub fn count_chunks_in_array(&self, array_count: &[u64]) -> u64 {
        self.dims.count_chunks_in_array(array_count)
    }

    /// Worst-case element count of one chunk, in the internal (compressed)
    /// representation -- a full, non-edge chunk.
    pub fn chunk_element_count(&self) -> u64 {
        self.dims.chunk_element_count()
    }

    /// Byte size of the scratch chunk buffer callers must allocate.
    pub fn chunk_buffer_size(&self) -> u64 {
        self.chunk_element_count() * self.sizes.bytes_per_element_compressed as u64
    }

    /// Byte size of the scratch compressed-output buffer callers must
    /// allocate -- the entropy coder may write up to 32 elements of slack.
    pub fn compressed_chunk_buffer_size(&self) -> u64 {
        let n = self.chunk_element_count();
        (divide_rounded_up_u64(n, 256) + n + 32) * self.sizes.bytes_per_element_compressed as u64
    }

    pub fn element_sizes(&self) -> ElementSizes {
        self.sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_compression_and_type() {
        let err = CodecConfig::new(
            1.0,
            0.0,
            Compression::PforDelta2DInt16,
            DataType::Int32Array,
            vec![10],
            vec![5],
        )
        .unwrap_err();
        assert_eq!(err, CodecError::InvalidDataType);
    }

    #[test]
    fn test_rejects_rank_mismatch() {
        let err = CodecConfig::new(
            1.0,
            0.0,
            Compression::PforDelta2D,
            DataType::Int32Array,
            vec![10, 10],
            vec![5],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CodecError::RankMismatch {
                dims: 2,
                chunks: 1
            }
        );
    }

    #[test]
    fn test_sizing_queries_scenario_c() {
        let cfg = CodecConfig::new(
            1.0,
            0.0,
            Compression::PforDelta2D,
            DataType::Int32Array,
            vec![1000],
            vec![100],
        )
        .unwrap();
        assert_eq!(cfg.count_chunks(), 10);
        assert_eq!(cfg.chunk_buffer_size(), 400);
    }

    #[test]
    fn test_lossy_pipeline_has_narrower_compressed_size() {
        let cfg = CodecConfig::new(
            10.0,
            0.0,
            Compression::PforDelta2DInt16,
            DataType::FloatArray,
            vec![100],
            vec![50],
        )
        .unwrap();
        assert_eq!(cfg.chunk_buffer_size(), 50 * 2);
    }
}
