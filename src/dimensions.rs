//! N-D array descriptor: total extents, chunk extents, and the chunk-grid
//! arithmetic shared by the encoder and decoder orchestrators.

use crate::errors::CodecError;
use crate::utils::divide_rounded_up_u64;

/// The logical shape of an array and the fixed chunk shape it is tiled
/// with. `dimensions.len() == chunks.len() == rank`.
#[derive(Debug, Clone)]
pub struct ArrayDescriptor {
    pub dimensions: Vec<u64>,
    pub chunks: Vec<u64>,
}

impl ArrayDescriptor {
    pub fn new(dimensions: Vec<u64>, chunks: Vec<u64>) -> Result<Self, CodecError> {
        if dimensions.len() != chunks.len() {
            return Err(CodecError::RankMismatch {
                dims: dimensions.len(),
                chunks: chunks.len(),
            });
        }
        Ok(Self { dimensions, chunks })
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Chunk grid extent along axis `i`: `ceil(dimensions[i] / chunks[i])`.
    pub fn n_chunks_in_dimension(&self, i: usize) -> u64 {
        divide_rounded_up_u64(self.dimensions[i], self.chunks[i])
    }

    /// Total number of chunks tiling the full array.
    pub fn count_chunks(&self) -> u64 {
        (0..self.rank())
            .map(|i| self.n_chunks_in_dimension(i))
            .product()
    }

    /// Number of chunks touched by a sub-region of shape `array_count`.
    pub fn count_chunks_in_array(&self, array_count: &[u64]) -> u64 {
        (0..self.rank())
            .map(|i| divide_rounded_up_u64(array_count[i], self.chunks[i]))
            .product()
    }

    /// Element count of one full (non-edge) chunk: `product(chunks)`.
    pub fn chunk_element_count(&self) -> u64 {
        self.chunks.iter().product()
    }
}
