//! The pipeline selector and the element-size table it drives.

use crate::data_type::DataType;
use crate::errors::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Compression {
    PforDelta2DInt16 = 0,
    FpxXor2D = 1,
    PforDelta2D = 2,
    PforDelta2DInt16Log = 3,
}

impl TryFrom<u8> for Compression {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Compression::*;
        Ok(match value {
            0 => PforDelta2DInt16,
            1 => FpxXor2D,
            2 => PforDelta2D,
            3 => PforDelta2DInt16Log,
            _ => return Err(CodecError::InvalidCompressionType),
        })
    }
}

/// User-side and internal (chunk-buffer) element widths, in bytes, for a
/// `(data_type, compression)` pair. These only diverge for the lossy
/// float-to-int16 pipelines, where the user sees 4-byte floats but the
/// chunk buffer holds 2-byte quantised integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSizes {
    pub bytes_per_element: usize,
    pub bytes_per_element_compressed: usize,
}

/// Derives the element sizes for a `(data_type, compression)` pair and
/// validates that the combination is legal. This is the only place the
/// pairing is checked; everything downstream trusts a constructed
/// [`crate::config::CodecConfig`].
pub fn element_sizes(
    data_type: DataType,
    compression: Compression,
) -> Result<ElementSizes, CodecError> {
    use Compression::*;
    use DataType::*;

    let native_width = match data_type {
        Int8Array | UInt8Array => 1,
        Int16Array | UInt16Array => 2,
        Int32Array | UInt32Array | FloatArray => 4,
        Int64Array | UInt64Array | DoubleArray => 8,
        _ => return Err(CodecError::InvalidDataType),
    };

    match compression {
        PforDelta2DInt16 | PforDelta2DInt16Log => {
            if data_type != FloatArray {
                return Err(CodecError::InvalidDataType);
            }
            Ok(ElementSizes {
                bytes_per_element: 4,
                bytes_per_element_compressed: 2,
            })
        }
        FpxXor2D => {
            if !matches!(data_type, FloatArray | DoubleArray) {
                return Err(CodecError::InvalidDataType);
            }
            Ok(ElementSizes {
                bytes_per_element: native_width,
                bytes_per_element_compressed: native_width,
            })
        }
        PforDelta2D => Ok(ElementSizes {
            bytes_per_element: native_width,
            bytes_per_element_compressed: native_width,
        }),
    }
}

/// For encoding: the compression library may read and write more data to
/// buffers than the declared element count.
/// <https://github.com/powturbo/TurboPFor-Integer-Compression/issues/59>
/// Only the output buffer for encoding needs this padding.
pub fn p4nenc256_bound(n: usize, bytes_per_element: usize) -> usize {
    ((n + 255) / 256 + (n + 32)) * bytes_per_element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_are_bit_exact() {
        assert_eq!(Compression::PforDelta2DInt16 as u8, 0);
        assert_eq!(Compression::FpxXor2D as u8, 1);
        assert_eq!(Compression::PforDelta2D as u8, 2);
        assert_eq!(Compression::PforDelta2DInt16Log as u8, 3);
    }

    #[test]
    fn test_int16_pipeline_requires_float() {
        assert_eq!(
            element_sizes(DataType::Int32Array, Compression::PforDelta2DInt16),
            Err(CodecError::InvalidDataType)
        );
        assert_eq!(
            element_sizes(DataType::FloatArray, Compression::PforDelta2DInt16),
            Ok(ElementSizes {
                bytes_per_element: 4,
                bytes_per_element_compressed: 2,
            })
        );
    }

    #[test]
    fn test_fpx_xor_requires_float_or_double() {
        assert_eq!(
            element_sizes(DataType::Int32Array, Compression::FpxXor2D),
            Err(CodecError::InvalidDataType)
        );
        assert_eq!(
            element_sizes(DataType::DoubleArray, Compression::FpxXor2D),
            Ok(ElementSizes {
                bytes_per_element: 8,
                bytes_per_element_compressed: 8,
            })
        );
    }

    #[test]
    fn test_pfor_delta2d_is_lossless_for_any_native_type() {
        for dt in [
            DataType::Int8Array,
            DataType::UInt16Array,
            DataType::Int64Array,
            DataType::FloatArray,
        ] {
            let sizes = element_sizes(dt, Compression::PforDelta2D).unwrap();
            assert_eq!(sizes.bytes_per_element, sizes.bytes_per_element_compressed);
        }
    }
}
