//! In-place 2-D delta/XOR predictor.
//!
//! Operates on a buffer viewed as `[length0][length1]` in row-major order.
//! Forward (encode) subtracts the previous row from each row, bottom row
//! first so the subtrahend hasn't been overwritten yet. Inverse (decode)
//! adds the previous row to each row, top row first. Both run in `O(1)`
//! extra space and are exact inverses of each other.
//!
//! Arithmetic wraps modulo 2^W rather than panicking or invoking undefined
//! behaviour on signed overflow -- this is load-bearing: quantised values
//! are expected to wrap, and the decode path must wrap identically to
//! recover the original bit pattern.

macro_rules! delta2d_int {
    ($decode:ident, $encode:ident, $t:ty) => {
        #[doc = concat!("Inverse delta decode for `", stringify!($t), "`.")]
        pub fn $decode(length0: usize, length1: usize, chunk_buffer: &mut [$t]) {
            if length0 <= 1 {
                return;
            }
            for d0 in 1..length0 {
                for d1 in 0..length1 {
                    let index = d0 * length1 + d1;
                    // Represents the index of the previous element in a 2D delta calculation.
                    let prev_index = (d0 - 1) * length1 + d1;
                    chunk_buffer[index] = chunk_buffer[index].wrapping_add(chunk_buffer[prev_index]);
                }
            }
        }

        #[doc = concat!("Forward delta encode for `", stringify!($t), "`.")]
        pub fn $encode(length0: usize, length1: usize, chunk_buffer: &mut [$t]) {
            if length0 <= 1 {
                return;
            }
            for d0 in (1..length0).rev() {
                for d1 in 0..length1 {
                    let index = d0 * length1 + d1;
                    let prev_index = (d0 - 1) * length1 + d1;
                    chunk_buffer[index] = chunk_buffer[index].wrapping_sub(chunk_buffer[prev_index]);
                }
            }
        }
    };
}

delta2d_int!(delta2d_decode8, delta2d_encode8, i8);
delta2d_int!(delta2d_decode16, delta2d_encode16, i16);
delta2d_int!(delta2d_decode32, delta2d_encode32, i32);
delta2d_int!(delta2d_decode64, delta2d_encode64, i64);

macro_rules! delta2d_xor_float {
    ($decode:ident, $encode:ident, $float:ty, $bits:ty) => {
        #[doc = concat!("Inverse XOR delta decode for `", stringify!($float), "` bit patterns.")]
        pub fn $decode(length0: usize, length1: usize, chunk_buffer: &mut [$float]) {
            if length0 <= 1 {
                return;
            }
            for d0 in 1..length0 {
                for d1 in 0..length1 {
                    let index = d0 * length1 + d1;
                    let prev_index = (d0 - 1) * length1 + d1;
                    let xored: $bits =
                        chunk_buffer[index].to_bits() ^ chunk_buffer[prev_index].to_bits();
                    chunk_buffer[index] = <$float>::from_bits(xored);
                }
            }
        }

        #[doc = concat!("Forward XOR delta encode for `", stringify!($float), "` bit patterns. Self-inverse with the decode above.")]
        pub fn $encode(length0: usize, length1: usize, chunk_buffer: &mut [$float]) {
            if length0 <= 1 {
                return;
            }
            for d0 in (1..length0).rev() {
                for d1 in 0..length1 {
                    let index = d0 * length1 + d1;
                    let prev_index = (d0 - 1) * length1 + d1;
                    let xored: $bits =
                        chunk_buffer[index].to_bits() ^ chunk_buffer[prev_index].to_bits();
                    chunk_buffer[index] = <$float>::from_bits(xored);
                }
            }
        }
    };
}

delta2d_xor_float!(delta2d_decode_xor32, delta2d_encode_xor32, f32, u32);
delta2d_xor_float!(delta2d_decode_xor64, delta2d_encode_xor64, f64, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta2d_decode16() {
        let mut buffer: Vec<i16> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        delta2d_decode16(2, 5, &mut buffer);
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 7, 9, 11, 13, 15]);
    }

    #[test]
    fn test_delta2d_encode16() {
        let mut buffer: Vec<i16> = vec![1, 2, 3, 4, 5, 7, 9, 11, 13, 15];
        delta2d_encode16(2, 5, &mut buffer);
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_delta2d_scenario_a() {
        // dims=[2,3], input [[1,2,3],[4,6,8]] -> encoded second row [3,4,5]
        let mut buffer: Vec<i16> = vec![1, 2, 3, 4, 6, 8];
        delta2d_encode16(2, 3, &mut buffer);
        assert_eq!(buffer, vec![1, 2, 3, 3, 4, 5]);
        delta2d_decode16(2, 3, &mut buffer);
        assert_eq!(buffer, vec![1, 2, 3, 4, 6, 8]);
    }

    #[test]
    fn test_single_row_is_noop() {
        let mut buffer: Vec<u32> = vec![1, 2, 3];
        let as_i32: &mut [i32] = crate::aligned_buffer::as_typed_slice_mut(&mut buffer);
        delta2d_encode32(1, 3, as_i32);
        assert_eq!(buffer, vec![1, 2, 3]);
    }

    #[test]
    fn test_delta2d_wraps_on_overflow() {
        let mut buffer: Vec<i8> = vec![0, -128, 127];
        delta2d_encode8(3, 1, &mut buffer);
        delta2d_decode8(3, 1, &mut buffer);
        assert_eq!(buffer, vec![0, -128, 127]);
    }

    #[test]
    fn test_delta2d_xor_roundtrip32() {
        let original: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let mut buffer = original.clone();
        delta2d_encode_xor32(2, 5, &mut buffer);
        delta2d_decode_xor32(2, 5, &mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_delta2d_xor_roundtrip64_with_nan_and_neg_zero() {
        let original: Vec<f64> = vec![f64::NAN, -0.0, 3.5, -7.25];
        let mut buffer = original.clone();
        delta2d_encode_xor64(2, 2, &mut buffer);
        delta2d_decode_xor64(2, 2, &mut buffer);
        assert!(buffer[0].is_nan() && buffer[0].is_sign_positive());
        assert_eq!(buffer[1].to_bits(), (-0.0f64).to_bits());
        assert_eq!(buffer[2], 3.5);
        assert_eq!(buffer[3], -7.25);
    }

    #[test]
    fn test_identity_permutation_is_monotone_noop_scenario_c() {
        // length0=1 leaves the buffer untouched
        let data: Vec<i32> = (0..100).collect();
        let mut buffer = data.clone();
        delta2d_encode32(1, 100, &mut buffer);
        assert_eq!(buffer, data);
    }
}
