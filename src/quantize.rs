//! Element-wise conversion between the user's data type and the codec's
//! internal type.
//!
//! Every variant processes `length` elements contiguously out of `src` into
//! `dst`, taking `scale_factor`/`add_offset` even where it ignores them, so
//! all eleven share one call shape and can be selected once, as a function
//! pointer, at configuration time (see [`crate::config`]).
//!
//! Rounding uses `f32::round`/`f64::round`, i.e. round-half-away-from-zero.
//! Saturation always clamps before the cast; it never relies on modular
//! truncation.

/// Straight byte-for-byte copy, ignoring `scale_factor`/`add_offset`.
pub fn copy<T: Copy>(length: usize, src: &[T], dst: &mut [T]) {
    dst[..length].copy_from_slice(&src[..length]);
}

/// `q = round(x * scale + offset)`, clamped to `i16`, `NaN -> i16::MAX`.
pub fn float_to_int16_linear(
    length: usize,
    scale_factor: f32,
    add_offset: f32,
    src: &[f32],
    dst: &mut [i16],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val.is_nan() {
            i16::MAX
        } else {
            let scaled = val * scale_factor + add_offset;
            scaled.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
        };
    }
}

/// `q = round(x * scale + offset)`, clamped to `i32`, `NaN -> i32::MAX`.
pub fn float_to_int32_linear(
    length: usize,
    scale_factor: f32,
    add_offset: f32,
    src: &[f32],
    dst: &mut [i32],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val.is_nan() {
            i32::MAX
        } else {
            let scaled = val * scale_factor + add_offset;
            scaled.round().clamp(i32::MIN as f32, i32::MAX as f32) as i32
        };
    }
}

/// `q = round(x * scale + offset)` in double precision, `NaN -> i64::MAX`.
pub fn double_to_int64_linear(
    length: usize,
    scale_factor: f32,
    add_offset: f32,
    src: &[f64],
    dst: &mut [i64],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val.is_nan() {
            i64::MAX
        } else {
            let scaled = val * scale_factor as f64 + add_offset as f64;
            scaled.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64
        };
    }
}

/// `q = round(log10(1 + x) * scale)`. `add_offset` is ignored on encode to
/// keep the inverse in [`int16_to_float_log10`] symmetric.
pub fn float_to_int16_log10(
    length: usize,
    scale_factor: f32,
    _add_offset: f32,
    src: &[f32],
    dst: &mut [i16],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val.is_nan() {
            i16::MAX
        } else {
            let scaled = (1.0 + val).log10() * scale_factor;
            scaled.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
        };
    }
}

/// `x = q/scale - offset`, sentinel `i16::MAX -> NaN`.
pub fn int16_to_float_linear(
    length: usize,
    scale_factor: f32,
    add_offset: f32,
    src: &[i16],
    dst: &mut [f32],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val == i16::MAX {
            f32::NAN
        } else {
            val as f32 / scale_factor - add_offset
        };
    }
}

/// `x = q/scale - offset`, sentinel `i32::MAX -> NaN`.
pub fn int32_to_float_linear(
    length: usize,
    scale_factor: f32,
    add_offset: f32,
    src: &[i32],
    dst: &mut [f32],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val == i32::MAX {
            f32::NAN
        } else {
            val as f32 / scale_factor - add_offset
        };
    }
}

/// `x = q/scale - offset` in double precision, sentinel `i64::MAX -> NaN`.
pub fn int64_to_double_linear(
    length: usize,
    scale_factor: f32,
    add_offset: f32,
    src: &[i64],
    dst: &mut [f64],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val == i64::MAX {
            f64::NAN
        } else {
            val as f64 / scale_factor as f64 - add_offset as f64
        };
    }
}

/// `x = 10^(q/scale) - 1`, sentinel `i16::MAX -> NaN`, `add_offset` ignored.
pub fn int16_to_float_log10(
    length: usize,
    scale_factor: f32,
    _add_offset: f32,
    src: &[i16],
    dst: &mut [f32],
) {
    for i in 0..length {
        let val = src[i];
        dst[i] = if val == i16::MAX {
            f32::NAN
        } else {
            10f32.powf(val as f32 / scale_factor) - 1.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_to_int16_linear_nan_sentinel() {
        let src = [f32::NAN, 0.0, 0.1, 0.2];
        let mut dst = [0i16; 4];
        float_to_int16_linear(4, 10.0, 0.0, &src, &mut dst);
        assert_eq!(dst[0], i16::MAX);
        assert_eq!(dst[1], 0);
        assert_eq!(dst[2], 1);
        assert_eq!(dst[3], 2);
    }

    #[test]
    fn test_float_int16_roundtrip_within_half_scale_scenario_b() {
        // scenario B: scale=10, values recovered to +/-0.05
        let src = [f32::NAN, 0.0, 0.1, 0.2];
        let mut q = [0i16; 4];
        float_to_int16_linear(4, 10.0, 0.0, &src, &mut q);
        let mut back = [0f32; 4];
        int16_to_float_linear(4, 10.0, 0.0, &q, &mut back);
        assert!(back[0].is_nan());
        for i in 1..4 {
            assert!((back[i] - src[i]).abs() <= 0.05 + f32::EPSILON);
        }
    }

    #[test]
    fn test_log10_quantiser_scenario_f() {
        let src = [0.0f32, 9.0, 99.0];
        let mut q = [0i16; 3];
        float_to_int16_log10(3, 100.0, 0.0, &src, &mut q);
        assert_eq!(q, [0, 200, 200]);
        let mut back = [0f32; 3];
        int16_to_float_log10(3, 100.0, 0.0, &q, &mut back);
        let tolerance = 10f32.powf(1.0 / 100.0) - 1.0;
        for i in 0..3 {
            assert!((back[i] - src[i]).abs() <= tolerance * (1.0 + src[i]));
        }
    }

    #[test]
    fn test_log10_ignores_add_offset() {
        let src = [5.0f32];
        let mut q_with_offset = [0i16; 1];
        let mut q_without_offset = [0i16; 1];
        float_to_int16_log10(1, 50.0, 100.0, &src, &mut q_with_offset);
        float_to_int16_log10(1, 50.0, 0.0, &src, &mut q_without_offset);
        assert_eq!(q_with_offset, q_without_offset);
    }

    #[test]
    fn test_int64_sentinel_roundtrip() {
        let src = [f64::NAN, 42.5];
        let mut q = [0i64; 2];
        double_to_int64_linear(2, 2.0, 0.0, &src, &mut q);
        assert_eq!(q[0], i64::MAX);
        let mut back = [0f64; 2];
        int64_to_double_linear(2, 2.0, 0.0, &q, &mut back);
        assert!(back[0].is_nan());
        assert_eq!(back[1], 42.5);
    }

    #[test]
    fn test_clamp_never_wraps() {
        let src = [1e30f32, -1e30f32];
        let mut dst = [0i16; 2];
        float_to_int16_linear(2, 1.0, 0.0, &src, &mut dst);
        assert_eq!(dst[0], i16::MAX);
        assert_eq!(dst[1], i16::MIN);
    }

    #[test]
    fn test_straight_copy() {
        let src = [1u32, 2, 3, 4];
        let mut dst = [0u32; 4];
        copy(4, &src, &mut dst);
        assert_eq!(dst, src);
    }
}
