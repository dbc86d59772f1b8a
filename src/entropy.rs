//! Thin, shape-matching wrappers over the external PFor/FP-XOR entropy
//! coders.
//!
//! These are opaque primitives, vendored as part of the same
//! `om-file-format-sys` FFI crate the distilled codec core already binds:
//! a TurboPFor-family bit-packer for integers (zigzag-coded for signed
//! payloads, plain for unsigned) and an XOR-residual coder for float bit
//! patterns. This module only adapts their call shape to typed Rust
//! slices; it does not reimplement their bit-level format.
//!
//! Every encoder may write up to 32 elements of slack past the declared
//! count -- callers size scratch with [`crate::compression::p4nenc256_bound`].
//! Every decoder consumes exactly the compressed bytes belonging to the
//! declared element count and writes exactly that many elements.

use om_file_format_sys::{
    fpxdec32, fpxdec64, fpxenc32, fpxenc64, p4nddec128v16, p4nddec128v32, p4nddec64, p4nddec8,
    p4ndenc128v16, p4ndenc128v32, p4ndenc64, p4ndenc8, p4nzdec128v16, p4nzdec128v32, p4nzdec64,
    p4nzdec8, p4nzenc128v16, p4nzenc128v32, p4nzenc64, p4nzenc8,
};

macro_rules! zigzag_signed {
    ($encode_name:ident, $decode_name:ident, $c_encode:ident, $c_decode:ident, $t:ty) => {
        #[doc = concat!("Zigzag-PFor encode for signed `", stringify!($t), "` payloads.")]
        pub fn $encode_name(src: &mut [$t], dst: &mut [u8]) -> usize {
            unsafe { $c_encode(src.as_mut_ptr(), src.len(), dst.as_mut_ptr()) }
        }

        #[doc = concat!("Zigzag-PFor decode into `", stringify!($t), "` payloads.")]
        pub fn $decode_name(src: &mut [u8], n: usize, dst: &mut [$t]) -> usize {
            unsafe { $c_decode(src.as_mut_ptr(), n, dst.as_mut_ptr()) }
        }
    };
}

macro_rules! plain_unsigned {
    ($encode_name:ident, $decode_name:ident, $c_encode:ident, $c_decode:ident, $t:ty) => {
        #[doc = concat!("Plain-PFor encode for unsigned `", stringify!($t), "` payloads.")]
        pub fn $encode_name(src: &mut [$t], dst: &mut [u8]) -> usize {
            unsafe { $c_encode(src.as_mut_ptr(), src.len(), dst.as_mut_ptr()) }
        }

        #[doc = concat!("Plain-PFor decode into `", stringify!($t), "` payloads.")]
        pub fn $decode_name(src: &mut [u8], n: usize, dst: &mut [$t]) -> usize {
            unsafe { $c_decode(src.as_mut_ptr(), n, dst.as_mut_ptr()) }
        }
    };
}

zigzag_signed!(pfor_zigzag_encode8, pfor_zigzag_decode8, p4nzenc8, p4nzdec8, i8);
zigzag_signed!(
    pfor_zigzag_encode16,
    pfor_zigzag_decode16,
    p4nzenc128v16,
    p4nzdec128v16,
    i16
);
zigzag_signed!(
    pfor_zigzag_encode32,
    pfor_zigzag_decode32,
    p4nzenc128v32,
    p4nzdec128v32,
    i32
);
zigzag_signed!(
    pfor_zigzag_encode64,
    pfor_zigzag_decode64,
    p4nzenc64,
    p4nzdec64,
    i64
);

plain_unsigned!(pfor_plain_encode8, pfor_plain_decode8, p4ndenc8, p4nddec8, u8);
plain_unsigned!(
    pfor_plain_encode16,
    pfor_plain_decode16,
    p4ndenc128v16,
    p4nddec128v16,
    u16
);
plain_unsigned!(
    pfor_plain_encode32,
    pfor_plain_decode32,
    p4ndenc128v32,
    p4nddec128v32,
    u32
);
plain_unsigned!(
    pfor_plain_encode64,
    pfor_plain_decode64,
    p4ndenc64,
    p4nddec64,
    u64
);

/// FP-XOR encode of 32-bit float bit patterns.
pub fn fpx_encode32(src: &mut [u32], dst: &mut [u8]) -> usize {
    unsafe { fpxenc32(src.as_mut_ptr(), src.len(), dst.as_mut_ptr(), 0) }
}

/// FP-XOR decode into 32-bit float bit patterns.
pub fn fpx_decode32(src: &mut [u8], n: usize, dst: &mut [u32]) -> usize {
    unsafe { fpxdec32(src.as_mut_ptr(), n, dst.as_mut_ptr(), 0) }
}

/// FP-XOR encode of 64-bit float bit patterns.
pub fn fpx_encode64(src: &mut [u64], dst: &mut [u8]) -> usize {
    unsafe { fpxenc64(src.as_mut_ptr(), src.len(), dst.as_mut_ptr(), 0) }
}

/// FP-XOR decode into 64-bit float bit patterns.
pub fn fpx_decode64(src: &mut [u8], n: usize, dst: &mut [u64]) -> usize {
    unsafe { fpxdec64(src.as_mut_ptr(), n, dst.as_mut_ptr(), 0) }
}

/// The 64-bit plain-PFor encoder, reused by the LUT compressor over
/// cumulative byte offset deltas (see [`crate::lut`]).
pub fn lut_encode(src: &mut [u64], dst: &mut [u8]) -> usize {
    pfor_plain_encode64(src, dst)
}

/// The 64-bit plain-PFor decoder, reused by the LUT block reader.
pub fn lut_decode(src: &mut [u8], n: usize, dst: &mut [u64]) -> usize {
    pfor_plain_decode64(src, n, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::p4nenc256_bound;

    #[test]
    fn test_fpx32_roundtrip() {
        let mut data: Vec<u32> = vec![10.0f32, 22.0, 23.0, 24.0]
            .into_iter()
            .map(f32::to_bits)
            .collect();
        let mut compressed = vec![0u8; p4nenc256_bound(data.len(), 4)];
        let written = fpx_encode32(&mut data, &mut compressed);
        assert!(written > 0);
        let mut decoded = vec![0u32; data.len()];
        let consumed = fpx_decode32(&mut compressed, data.len(), &mut decoded);
        assert_eq!(consumed, written);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_pfor_zigzag16_roundtrip() {
        let mut data: Vec<i16> = vec![-5, 0, 1, 2, -3, 100, -100, 32000];
        let original = data.clone();
        let mut compressed = vec![0u8; p4nenc256_bound(data.len(), 2)];
        let written = pfor_zigzag_encode16(&mut data, &mut compressed);
        let mut decoded = vec![0i16; original.len()];
        pfor_zigzag_decode16(&mut compressed, original.len(), &mut decoded);
        assert_eq!(decoded, original);
        assert!(written <= compressed.len());
    }

    #[test]
    fn test_lut_encode_decode_roundtrip() {
        let mut offsets: Vec<u64> = (0..300).map(|i| i * 137).collect();
        let original = offsets.clone();
        let mut out = vec![0u8; p4nenc256_bound(offsets.len(), 8)];
        lut_encode(&mut offsets, &mut out);
        let mut back = vec![0u64; original.len()];
        lut_decode(&mut out, original.len(), &mut back);
        assert_eq!(back, original);
    }
}
