use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for per-cycle amounts and cycle times so that sums, comparisons and
/// stored values are exact and platform independent.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use for input parsing and tests.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert an f64 to Fixed64, or `None` for NaN, infinities and values
/// outside the representable range.
#[inline]
pub fn checked_from_f64(v: f64) -> Option<Fixed64> {
    Fixed64::checked_from_num(v)
}

/// Checked addition for Fixed64 that returns None on overflow.
#[inline]
pub fn checked_add_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_add(b)
}

/// Raw bit pattern, for lossless storage.
#[inline]
pub fn fixed64_to_bits(v: Fixed64) -> i64 {
    v.to_bits()
}

/// Inverse of [`fixed64_to_bits`].
#[inline]
pub fn fixed64_from_bits(bits: i64) -> Fixed64 {
    Fixed64::from_bits(bits)
}
