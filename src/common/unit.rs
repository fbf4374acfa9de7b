//! Unit conversion utilities.
//!
//! The deck schema measures geometry in inches and font sizes in points,
//! while PresentationML stores English Metric Units (EMU) and hundredths of
//! a point. Every conversion between the two goes through this module so
//! the builder and the inspector always agree on the factor.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;

/// Largest coordinate the builder emits (fits a signed 32-bit reader).
pub const MAX_EMU: i64 = i32::MAX as i64;

/// Round-trip tolerance for geometry, in inches.
///
/// Conversion rounds to the nearest EMU, so the real error is at most
/// half an EMU (about 5.5e-7 inch).
pub const GEOMETRY_EPSILON_IN: f64 = 1e-6;

/// Inches to EMU, rounded to the nearest unit.
#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn emu_to_cm(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_CM as f64
}

/// Largest inch value that still converts into [`MAX_EMU`].
#[inline]
pub fn max_inches() -> f64 {
    emu_to_inches(MAX_EMU)
}

/// Points to the `sz` attribute of `a:rPr` (hundredths of a point).
#[inline]
pub fn pt_to_centipoints(pt: f64) -> i64 {
    (pt * 100.0).round() as i64
}

#[inline]
pub fn centipoints_to_pt(centipoints: i64) -> f64 {
    centipoints as f64 / 100.0
}
