//! Unit tests for shale-types

use crate::Offset;

// ============================================================================
// Offset Tests
// ============================================================================

#[test]
fn offset_from_u64_roundtrip() {
    let offset = Offset::new(42);
    let raw: u64 = offset.into();
    assert_eq!(raw, 42);
}

#[test]
fn offset_zero() {
    assert_eq!(Offset::ZERO.as_u64(), 0);
    assert_eq!(Offset::ZERO, Offset::default());
}

#[test]
fn offset_next() {
    assert_eq!(Offset::new(9).next(), Offset::new(10));
}

#[test]
fn offset_advance_by_count() {
    let base = Offset::new(100);
    assert_eq!(base + 5, Offset::new(105));
}

#[test]
fn offset_step_back() {
    assert_eq!(Offset::new(10) - 1, Offset::new(9));
}

#[test]
fn offset_distance() {
    let base = Offset::new(16);
    let absolute = Offset::new(19);
    assert_eq!(absolute - base, 3);
}

#[test]
fn offset_ordering() {
    assert!(Offset::new(1) < Offset::new(2));
    assert!(Offset::new(2) <= Offset::new(2));
}

#[test]
fn offset_display_is_decimal() {
    assert_eq!(Offset::new(1024).to_string(), "1024");
}
