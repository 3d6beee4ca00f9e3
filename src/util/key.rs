use std::cmp::Ordering;

use crate::util::{Result, Status};

/// Position of a row on the primary axis, typically a timestamp.
///
/// Keys must be finite. Within one source they are strictly ascending.
pub type Key = f64;

/// Round half toward positive infinity.
///
/// `f64::round` rounds half away from zero, so `-2.5` would become `-3.0`;
/// interpolated keys use `-2.0` instead.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Order two finite keys.
///
/// Unlike `f64::total_cmp` this treats `-0.0` and `0.0` as the same key.
#[inline]
pub fn compare_keys(a: Key, b: Key) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Reject a key that is NaN or infinite.
pub fn check_finite(key: Key) -> Result<()> {
    if key.is_finite() {
        Ok(())
    } else {
        Err(Status::invalid_argument(format!("key {key} is not finite")))
    }
}

/// Verify that `keys` are finite and strictly ascending.
pub fn check_ascending(keys: &[Key]) -> Result<()> {
    let mut prev: Option<Key> = None;
    for (pos, &key) in keys.iter().enumerate() {
        check_finite(key)?;
        if let Some(prev) = prev
            && key <= prev
        {
            return Err(Status::out_of_order(format!(
                "key {key} at row {pos} does not sort after {prev}"
            )));
        }
        prev = Some(key);
    }
    Ok(())
}
