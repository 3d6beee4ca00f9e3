/// Iterator module for keyline
///
/// Provides a forward-only, restartable cursor over a bounded sub-range of a
/// registry's merged key sequence.
///
/// # Lifecycle
///
/// ```text
///   new() / reset()
///         ↓
///     PreFirst ──advance()=true──→ At(first) ──advance()=true──→ At(first+1) ...
///         │                            │
///         └──────advance()=false───────┴──→ Exhausted (until reset())
/// ```
///
/// Construction never positions the cursor; the first `advance()` does. This
/// lets callers drive it with a plain `while iter.advance() { .. }` loop:
///
/// ```ignore
/// let mut iter = registry.get_iterator(start, end);
/// while iter.advance() {
///     draw_point(iter.current_index().unwrap(), iter.current_key().unwrap());
/// }
/// ```
///
/// An iterator owns an `Arc` snapshot of the merged keys, so it stays valid
/// (and unchanged) even if the registry is rebuilt while it is alive.
mod range_iterator;

pub use range_iterator::RangeIterator;
