//! Multi-source sorted-key registry.
//!
//! Merges several ascending key sources into one deduplicated sequence and
//! maps between keys (e.g. timestamps) and their ordinal indices, with
//! fractional interpolation between data points.
//!
//! ```
//! use std::sync::Arc;
//!
//! use keyline::{Registry, RowTable};
//!
//! let mut registry = Registry::new();
//! registry.add_source(Arc::new(RowTable::from_keys(vec![0.0, 10.0, 20.0]).unwrap()));
//! registry.add_source(Arc::new(RowTable::from_keys(vec![5.0, 10.0, 15.0]).unwrap()));
//! registry.set_dirty();
//! registry.update().unwrap();
//!
//! assert_eq!(registry.keys(), &[0.0, 5.0, 10.0, 15.0, 20.0]);
//! assert_eq!(registry.get_index(10.0), Some(2.0));
//! assert_eq!(registry.get_key(1.4), Some(7.0));
//! ```

pub mod iterator;
pub mod registry;
pub mod source;
pub mod statistics;
pub mod util;

pub use iterator::RangeIterator;
pub use registry::{MergeStrategy, Registry, RegistryOptions, Selection};
pub use source::{KeySource, RowTable};
pub use statistics::Statistics;
pub use util::{Key, Result, Status};
