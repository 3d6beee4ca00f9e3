pub mod key;
pub mod status;

pub use key::{Key, check_ascending, check_finite, compare_keys, round_half_up};
pub use status::{Code, Result, Status};
