use serde::{Deserialize, Serialize};

use crate::util::Key;

/// Indices of the merged sequence that fall inside a queried key range
///
/// ```text
///  keys:      0     5     10    15    20
///  query:           |--6--------16-|
///                   ↑     ↑     ↑     ↑
///          pre_first  first  last  post_last
/// ```
///
/// `pre_first_index` and `post_last_index` are one step of context outside
/// the strict selection so renderers can draw lines and areas continuously
/// across the viewport edges: `first_index - 1` and `last_index + 1` where
/// those exist. When the range falls between two adjacent keys the
/// selection is empty and `post_last_index` equals `first_index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start_key: Key,
    pub end_key: Key,
    /// Fractional index of `start_key`
    pub start_index: Option<f64>,
    /// Fractional index of `end_key`
    pub end_index: Option<f64>,
    pub first_index: Option<usize>,
    pub pre_first_index: Option<usize>,
    pub last_index: Option<usize>,
    pub post_last_index: Option<usize>,
}

impl Selection {
    /// Compute a selection over `len` merged keys, given the fractional
    /// indices the registry resolved for both ends of the query.
    pub(crate) fn compute(
        len: usize,
        start_key: Key,
        end_key: Key,
        start_index: Option<f64>,
        end_index: Option<f64>,
    ) -> Self {
        let mut selection = Selection {
            start_key,
            end_key,
            start_index: None,
            end_index: None,
            first_index: None,
            pre_first_index: None,
            last_index: None,
            post_last_index: None,
        };
        if len == 0 {
            return selection;
        }

        selection.start_index = start_index;
        selection.end_index = end_index;

        let last_pos = (len - 1) as f64;
        let first = start_index.map(f64::ceil).filter(|&first| first <= last_pos);
        let last = end_index.map(f64::floor).filter(|&last| last >= 0.0);

        match (first, last) {
            // Entirely after the data
            (None, _) => {
                selection.pre_first_index = Some(len - 1);
            },
            // Entirely before the data
            (Some(first), None) => {
                selection.post_last_index = Some(first.max(0.0) as usize);
            },
            (Some(first), Some(last)) => {
                let first = first.clamp(0.0, last_pos) as usize;
                let last = last.clamp(0.0, last_pos) as usize;
                selection.first_index = Some(first);
                selection.last_index = Some(last);
                selection.pre_first_index = first.checked_sub(1);
                selection.post_last_index = (last < len - 1).then_some(last + 1);
            },
        }

        selection
    }

    /// No merged key lies inside the queried range.
    pub fn is_empty(&self) -> bool {
        self.visible_count() == 0
    }

    /// Number of merged keys inside the queried range.
    pub fn visible_count(&self) -> usize {
        match (self.first_index, self.last_index) {
            (Some(first), Some(last)) if last >= first => last - first + 1,
            _ => 0,
        }
    }
}
