//! The canonical cursor-page envelope returned by list operations.

use serde::{Deserialize, Serialize};

/// One page of a cursor-paginated listing.
///
/// Cursors are opaque strings; callers pass them back unchanged and never
/// parse them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> CursorPage<T> {
    /// Transform the items, keeping the cursor metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            prev_cursor: self.prev_cursor,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
