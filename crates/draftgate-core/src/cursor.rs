//! Opaque cursors for keyset pagination.
//!
//! Listings are ordered by `updated_at` descending, then by id descending.
//! A cursor records a direction and the key of the boundary item; the page is
//! recomputed from the key on every call, so records inserted or moved
//! between calls never cause an item to be skipped twice or shown twice on
//! the same page.
//!
//! On the wire a cursor is URL-safe base64 (no padding) of
//! `"<a|b>|<rfc3339 timestamp>|<id>"`.

use std::cmp::Ordering;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};

use draftgate_contracts::{
    error::{EngineError, EngineResult},
    page::CursorPage,
};

/// Position of an item in a listing.
///
/// `Ord` follows listing order: a key that sorts first is shown first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorKey {
    pub updated_at: DateTime<Utc>,
    pub id: String,
}

impl CursorKey {
    pub fn new(updated_at: DateTime<Utc>, id: impl Into<String>) -> Self {
        Self { updated_at, id: id.into() }
    }
}

impl Ord for CursorKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .updated_at
            .cmp(&self.updated_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for CursorKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Items strictly after the key.
    After,
    /// Items strictly before the key.
    Before,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub direction: Direction,
    pub key: CursorKey,
}

impl Cursor {
    pub fn after(key: CursorKey) -> Self {
        Self { direction: Direction::After, key }
    }

    pub fn before(key: CursorKey) -> Self {
        Self { direction: Direction::Before, key }
    }

    pub fn encode(&self) -> String {
        let tag = match self.direction {
            Direction::After => "a",
            Direction::Before => "b",
        };
        let raw = format!(
            "{}|{}|{}",
            tag,
            self.key.updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            self.key.id
        );
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    /// Parse a cursor previously produced by [`Cursor::encode`].
    ///
    /// Anything else is a `Validation` error.
    pub fn decode(encoded: &str) -> EngineResult<Self> {
        let invalid = || EngineError::validation(format!("cursor '{}' is not valid", encoded));

        let bytes = URL_SAFE_NO_PAD.decode(encoded.trim()).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;

        let mut parts = raw.splitn(3, '|');
        let direction = match parts.next() {
            Some("a") => Direction::After,
            Some("b") => Direction::Before,
            _ => return Err(invalid()),
        };
        let updated_at = parts
            .next()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .ok_or_else(invalid)?;
        let id = parts.next().filter(|id| !id.is_empty()).ok_or_else(invalid)?;

        Ok(Self { direction, key: CursorKey::new(updated_at, id) })
    }
}

/// Cut one page out of `items`.
///
/// `items` must already be sorted in listing order (ascending `CursorKey`).
/// Without a cursor the first page is returned. `has_next` and `has_prev`
/// are true exactly when the matching cursor is present.
pub fn paginate<T>(
    mut items: Vec<T>,
    cursor: Option<&Cursor>,
    page_size: usize,
    key: impl Fn(&T) -> CursorKey,
) -> CursorPage<T> {
    let len = items.len();
    let (start, end) = match cursor {
        None => (0, page_size.min(len)),
        Some(c) => match c.direction {
            Direction::After => {
                let start = items.partition_point(|item| key(item) <= c.key);
                (start, start.saturating_add(page_size).min(len))
            }
            Direction::Before => {
                let end = items.partition_point(|item| key(item) < c.key);
                (end.saturating_sub(page_size), end)
            }
        },
    };

    items.truncate(end);
    let page: Vec<T> = items.drain(start..).collect();

    let next_cursor = if end < len {
        page.last().map(|item| Cursor::after(key(item)).encode())
    } else {
        None
    };
    let prev_cursor = if start > 0 {
        page.first().map(|item| Cursor::before(key(item)).encode())
    } else {
        None
    };

    CursorPage {
        items: page,
        has_next: next_cursor.is_some(),
        has_prev: prev_cursor.is_some(),
        next_cursor,
        prev_cursor,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use draftgate_contracts::error::EngineError;

    use super::{paginate, Cursor, CursorKey};

    fn keys(n: i64) -> Vec<CursorKey> {
        let base = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        let mut keys: Vec<CursorKey> = (0..n)
            .map(|i| CursorKey::new(base + Duration::minutes(i), format!("id-{i:02}")))
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_listing_order_is_newest_first() {
        let keys = keys(3);
        assert_eq!(keys[0].id, "id-02");
        assert_eq!(keys[2].id, "id-00");

        // Equal timestamps fall back to id descending.
        let ts = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        assert!(CursorKey::new(ts, "b") < CursorKey::new(ts, "a"));
    }

    #[test]
    fn test_cursor_encoding_is_stable_and_url_safe() {
        let key = keys(1).remove(0);
        let cursor = Cursor::after(key);
        let encoded = cursor.encode();
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn test_garbage_cursor_is_validation_error() {
        for bad in ["", "!!!", "Zm9v", "YXxub3QtYS1kYXRlfGlk"] {
            assert!(
                matches!(Cursor::decode(bad), Err(EngineError::Validation { .. })),
                "cursor {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_forward_then_backward_walk() {
        let items = keys(5);

        let first = paginate(items.clone(), None, 2, Clone::clone);
        assert_eq!(first.items.iter().map(|k| k.id.as_str()).collect::<Vec<_>>(), ["id-04", "id-03"]);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let next = Cursor::decode(first.next_cursor.as_deref().unwrap()).unwrap();
        let second = paginate(items.clone(), Some(&next), 2, Clone::clone);
        assert_eq!(second.items.iter().map(|k| k.id.as_str()).collect::<Vec<_>>(), ["id-02", "id-01"]);
        assert!(second.has_next);
        assert!(second.has_prev);

        let next = Cursor::decode(second.next_cursor.as_deref().unwrap()).unwrap();
        let last = paginate(items.clone(), Some(&next), 2, Clone::clone);
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_next);
        assert!(last.next_cursor.is_none());

        let prev = Cursor::decode(second.prev_cursor.as_deref().unwrap()).unwrap();
        let back = paginate(items, Some(&prev), 2, Clone::clone);
        assert_eq!(back.items, first.items);
        assert!(!back.has_prev);
    }

    #[test]
    fn test_page_larger_than_listing() {
        let page = paginate(keys(3), None, 10, Clone::clone);
        assert_eq!(page.items.len(), 3);
        assert!(!page.has_next);
        assert!(!page.has_prev);

        let empty = paginate(Vec::<CursorKey>::new(), None, 10, Clone::clone);
        assert!(empty.items.is_empty());
        assert!(empty.next_cursor.is_none());
    }
}
