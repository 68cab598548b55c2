//! Page Key Module
//!
//! Integer page cursor used by the remote provider's pagination.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Page Key ==
/// A page position, always >= 1. Page 1 is the first page; there is no page 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageKey(u32);

impl PageKey {
    /// Key of the first page.
    pub const INITIAL: PageKey = PageKey(1);

    /// Creates a key, returning `None` for 0.
    pub fn new(value: u32) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// Returns the raw page number.
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_initial(self) -> bool {
        self == Self::INITIAL
    }

    /// Key of the preceding page, `None` on the first page.
    pub fn prev(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    /// Key of the following page, `None` on overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<u32> for PageKey {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "page key must be >= 1".to_string())
    }
}

impl From<PageKey> for u32 {
    fn from(key: PageKey) -> Self {
        key.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_a_key() {
        assert!(PageKey::new(0).is_none());
        assert_eq!(PageKey::new(1), Some(PageKey::INITIAL));
    }

    #[test]
    fn test_adjacent_keys() {
        let key = PageKey::new(5).unwrap();
        assert_eq!(key.prev().map(PageKey::get), Some(4));
        assert_eq!(key.next().map(PageKey::get), Some(6));
        assert!(PageKey::INITIAL.prev().is_none());
        assert!(PageKey::new(u32::MAX).unwrap().next().is_none());
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<PageKey>("0").is_err());
        let key: PageKey = serde_json::from_str("3").unwrap();
        assert_eq!(key.get(), 3);
    }
}
