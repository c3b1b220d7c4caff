//! Category - Cheap-to-clone message category tag
//!
//! Uses Arc<str> internally; tags are normalised to lowercase ASCII so that
//! `"Download"` from an event source matches `"download"` in an allow-list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Category tag attached to a message by the event source.
///
/// The set of tags is defined outside the dispatcher; membership is only
/// checked against the configured allow-list.
///
/// # Examples
/// ```
/// use contracts::Category;
///
/// let tag: Category = "Download".into();
/// assert_eq!(tag, "download");
/// assert_eq!(tag.clone(), tag);
/// ```
#[derive(Clone, Default)]
pub struct Category(Arc<str>);

impl Category {
    /// Create a new Category, trimming and lowercasing the tag.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s.trim().to_ascii_lowercase()))
    }

    /// Get the normalised tag.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the tag is empty after normalisation
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Category {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Category {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Category {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({:?})", self.0)
    }
}

impl PartialEq for Category {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Category {}

impl PartialEq<str> for Category {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for Category {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Hash for Category {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
