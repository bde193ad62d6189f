//! Content references: which video or event a product shelf belongs to.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::ContentId;

/// Kind of content item a product can be associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Event,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Event => "event",
        }
    }
}

impl core::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ContentKind::Video),
            "event" => Ok(ContentKind::Event),
            other => Err(DomainError::validation(format!("invalid kind: {other}"))),
        }
    }
}

/// A `(kind, id)` pair identifying one content item.
///
/// This is both the `for` association on a product and the user's current
/// shelf selection. Its textual form `"<kind>:<id>"` doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: ContentId,
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: ContentId) -> Self {
        Self { kind, id }
    }

    pub fn video(id: impl AsRef<str>) -> Result<Self, DomainError> {
        Ok(Self::new(ContentKind::Video, ContentId::parse(id)?))
    }

    pub fn event(id: impl AsRef<str>) -> Result<Self, DomainError> {
        Ok(Self::new(ContentKind::Event, ContentId::parse(id)?))
    }

    /// Cache key in the `"<kind>:<id>"` form.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

impl core::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for ContentRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| DomainError::validation(format!("expected <kind>:<id>, got {s:?}")))?;
        Ok(Self::new(kind.parse()?, id.parse()?))
    }
}
