use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ivx_core::{ContentRef, DomainError, ProductId};

/// Whether a product ships physically or is delivered digitally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Physical,
    Digital,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Physical => "physical",
            ProductType::Digital => "digital",
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ProductType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "physical" => Ok(ProductType::Physical),
            "digital" => Ok(ProductType::Digital),
            _ => Err(DomainError::validation(
                "type must be one of: physical, digital",
            )),
        }
    }
}

/// Price in the smallest currency unit (cents).
///
/// On the wire a price is a decimal number in major units (`29.99`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Largest major-unit amount whose cent value still fits in a `u64`.
    pub const MAX_MAJOR: f64 = (u64::MAX / 100) as f64;

    /// Convert a major-unit amount, rounding to the nearest cent.
    pub fn from_major(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(format!(
                "price must be a non-negative number, got {amount}"
            )));
        }
        if amount > Self::MAX_MAJOR {
            return Err(DomainError::validation(format!(
                "price is out of range, got {amount}"
            )));
        }
        Ok(Self((amount * 100.0).round() as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_major(amount).map_err(serde::de::Error::custom)
    }
}

/// A purchasable catalog record.
///
/// Products are immutable once loaded; the optional `for` association ties a
/// product to the video or event whose shelf it appears on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    price: Price,
    #[serde(rename = "type")]
    kind: ProductType,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    target: Option<ContentRef>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: Price, kind: ProductType) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            kind,
            tags: Vec::new(),
            image: None,
            target: None,
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn for_content(mut self, target: ContentRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn kind(&self) -> ProductType {
        self.kind
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn target(&self) -> Option<&ContentRef> {
        self.target.as_ref()
    }

    /// True when this product belongs on the shelf of `target`.
    pub fn is_for(&self, target: &ContentRef) -> bool {
        self.target.as_ref() == Some(target)
    }

    /// Case-insensitive substring match against title or any tag.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// Validate invariants that serde alone cannot express.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {}: title must not be empty",
                self.id
            )));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(DomainError::validation(format!(
                "product {}: tags must not be blank",
                self.id
            )));
        }
        Ok(())
    }
}
