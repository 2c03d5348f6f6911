//! Classified ad aggregate, its validated fields and list filters.
//!
//! Field types validate on construction so services and adapters only ever
//! see well-formed ads. Validation failures carry a stable `(field, code)`
//! pair that the HTTP layer echoes in error `details`.

use std::fmt;

use chrono::{DateTime, Utc};
use pagination::PageWindow;

use crate::domain::UserId;

/// Maximum ad title length, in characters.
pub const TITLE_MAX: usize = 200;
/// Maximum ad description length, in characters.
pub const DESCRIPTION_MAX: usize = 1000;
/// Maximum category length, in characters.
pub const CATEGORY_MAX: usize = 64;

/// Validation errors raised by ad constructors and filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdValidationError {
    /// Identifier was zero or negative.
    InvalidId,
    /// Title blank after trimming.
    EmptyTitle,
    /// Title longer than [`TITLE_MAX`].
    TitleTooLong { max: usize },
    /// Description longer than [`DESCRIPTION_MAX`].
    DescriptionTooLong { max: usize },
    /// Price below zero.
    NegativePrice,
    /// Category blank after trimming.
    EmptyCategory,
    /// Category longer than [`CATEGORY_MAX`].
    CategoryTooLong { max: usize },
    /// `price_min` exceeds `price_max`.
    InvalidPriceRange,
}

impl AdValidationError {
    /// Name of the offending field as it appears in request payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::DescriptionTooLong { .. } => "description",
            Self::NegativePrice => "price",
            Self::EmptyCategory | Self::CategoryTooLong { .. } => "category",
            Self::InvalidPriceRange => "price_min",
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::DescriptionTooLong { .. } => "description_too_long",
            Self::NegativePrice => "negative_price",
            Self::EmptyCategory => "empty_category",
            Self::CategoryTooLong { .. } => "category_too_long",
            Self::InvalidPriceRange => "invalid_price_range",
        }
    }
}

impl fmt::Display for AdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "ad id must be a positive integer"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::CategoryTooLong { max } => {
                write!(f, "category must be at most {max} characters")
            }
            Self::InvalidPriceRange => write!(f, "price_min must not exceed price_max"),
        }
    }
}

impl std::error::Error for AdValidationError {}

/// Positive, store-assigned ad identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdId(i64);

impl AdId {
    /// Validate a raw identifier.
    pub fn new(id: i64) -> Result<Self, AdValidationError> {
        if id <= 0 {
            return Err(AdValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn trimmed_within(
    raw: &str,
    max: usize,
    empty: AdValidationError,
    too_long: AdValidationError,
) -> Result<String, AdValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Ad headline.
///
/// ## Invariants
/// - Trimmed, between 1 and [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdTitle(String);

impl AdTitle {
    /// Validate and construct a title.
    pub fn new(raw: &str) -> Result<Self, AdValidationError> {
        trimmed_within(
            raw,
            TITLE_MAX,
            AdValidationError::EmptyTitle,
            AdValidationError::TitleTooLong { max: TITLE_MAX },
        )
        .map(Self)
    }
}

impl AsRef<str> for AdTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Free-text ad body; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdDescription(String);

impl AdDescription {
    /// Validate and construct a description.
    pub fn new(raw: &str) -> Result<Self, AdValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > DESCRIPTION_MAX {
            return Err(AdValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AdDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-negative asking price in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    /// Validate and construct a price.
    pub fn new(amount: i64) -> Result<Self, AdValidationError> {
        if amount < 0 {
            return Err(AdValidationError::NegativePrice);
        }
        Ok(Self(amount))
    }

    /// Raw amount.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Classification used for exact-match filtering.
///
/// ## Invariants
/// - Trimmed, between 1 and [`CATEGORY_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    /// Validate and construct a category.
    pub fn new(raw: &str) -> Result<Self, AdValidationError> {
        trimmed_within(
            raw,
            CATEGORY_MAX,
            AdValidationError::EmptyCategory,
            AdValidationError::CategoryTooLong { max: CATEGORY_MAX },
        )
        .map(Self)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// The writable fields of an ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdContent {
    pub title: AdTitle,
    pub description: AdDescription,
    pub price: Price,
    pub category: Category,
}

/// Partial update: only `Some` fields change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdPatch {
    pub title: Option<AdTitle>,
    pub description: Option<AdDescription>,
    pub price: Option<Price>,
    pub category: Option<Category>,
}

impl AdPatch {
    /// Overlay this patch on `current`.
    pub fn apply(self, current: &AdContent) -> AdContent {
        AdContent {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            price: self.price.unwrap_or(current.price),
            category: self.category.unwrap_or_else(|| current.category.clone()),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }
}

/// Full replacement (`PUT`) or partial update (`PATCH`) of an ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdUpdate {
    /// Every writable field supplied.
    Replace(AdContent),
    /// Any subset of writable fields.
    Patch(AdPatch),
}

impl AdUpdate {
    /// Resolve the update against the stored content.
    pub fn resolve(self, current: &AdContent) -> AdContent {
        match self {
            Self::Replace(content) => content,
            Self::Patch(patch) => patch.apply(current),
        }
    }
}

/// Ad about to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAd {
    pub author: UserId,
    pub content: AdContent,
}

/// Persisted classified ad.
///
/// ## Invariants
/// - `author` is fixed at creation.
/// - `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ad {
    id: AdId,
    author: UserId,
    content: AdContent,
    created_at: DateTime<Utc>,
}

impl Ad {
    /// Rehydrate an ad from stored parts.
    pub fn new(id: AdId, author: UserId, content: AdContent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author,
            content,
            created_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> AdId {
        self.id
    }

    /// Owning user.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Writable fields.
    pub fn content(&self) -> &AdContent {
        &self.content
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this ad with replaced content.
    pub fn with_content(&self, content: AdContent) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }
}

/// Conjunctive list filter.
///
/// Blank text values are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdFilter {
    title: Option<String>,
    category: Option<String>,
    price_min: Option<Price>,
    price_max: Option<Price>,
}

impl AdFilter {
    /// Validate filter values.
    pub fn new(
        title: Option<&str>,
        category: Option<&str>,
        price_min: Option<i64>,
        price_max: Option<i64>,
    ) -> Result<Self, AdValidationError> {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let price_min = price_min.map(Price::new).transpose()?;
        let price_max = price_max.map(Price::new).transpose()?;
        if let (Some(min), Some(max)) = (price_min, price_max)
            && min > max
        {
            return Err(AdValidationError::InvalidPriceRange);
        }
        Ok(Self {
            title: non_blank(title),
            category: non_blank(category),
            price_min,
            price_max,
        })
    }

    /// Case-insensitive title substring.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Exact category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Inclusive lower price bound.
    pub fn price_min(&self) -> Option<Price> {
        self.price_min
    }

    /// Inclusive upper price bound.
    pub fn price_max(&self) -> Option<Price> {
        self.price_max
    }

    /// Whether `ad` satisfies every filter clause.
    pub fn matches(&self, ad: &Ad) -> bool {
        let content = ad.content();
        let title_ok = self.title.as_ref().is_none_or(|needle| {
            content
                .title
                .as_ref()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|category| content.category.as_ref() == category);
        let min_ok = self.price_min.is_none_or(|min| content.price >= min);
        let max_ok = self.price_max.is_none_or(|max| content.price <= max);
        title_ok && category_ok && min_ok && max_ok
    }
}

/// Repository list request: filter, optional author scope, and page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdListQuery {
    pub filter: AdFilter,
    pub author: Option<UserId>,
    pub window: PageWindow,
}

/// One window of ads plus the filtered collection size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdListing {
    pub total: u64,
    pub ads: Vec<Ad>,
}
