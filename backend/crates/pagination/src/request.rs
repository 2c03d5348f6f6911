//! Page number parsing and window computation.

use std::num::NonZeroU32;

use crate::PaginationError;

/// Number of items served per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Build a page size, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub fn new(size: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(size)
            .map(Self)
            .ok_or(PaginationError::ZeroPageSize)
    }

    /// Build a page size from an already non-zero value.
    #[must_use]
    pub const fn from_non_zero(size: NonZeroU32) -> Self {
        Self(size)
    }

    /// Page size as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Number of pages needed to hold `total` items. An empty collection
    /// still has one (empty) page.
    #[must_use]
    pub fn page_count(self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.get())).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// A validated 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest(NonZeroU32);

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl PageRequest {
    /// The first page.
    #[must_use]
    pub const fn first() -> Self {
        Self(NonZeroU32::MIN)
    }

    /// Request a specific page number.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidNumber`] when `number` is zero.
    pub fn new(number: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(number)
            .map(Self)
            .ok_or_else(|| PaginationError::InvalidNumber {
                value: number.to_string(),
            })
    }

    /// Parse the raw `page` query parameter. A missing or blank parameter
    /// selects the first page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidNumber`] when the value is not a
    /// positive integer.
    pub fn parse(raw: Option<&str>) -> Result<Self, PaginationError> {
        let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self::first());
        };
        value
            .parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| PaginationError::InvalidNumber {
                value: value.to_owned(),
            })
    }

    /// Page number as a plain integer.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0.get()
    }

    /// Offset/limit window selecting this page.
    #[must_use]
    pub fn window(self, size: PageSize) -> PageWindow {
        let skipped_pages = u64::from(self.number().saturating_sub(1));
        PageWindow {
            offset: skipped_pages.saturating_mul(u64::from(size.get())),
            limit: u64::from(size.get()),
        }
    }
}

/// Slice of a collection a repository should load for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    offset: u64,
    limit: u64,
}

impl PageWindow {
    /// Build a window directly.
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }

    /// Maximum number of items to return.
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }
}
