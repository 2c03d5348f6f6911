//! Paginated response envelope.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::links::page_link;
use crate::{PageRequest, PageSize, PaginationError};

/// One page of results plus navigation links.
///
/// Serialises as `{"count", "next", "previous", "results"}`; `next` and
/// `previous` are `null` at the ends of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute link to the following page, if any.
    pub next: Option<String>,
    /// Absolute link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble the envelope for `request` given the collection `total` and
    /// the already-sliced `results`.
    ///
    /// Page 1 of an empty collection is valid and yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::OutOfRange`] when `request` lies beyond the
    /// last page.
    pub fn assemble(
        request: PageRequest,
        size: PageSize,
        total: u64,
        results: Vec<T>,
        base: &Url,
    ) -> Result<Self, PaginationError> {
        let last = size.page_count(total);
        let number = request.number();
        if number > last {
            return Err(PaginationError::OutOfRange {
                requested: number,
                last,
            });
        }

        let next = (number < last).then(|| page_link(base, number.saturating_add(1)));
        let previous = (number > 1).then(|| page_link(base, number.saturating_sub(1)));
        Ok(Self {
            count: total,
            next,
            previous,
            results,
        })
    }

    /// Convert every result while keeping the envelope metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let Self {
            count,
            next,
            previous,
            results,
        } = self;
        Page {
            count,
            next,
            previous,
            results: results.into_iter().map(f).collect(),
        }
    }
}
