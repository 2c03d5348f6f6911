//! Page-number pagination primitives shared by Skymarket list endpoints.
//!
//! The crate owns three concerns:
//!
//! - [`PageRequest`]: parsing the 1-based `page` query parameter.
//! - [`PageWindow`]: the offset/limit slice a repository should load.
//! - [`Page`]: the `{count, next, previous, results}` envelope, including
//!   absolute navigation links derived from the request URL.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest, PageSize};
//! use url::Url;
//!
//! let size = PageSize::new(4).expect("non-zero page size");
//! let request = PageRequest::parse(Some("2")).expect("valid page");
//! let window = request.window(size);
//! assert_eq!(window.offset(), 4);
//!
//! let url = Url::parse("https://market.example/api/v1/ads?page=2").expect("url");
//! let page = Page::assemble(request, size, 5, vec!["fifth"], &url).expect("page in range");
//! assert_eq!(page.count, 5);
//! assert_eq!(page.next, None);
//! assert_eq!(page.previous.as_deref(), Some("https://market.example/api/v1/ads"));
//! ```

mod envelope;
mod links;
mod request;

pub use envelope::Page;
pub use links::{PAGE_PARAM, page_link};
pub use request::{PageRequest, PageSize, PageWindow};

/// Errors raised while interpreting pagination input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The `page` parameter was not a positive integer.
    #[error("page must be a positive integer, got `{value}`")]
    InvalidNumber {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The requested page lies beyond the last page of the collection.
    #[error("page {requested} is beyond the last page ({last})")]
    OutOfRange {
        /// Requested page number.
        requested: u32,
        /// Last valid page number.
        last: u32,
    },
    /// A page size of zero was requested.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}
