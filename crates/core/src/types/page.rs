//! 1-based page requests and the offset/limit arithmetic behind them.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`PageRequest`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    /// Pages are 1-based.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds the allowed maximum.
    #[error("limit must be at most {max} (got {got})")]
    LimitTooLarge {
        /// Maximum allowed limit.
        max: u32,
        /// Requested limit.
        got: u32,
    },
}

/// A request for one page of a listing.
///
/// ## Examples
///
/// ```
/// use harbor_core::PageRequest;
///
/// let first = PageRequest::new(1, 12).unwrap();
/// assert_eq!(first.offset(), 0);
///
/// let second = PageRequest::new(2, 12).unwrap();
/// assert_eq!(second.offset(), 12);
/// assert_eq!(second.next_page(30), Some(3));
/// assert_eq!(second.next_page(24), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Largest page size callers may request.
    pub const MAX_LIMIT: u32 = 100;

    /// Create a page request.
    ///
    /// # Errors
    ///
    /// Returns an error if `page` or `limit` is zero, or `limit` exceeds
    /// [`Self::MAX_LIMIT`].
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > Self::MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge {
                max: Self::MAX_LIMIT,
                got: limit,
            });
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records skipped before this page: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// The following page number, if `count` records extend past this page.
    ///
    /// `None` on the last representable page.
    #[must_use]
    pub const fn next_page(&self, count: u64) -> Option<u32> {
        if count > self.offset() + self.limit as u64 {
            self.page.checked_add(1)
        } else {
            None
        }
    }

    /// Index range of this page inside an already-ordered slice of `len` items.
    ///
    /// Empty when the page starts past the end.
    #[must_use]
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(self.limit as usize).min(len);
        start..end
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 12 }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_zero_offset() {
        for limit in [1, 12, 100] {
            assert_eq!(PageRequest::new(1, limit).unwrap().offset(), 0);
        }
    }

    #[test]
    fn test_offset_formula() {
        for page in 1..=20_u32 {
            for limit in [1_u32, 7, 12, 100] {
                let req = PageRequest::new(page, limit).unwrap();
                assert_eq!(req.offset(), u64::from(page - 1) * u64::from(limit));
            }
        }
    }

    #[test]
    fn test_next_page_only_when_more_records() {
        let req = PageRequest::new(2, 12).unwrap();
        assert_eq!(req.next_page(25), Some(3));
        assert_eq!(req.next_page(24), None);
        assert_eq!(req.next_page(0), None);
    }

    #[test]
    fn test_next_page_on_last_page_number() {
        let req = PageRequest::new(u32::MAX, 100).unwrap();
        assert_eq!(req.next_page(u64::MAX), None);
    }

    #[test]
    fn test_window_inside_and_past_end() {
        let req = PageRequest::new(2, 12).unwrap();
        assert_eq!(req.window(30), 12..24);
        assert_eq!(req.window(20), 12..20);
        assert_eq!(req.window(5), 5..5);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(PageRequest::new(0, 12), Err(PageRequestError::ZeroPage));
        assert_eq!(PageRequest::new(1, 0), Err(PageRequestError::ZeroLimit));
        assert_eq!(
            PageRequest::new(1, 101),
            Err(PageRequestError::LimitTooLarge { max: 100, got: 101 })
        );
    }
}
