//! Page/limit requests and the windows they select.

use std::num::NonZeroU32;

use thiserror::Error;

/// Validation errors raised by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// A validated page/limit pair.
///
/// ## Invariants
/// - `page >= 1`
/// - `limit >= 1`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid request");
/// let window = request.window();
/// assert_eq!(window.offset(), 20);
/// assert_eq!(window.end(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroU32,
    limit: NonZeroU32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero and
    /// [`PageRequestError::ZeroLimit`] when `limit` is zero.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        let Some(page) = NonZeroU32::new(page) else {
            return Err(PageRequestError::ZeroPage);
        };
        let Some(limit) = NonZeroU32::new(limit) else {
            return Err(PageRequestError::ZeroLimit);
        };
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> NonZeroU32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    /// Window of item positions covered by this page.
    #[must_use]
    pub fn window(&self) -> PageWindow {
        let limit = u64::from(self.limit.get());
        let preceding_pages = u64::from(self.page.get() - 1);
        PageWindow {
            offset: preceding_pages * limit,
            limit,
        }
    }
}

/// Half-open range `[offset, offset + limit)` of positions in an ordered
/// sequence.
///
/// Arithmetic is carried out in `u64`, which holds any product of two `u32`
/// values plus a `u32`, so no window overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    offset: u64,
    limit: u64,
}

impl PageWindow {
    /// Number of items that precede the window.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of items inside the window.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Exclusive upper bound of the window.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.offset + self.limit
    }

    /// Whether a sequence of `len` accumulated items already covers the whole
    /// window, so no further items need fetching.
    #[must_use]
    pub fn is_filled_by(&self, len: usize) -> bool {
        match u64::try_from(len) {
            Ok(len) => len >= self.end(),
            Err(_) => true,
        }
    }

    /// Select the window from an accumulated sequence.
    ///
    /// The result is clipped to the sequence length and is empty when the
    /// offset lies at or beyond the end of the sequence.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let window = PageRequest::new(2, 2).expect("valid request").window();
    /// assert_eq!(window.take_from(vec![1, 2, 3]), vec![3]);
    /// assert!(window.take_from(vec![1, 2]).is_empty());
    /// ```
    #[must_use]
    pub fn take_from<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::ZeroLimit)]
    #[case(0, 0, PageRequestError::ZeroPage)]
    fn rejects_zero_page_or_limit(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    #[case(1, 10, 0, 10)]
    #[case(2, 10, 10, 20)]
    #[case(5, 3, 12, 15)]
    fn window_skips_preceding_pages(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] offset: u64,
        #[case] end: u64,
    ) {
        let window = PageRequest::new(page, limit).expect("valid").window();
        assert_eq!(window.offset(), offset);
        assert_eq!(window.end(), end);
    }

    #[rstest]
    fn window_never_overflows_at_the_extremes() {
        let window = PageRequest::new(u32::MAX, u32::MAX).expect("valid").window();
        assert_eq!(window.end(), u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    #[case(9, true)]
    fn filled_once_end_is_reached(#[case] len: usize, #[case] filled: bool) {
        let window = PageRequest::new(1, 5).expect("valid").window();
        assert_eq!(window.is_filled_by(len), filled);
    }

    #[rstest]
    #[case(1, 3, vec![1, 2, 3])]
    #[case(2, 3, vec![4, 5])]
    #[case(3, 3, vec![])]
    #[case(9, 3, vec![])]
    fn take_from_clips_to_available_items(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: Vec<u8>,
    ) {
        let window = PageRequest::new(page, limit).expect("valid").window();
        assert_eq!(window.take_from(vec![1, 2, 3, 4, 5]), expected);
    }
}
