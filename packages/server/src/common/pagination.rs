//! Offset/limit pagination types.
//!
//! The search endpoints paginate over the *deduplicated* result list, so the
//! window math lives here and the callers only ever slice unique items.
//!
//! # Usage
//!
//! ```rust,ignore
//! let page = PaginationArgs { offset: body.offset, limit: body.limit }
//!     .validate(50)
//!     .map_err(ApiError::validation)?;
//!
//! let total = unique.len();
//! let items = page.slice(unique);
//! let has_more = page.has_more(total);
//! ```

/// Raw pagination input as it arrives in a request body.
///
/// Both fields are optional; defaults are per-endpoint (the search routes
/// default the limit to 50, review listings to 10).
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationArgs {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationArgs {
    /// Validate pagination arguments.
    ///
    /// Negative values are rejected; missing values fall back to offset 0
    /// and the endpoint's default limit. A limit of zero is allowed and
    /// yields an empty page.
    pub fn validate(&self, default_limit: usize) -> Result<ValidatedPagination, &'static str> {
        let offset = match self.offset {
            None => 0,
            Some(n) if n < 0 => return Err("offset must be a non-negative number."),
            Some(n) => n as usize,
        };

        let limit = match self.limit {
            None => default_limit,
            Some(n) if n < 0 => return Err("limit must be a non-negative number."),
            Some(n) => n as usize,
        };

        Ok(ValidatedPagination { offset, limit })
    }
}

/// Validated and normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPagination {
    pub offset: usize,
    pub limit: usize,
}

impl ValidatedPagination {
    /// Slice a full result list down to this window.
    ///
    /// An offset at or past the end yields an empty page.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }

    /// Whether more items exist beyond this window.
    ///
    /// True iff `offset + limit < total`.
    pub fn has_more(&self, total: usize) -> bool {
        self.offset + self.limit < total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        let page = PaginationArgs::default().validate(50).unwrap();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn test_validate_explicit_values() {
        let args = PaginationArgs {
            offset: Some(20),
            limit: Some(5),
        };
        let page = args.validate(50).unwrap();
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 5);
    }

    #[test]
    fn test_validate_rejects_negative_offset() {
        let args = PaginationArgs {
            offset: Some(-1),
            limit: None,
        };
        assert!(args.validate(50).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_limit() {
        let args = PaginationArgs {
            offset: None,
            limit: Some(-10),
        };
        assert!(args.validate(50).is_err());
    }

    #[test]
    fn test_zero_limit_is_an_empty_page() {
        let args = PaginationArgs {
            offset: None,
            limit: Some(0),
        };
        let page = args.validate(50).unwrap();
        assert!(page.slice(vec![1, 2, 3]).is_empty());
        assert!(page.has_more(3));
    }

    #[test]
    fn test_slice_window() {
        let page = ValidatedPagination { offset: 1, limit: 2 };
        assert_eq!(page.slice(vec![1, 2, 3, 4]), vec![2, 3]);
    }

    #[test]
    fn test_slice_past_the_end_is_empty() {
        let page = ValidatedPagination { offset: 10, limit: 5 };
        let empty: Vec<i32> = page.slice(vec![1, 2, 3]);
        assert!(empty.is_empty());
        assert!(!page.has_more(3));
    }

    #[test]
    fn test_has_more_boundary() {
        // has_more is true iff offset + limit < total
        let page = ValidatedPagination { offset: 0, limit: 2 };
        assert!(page.has_more(3));

        let page = ValidatedPagination { offset: 1, limit: 2 };
        assert!(!page.has_more(3));

        let page = ValidatedPagination { offset: 2, limit: 2 };
        assert!(!page.has_more(3));
    }
}
