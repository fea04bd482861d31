//! Pagination query parameters.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 200;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates pagination parameters and resolves defaults.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 200
    ///
    /// # Returns
    ///
    /// `(page, page_size)` tuple.
    pub fn resolve(&self) -> Result<(u32, u32), String> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        Ok((page, page_size))
    }
}

/// Applies `(page, page_size)` to an already ordered list.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    let offset = (page as usize - 1).saturating_mul(page_size as usize);
    items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect()
}

/// Pagination block echoed in list responses.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn new(page: u32, page_size: u32, total: usize) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(params(None, None).resolve().unwrap(), (1, 25));
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).resolve().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).resolve().is_err());
        assert!(params(None, Some(1)).resolve().is_ok());
        assert!(params(None, Some(200)).resolve().is_ok());
        assert!(params(None, Some(201)).resolve().is_err());
    }

    #[test]
    fn test_paginate_slices_in_order() {
        let items: Vec<u32> = (1..=7).collect();

        assert_eq!(paginate(items.clone(), 1, 3), vec![1, 2, 3]);
        assert_eq!(paginate(items.clone(), 3, 3), vec![7]);
        assert!(paginate(items, 4, 3).is_empty());
    }

    #[test]
    fn test_page_info_total_pages() {
        assert_eq!(PageInfo::new(1, 25, 0).total_pages, 0);
        assert_eq!(PageInfo::new(1, 25, 25).total_pages, 1);
        assert_eq!(PageInfo::new(1, 25, 26).total_pages, 2);
    }

    #[test]
    fn test_query_string_numbers() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "2", "page_size": "10"}"#).unwrap();
        assert_eq!(p.resolve().unwrap(), (2, 10));
    }
}
