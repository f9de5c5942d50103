use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl Pagination {
    pub fn empty(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            total: 0,
            total_pages: 0,
        }
    }

    /// Highest page a query may ask for. An empty result still has page 1.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.last_page())
    }

    pub fn has_prev(&self, page: u32) -> bool {
        page > 1
    }

    pub fn has_next(&self, page: u32) -> bool {
        page < self.last_page()
    }

    /// 1-based inclusive range of the rows on the current page.
    pub fn showing(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let limit = u64::from(self.limit.max(1));
        let start = u64::from(self.page.saturating_sub(1)) * limit + 1;
        let end = (u64::from(self.page) * limit).min(self.total);
        Some((start, end))
    }

    /// Row number for the `index`-th row of the current page.
    pub fn ordinal(&self, index: usize) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + index as u64 + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::empty(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_single_page() {
        let p = Pagination::empty(10);
        assert_eq!(p.last_page(), 1);
        assert!(!p.has_prev(1));
        assert!(!p.has_next(1));
        assert_eq!(p.clamp(7), 1);
        assert_eq!(p.clamp(0), 1);
        assert_eq!(p.showing(), None);
    }

    #[test]
    fn prev_and_next_bounds() {
        let p = Pagination {
            page: 3,
            limit: 10,
            total: 25,
            total_pages: 3,
        };
        assert!(p.has_prev(2));
        assert!(!p.has_prev(1));
        assert!(p.has_next(2));
        assert!(!p.has_next(3));
        assert_eq!(p.showing(), Some((21, 25)));
        assert_eq!(p.ordinal(0), 21);
    }

    #[test]
    fn decodes_camel_case() {
        let p: Pagination =
            serde_json::from_str(r#"{"page":2,"limit":10,"total":14,"totalPages":2}"#).unwrap();
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.showing(), Some((11, 14)));
    }
}
