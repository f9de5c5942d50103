use std::collections::BTreeMap;

/// Search text, filters and page of a list view.
///
/// `search_raw` follows the keyboard; `search` is what actually gets sent and
/// only catches up once the debounce window has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search_raw: String,
    pub search: String,
    pub filters: BTreeMap<String, String>,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            search_raw: String::new(),
            search: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            limit,
        }
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.insert(key.to_string(), value.to_string());
        self
    }

    pub fn filter(&self, key: &str) -> &str {
        self.filters.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns true when the value changed, in which case the page resets.
    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        if self.filter(key) == value {
            return false;
        }
        self.filters.insert(key.to_string(), value.to_string());
        self.page = 1;
        true
    }

    /// Promotes the raw input to the effective search. Returns true only if
    /// the effective value changed.
    pub fn apply_search(&mut self) -> bool {
        if self.search == self.search_raw {
            return false;
        }
        self.search = self.search_raw.clone();
        self.page = 1;
        true
    }

    /// `page` must already be clamped by the caller.
    pub fn set_page(&mut self, page: u32) -> bool {
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("search".to_string(), self.search.clone()),
        ];
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(10)
    }
}
