//! Admin console types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a server-side paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn empty(page: u32, size: u32) -> Self {
        Self {
            content: Vec::new(),
            page,
            size,
            total_elements: 0,
            total_pages: 0,
            first: true,
            last: true,
        }
    }

    pub fn next_page(&self) -> Option<u32> {
        (!self.last).then_some(self.page + 1)
    }

    pub fn previous_page(&self) -> Option<u32> {
        (!self.first).then(|| self.page.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation() {
        let json = r#"{"content":[1,2],"page":1,"size":2,"totalElements":5,"totalPages":3,
            "first":false,"last":false}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page(), Some(2));
        assert_eq!(page.previous_page(), Some(0));

        let empty: Page<u32> = Page::empty(0, DEFAULT_PAGE_SIZE);
        assert_eq!(empty.next_page(), None);
        assert_eq!(empty.previous_page(), None);
    }
}
