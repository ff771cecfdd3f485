use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Fixed number of records per page for every paginated query.
pub const PAGE_SIZE: u32 = 15;

/// A 1-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32) -> CoreResult<Self> {
        if page < 1 {
            return Err(CoreError::ValidationError("Page index must not be less than one!".to_string()));
        }
        Ok(Self { page, size: PAGE_SIZE })
    }

    /// 0-based row offset.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.size as u64
    }

    pub fn limit(&self) -> u64 {
        self.size as u64
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self { content, total_elements, request }
    }

    pub fn total_pages(&self) -> u32 {
        let size = self.request.size.max(1) as u64;
        self.total_elements.div_ceil(size) as u32
    }

    /// Cuts one page out of an already filtered and ordered list.
    pub fn slice(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let content = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Self { content, total_elements, request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_zero_is_rejected() {
        assert!(matches!(PageRequest::new(0), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(1).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3).unwrap().offset(), 30);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        for (k, r) in [(0u64, 0u64), (0, 7), (1, 0), (2, 3), (4, 14)] {
            let total = 15 * k + r;
            let page = Page::<u8>::new(Vec::new(), total, PageRequest::new(1).unwrap());
            assert_eq!(page.total_pages() as u64, total.div_ceil(15));
        }
    }

    #[test]
    fn test_last_page_holds_remainder() {
        let items: Vec<u32> = (0..34).collect();
        let last = Page::slice(items.clone(), PageRequest::new(3).unwrap());
        assert_eq!(last.content, vec![30, 31, 32, 33]);
        assert_eq!(last.total_pages(), 3);

        let beyond = Page::slice(items, PageRequest::new(4).unwrap());
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 34);
    }
}
