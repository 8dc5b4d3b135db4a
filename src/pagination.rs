use serde::Serialize;

/// One slice of a larger, ordered result set.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index.
    pub number: usize,
    /// Requested page size (not the number of items on this page).
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: usize, size: usize, total_elements: usize) -> Self {
        let total_pages = total_elements.div_ceil(size.max(1));

        Self {
            items,
            number,
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts every item while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_element_collection() {
        let page = Page::new(vec![1], 0, 10, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.is_first());
        assert!(page.is_last());
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert!(!page.is_empty());
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let page: Page<i32> = Page::new(vec![], 1, 10, 1);
        assert!(page.is_empty());
        assert_eq!(page.total_elements, 1);
        assert!(page.has_previous());
        assert!(page.is_last());
    }

    #[test]
    fn middle_page_has_neighbours() {
        let page = Page::new(vec![11, 12], 1, 2, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let page: Page<i32> = Page::new(vec![], 0, 10, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_last());
        assert!(page.is_empty());
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 0, 2, 3).map(|n| n.to_string());
        assert_eq!(page.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }
}
