/// Task table pagination
///
/// Pages are 1-based. `total_pages = ceil(len / page_size)`, and a page
/// outside `1..=total_pages` clamps to the nearest valid one. An empty list
/// still has one (empty) page.

/// Rows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Clamps `page` into the valid range for `len` items
    pub fn clamp(&self, page: usize, len: usize) -> usize {
        page.clamp(1, self.total_pages(len))
    }

    /// Items shown on `page` (clamped)
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let page = self.clamp(page, items.len());
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        &items[start.min(end)..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let pager = Paginator::default();
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(5), 1);
        assert_eq!(pager.total_pages(6), 2);
        assert_eq!(pager.total_pages(11), 3);
    }

    #[test]
    fn test_pages_and_clamping() {
        let pager = Paginator::default();
        let items: Vec<u32> = (1..=12).collect();

        assert_eq!(pager.page(&items, 1), &[1, 2, 3, 4, 5]);
        assert_eq!(pager.page(&items, 3), &[11, 12]);
        assert_eq!(pager.page(&items, 0), &[1, 2, 3, 4, 5]);
        assert_eq!(pager.page(&items, 99), &[11, 12]);
        assert_eq!(pager.clamp(99, items.len()), 3);
    }

    #[test]
    fn test_empty_and_zero_size() {
        let empty: Vec<u32> = Vec::new();
        assert!(Paginator::default().page(&empty, 4).is_empty());

        let pager = Paginator::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.page(&[7, 8, 9], 2), &[8]);
    }
}
