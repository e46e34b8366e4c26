/// Saved posts shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page of a collection. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Index of the first item on this page within the whole collection.
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.page_size
    }
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Clamp a requested page into `[1, page_count]` (page 1 when empty).
pub fn clamp_page(requested: usize, total: usize, page_size: usize) -> usize {
    requested.clamp(1, page_count(total, page_size).max(1))
}

/// Slice out the requested page, clamping out-of-range requests.
pub fn paginate<T: Clone>(items: &[T], requested: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let number = clamp_page(requested, total_items, page_size);
    let start = ((number - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        number,
        total_pages: page_count(total_items, page_size),
        total_items,
        page_size,
    }
}
