// ── Pagination ──

/// Rows per page in paginated views.
pub const PAGE_SIZE: usize = 10;

/// Number of pages needed for `len` items. Zero when there are no items.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// The 1-based `page` of `items`. Pages past the end (and page 0) are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
