use serde::Serialize;

/// Fixed catalog page size.
pub const PAGE_SIZE: usize = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// `max(1, ceil(count / PAGE_SIZE))`. An empty list still has one page.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Clamps a requested page into `1..=total_pages`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Raw slice for a 1-based page. Out-of-range pages yield an empty slice;
/// callers clamp first.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Clamps `page` and returns the page view, cloning the visible items.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total_pages = total_pages(items.len());
    let page = clamp_page(page, total_pages);
    Page {
        items: page_slice(items, page).to_vec(),
        page,
        total_pages,
        total_items: items.len(),
    }
}
