// src/pagination.rs

/// Pages shown around the current one.
pub const WINDOW: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub items: Vec<PageItem>,
    pub current: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

pub fn total_pages(total_items: u64, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page as u64).min(u32::MAX as u64) as u32
}

/// Button layout for `current` out of `total_pages`.
///
/// The window is `current-1 ..= current+1`. When it comes within one hidden
/// page of either end it is widened to four pages and merged with that end,
/// so an ellipsis never stands in for a single page:
/// `1 2 3 4 … 10`, `1 … 4 5 6 … 10`, `1 … 7 8 9 10`.
/// Empty when there is at most one page.
pub fn page_items(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let half = WINDOW / 2;

    let mut start = current.saturating_sub(half).max(1);
    let mut end = current.saturating_add(half).min(total_pages);

    if start <= 3 {
        start = 1;
        end = end.max(WINDOW + 1).min(total_pages);
    }
    if end.saturating_add(2) >= total_pages {
        end = total_pages;
        start = start.min(total_pages.saturating_sub(WINDOW)).max(1);
    }

    let mut items = Vec::with_capacity((end - start + 5) as usize);
    if start > 1 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total_pages));
    }
    items
}

/// `None` when there is nothing to paginate.
pub fn controls(current: u32, total_items: u64, items_per_page: u32) -> Option<PageControls> {
    let total = total_pages(total_items, items_per_page);
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);
    Some(PageControls {
        items: page_items(current, total),
        current,
        total_pages: total,
        prev_enabled: current > 1,
        next_enabled: current < total,
    })
}
