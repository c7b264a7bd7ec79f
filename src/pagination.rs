use crate::types::PaginationState;

/// Width of the page-button window.
pub const PAGE_WINDOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded { has_more: bool },
    Failed,
}

impl LoadState {
    pub fn is_loading(&self) -> bool { matches!(self, LoadState::Loading) }
}

/// Offset cursor for batch ("scroll") loading. Advances by what upstream
/// actually returned, never by what was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTracker {
    offset: u32,
    batch_size: u32,
    has_more: bool,
    state: LoadState,
}

impl OffsetTracker {
    pub fn new(batch_size: u32) -> Self {
        Self { offset: 0, batch_size, has_more: true, state: LoadState::Idle }
    }

    /// Start after items that were already loaded some other way.
    pub fn starting_at(offset: u32, batch_size: u32) -> Self {
        Self { offset, ..Self::new(batch_size) }
    }

    pub fn offset(&self) -> u32 { self.offset }
    pub fn batch_size(&self) -> u32 { self.batch_size }
    pub fn has_more(&self) -> bool { self.has_more }
    pub fn state(&self) -> LoadState { self.state }

    /// Mark a batch as in flight and return the `(offset, batch_size)` to request.
    pub fn begin(&mut self) -> (u32, u32) {
        self.state = LoadState::Loading;
        (self.offset, self.batch_size)
    }

    /// A short (or empty) batch means the end of the collection, whatever the flag says.
    pub fn complete(&mut self, returned: u32, upstream_has_more: bool) {
        self.offset = self.offset.saturating_add(returned);
        self.has_more = upstream_has_more && returned > 0 && returned >= self.batch_size;
        self.state = LoadState::Loaded { has_more: self.has_more };
    }

    pub fn fail(&mut self) { self.state = LoadState::Failed; }

    pub fn reset(&mut self) { *self = Self::new(self.batch_size); }
}

/// Page-number cursor for the classic pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTracker {
    current_page: u32,
    pagination: PaginationState,
    state: LoadState,
}

impl Default for PageTracker {
    fn default() -> Self { Self::new() }
}

impl PageTracker {
    pub fn new() -> Self {
        Self { current_page: 1, pagination: PaginationState::default(), state: LoadState::Idle }
    }

    pub fn current_page(&self) -> u32 { self.current_page }
    pub fn pagination(&self) -> PaginationState { self.pagination }
    pub fn state(&self) -> LoadState { self.state }

    /// Begin loading `page` (clamped to 1).
    pub fn begin(&mut self, page: u32) -> u32 {
        self.current_page = page.max(1);
        self.state = LoadState::Loading;
        self.current_page
    }

    pub fn complete(&mut self, pagination: PaginationState) {
        self.pagination = pagination;
        self.state = LoadState::Loaded { has_more: pagination.has_more };
    }

    pub fn fail(&mut self) { self.state = LoadState::Failed; }

    pub fn total_pages(&self) -> u32 { total_pages(self.pagination.total, self.pagination.per_page) }

    pub fn window(&self) -> Vec<u32> { page_window(self.current_page, self.total_pages()) }

    pub fn can_go_previous(&self) -> bool { self.current_page > 1 }

    pub fn can_go_next(&self) -> bool {
        self.current_page != self.total_pages() && self.pagination.has_more
    }
}

/// `ceil(total / per_page)`; zero when `per_page` is zero.
pub fn total_pages(total: u32, per_page: u32) -> u32 {
    if per_page == 0 { 0 } else { total.div_ceil(per_page) }
}

/// Page buttons to show: the first five while on pages 1-3, the last five
/// while on the last three pages, else the current page +/- 2.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages <= PAGE_WINDOW {
        return (1..=total_pages).collect();
    }
    let start = if current <= 3 {
        1
    } else if current >= total_pages - 2 {
        total_pages - (PAGE_WINDOW - 1)
    } else {
        current - 2
    };
    (start..start + PAGE_WINDOW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_batch_advances_by_batch() {
        let mut t = OffsetTracker::new(20);
        assert_eq!(t.begin(), (0, 20));
        assert!(t.state().is_loading());
        t.complete(20, true);
        assert_eq!(t.offset(), 20);
        assert!(t.has_more());
        assert_eq!(t.begin(), (20, 20));
    }

    #[test]
    fn short_batch_ends_the_feed() {
        let mut t = OffsetTracker::starting_at(40, 20);
        t.begin();
        t.complete(5, true);
        assert_eq!(t.offset(), 45);
        assert!(!t.has_more());
        assert_eq!(t.state(), LoadState::Loaded { has_more: false });
    }

    #[test]
    fn failure_keeps_offset() {
        let mut t = OffsetTracker::new(20);
        t.begin();
        t.complete(20, true);
        t.begin();
        t.fail();
        assert_eq!(t.offset(), 20);
        assert_eq!(t.state(), LoadState::Failed);
        assert_eq!(t.begin(), (20, 20));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn window_anchors() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(page_window(8, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
    }

    #[test]
    fn pager_controls() {
        let mut p = PageTracker::new();
        p.begin(1);
        p.complete(PaginationState { current_page: 1, per_page: 20, total: 60, has_more: true });
        assert_eq!(p.total_pages(), 3);
        assert!(!p.can_go_previous());
        assert!(p.can_go_next());
        p.begin(3);
        p.complete(PaginationState { current_page: 3, per_page: 20, total: 60, has_more: true });
        assert!(!p.can_go_next());
        assert_eq!(p.window(), vec![1, 2, 3]);
    }
}
