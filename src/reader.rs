//! Chapter reader: lazy page loading and chapter navigation.
//!
//! Pages start `Pending` behind a placeholder. An intersection event for a
//! pending page marks it `Triggered`; the dispatcher then grants the
//! triggered page and the next [`LOOKAHEAD`] pages `Visible`. Visibility is
//! never revoked.

use crate::types::Chapter;
use crate::urls::chapter_link_path;

/// Pages rendered eagerly before any scrolling.
pub const EAGER_PAGES: usize = 3;
/// Pages granted after a triggered page.
pub const LOOKAHEAD: usize = 2;
/// Intersection fires this many pixels before a page reaches the viewport.
pub const ROOT_MARGIN_PX: f64 = 200.0;
/// Minimum placeholder height for a page that is not visible yet.
pub const PLACEHOLDER_MIN_HEIGHT_PX: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Pending,
    /// Only exists inside [`LazyPages::dispatch`]; never observed between calls.
    Triggered,
    Visible,
}

/// Vertical extent of a page element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBounds {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    /// Whether `page` overlaps the viewport grown by `margin` above and below.
    pub fn intersects(&self, page: PageBounds, margin: f64) -> bool {
        let top = self.scroll_top - margin;
        let bottom = self.scroll_top + self.height + margin;
        page.top < bottom && page.top + page.height > top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub index: usize,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSlot<'a> {
    Image { index: usize, url: &'a str, eager: bool },
    Placeholder { index: usize, min_height: u32, label: String },
}

#[derive(Debug, Clone)]
pub struct LazyPages {
    urls: Vec<String>,
    states: Vec<PageState>,
}

impl LazyPages {
    pub fn new(urls: Vec<String>) -> Self {
        let states = (0..urls.len())
            .map(|i| if i < EAGER_PAGES { PageState::Visible } else { PageState::Pending })
            .collect();
        Self { urls, states }
    }

    pub fn len(&self) -> usize { self.urls.len() }
    pub fn is_empty(&self) -> bool { self.urls.is_empty() }
    pub fn state(&self, index: usize) -> Option<PageState> { self.states.get(index).copied() }
    pub fn is_visible(&self, index: usize) -> bool { self.state(index) == Some(PageState::Visible) }

    /// Pages still waiting for an intersection event.
    pub fn observed(&self) -> Vec<usize> {
        self.states.iter().enumerate().filter(|(_, s)| **s == PageState::Pending).map(|(i, _)| i).collect()
    }

    /// Apply a batch of intersection events; returns pages that became visible, ascending.
    pub fn dispatch(&mut self, entries: &[IntersectionEntry]) -> Vec<usize> {
        for e in entries.iter().filter(|e| e.is_intersecting) {
            match self.states.get_mut(e.index) {
                Some(s) if *s == PageState::Pending => *s = PageState::Triggered,
                _ => {}
            }
        }
        let triggered: Vec<usize> = self.states.iter().enumerate().filter(|(_, s)| **s == PageState::Triggered).map(|(i, _)| i).collect();
        let mut granted = Vec::new();
        for index in triggered {
            let end = (index + 1 + LOOKAHEAD).min(self.states.len());
            for i in index..end {
                if self.states[i] != PageState::Visible {
                    self.states[i] = PageState::Visible;
                    granted.push(i);
                }
            }
        }
        granted.sort_unstable();
        granted
    }

    /// Derive intersection events for the observed pages from layout and
    /// scroll position, then dispatch them.
    pub fn on_scroll(&mut self, viewport: Viewport, layout: &[PageBounds]) -> Vec<usize> {
        let entries: Vec<IntersectionEntry> = self
            .observed()
            .into_iter()
            .filter_map(|index| layout.get(index).map(|b| IntersectionEntry { index, is_intersecting: viewport.intersects(*b, ROOT_MARGIN_PX) }))
            .collect();
        self.dispatch(&entries)
    }

    pub fn render_plan(&self) -> Vec<PageSlot<'_>> {
        self.urls
            .iter()
            .enumerate()
            .map(|(index, url)| {
                if self.is_visible(index) {
                    PageSlot::Image { index, url, eager: index < EAGER_PAGES }
                } else {
                    PageSlot::Placeholder { index, min_height: PLACEHOLDER_MIN_HEIGHT_PX, label: format!("Loading page {}...", index + 1) }
                }
            })
            .collect()
    }
}

/// Neighbours of the current chapter in a newest-first chapter list.
#[derive(Debug, Clone, Copy)]
pub struct ChapterNav<'a> {
    chapters: &'a [Chapter],
    index: usize,
}

impl<'a> ChapterNav<'a> {
    pub fn new(chapters: &'a [Chapter], index: usize) -> Option<Self> {
        (index < chapters.len()).then_some(Self { chapters, index })
    }

    pub fn by_label(chapters: &'a [Chapter], label: &str) -> Option<Self> {
        let label = label.trim();
        chapters.iter().position(|c| c.chapter.trim() == label).and_then(|i| Self::new(chapters, i))
    }

    /// Match on the chapter link with surrounding slashes ignored.
    pub fn by_link(chapters: &'a [Chapter], link: &str) -> Option<Self> {
        let wanted = chapter_link_path(link);
        chapters.iter().position(|c| chapter_link_path(&c.link) == wanted).and_then(|i| Self::new(chapters, i))
    }

    pub fn index(&self) -> usize { self.index }
    pub fn current(&self) -> &'a Chapter { &self.chapters[self.index] }

    /// Chronologically preceding chapter: one further down the list.
    pub fn previous(&self) -> Option<&'a Chapter> { self.chapters.get(self.index + 1) }

    /// Chronologically following chapter: one further up the list.
    pub fn next(&self) -> Option<&'a Chapter> { self.index.checked_sub(1).and_then(|i| self.chapters.get(i)) }

    pub fn first(&self) -> Option<&'a Chapter> { self.chapters.last() }

    pub fn latest(&self) -> Option<&'a Chapter> { self.chapters.first() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> LazyPages {
        LazyPages::new((0..n).map(|i| format!("https://img.komiku.org/p{i}.jpg")).collect())
    }

    fn hit(index: usize) -> IntersectionEntry { IntersectionEntry { index, is_intersecting: true } }

    #[test]
    fn first_three_are_eager() {
        let p = pages(10);
        assert!(p.is_visible(0) && p.is_visible(2));
        assert!(!p.is_visible(3));
        assert_eq!(p.observed(), (3..10).collect::<Vec<_>>());
    }

    #[test]
    fn trigger_grants_page_and_two_more() {
        let mut p = pages(10);
        assert_eq!(p.dispatch(&[hit(5)]), vec![5, 6, 7]);
        assert!(!p.is_visible(4));
        assert_eq!(p.state(8), Some(PageState::Pending));
    }

    #[test]
    fn window_clamps_at_end_and_ignores_visible() {
        let mut p = pages(6);
        assert_eq!(p.dispatch(&[hit(5)]), vec![5]);
        assert_eq!(p.dispatch(&[hit(5), hit(1)]), Vec::<usize>::new());
        assert_eq!(p.dispatch(&[hit(3), hit(4)]), vec![3, 4]);
        assert!(p.observed().is_empty());
    }

    #[test]
    fn no_page_stays_triggered_after_dispatch() {
        let mut p = pages(12);
        p.dispatch(&[hit(4), hit(9), hit(11)]);
        assert!((0..12).all(|i| p.state(i) != Some(PageState::Triggered)));
    }

    #[test]
    fn non_intersecting_entries_do_nothing() {
        let mut p = pages(8);
        assert!(p.dispatch(&[IntersectionEntry { index: 4, is_intersecting: false }]).is_empty());
        assert_eq!(p.state(4), Some(PageState::Pending));
    }

    #[test]
    fn scroll_uses_lookahead_margin() {
        let mut p = pages(8);
        let layout: Vec<PageBounds> = (0..8).map(|i| PageBounds { top: i as f64 * 1000.0, height: 1000.0 }).collect();
        // Viewport bottom at 2850: page 3 starts 150px below it, inside the 200px margin.
        let granted = p.on_scroll(Viewport { scroll_top: 2000.0, height: 850.0 }, &layout);
        assert_eq!(granted, vec![3, 4, 5]);
        // Page 6 starts at 6000; viewport bottom at 5700 leaves it 300px away.
        assert!(p.on_scroll(Viewport { scroll_top: 4850.0, height: 850.0 }, &layout).is_empty());
    }

    #[test]
    fn render_plan_uses_placeholders() {
        let p = pages(4);
        let plan = p.render_plan();
        assert!(matches!(plan[0], PageSlot::Image { eager: true, .. }));
        assert_eq!(plan[3], PageSlot::Placeholder { index: 3, min_height: 600, label: "Loading page 4...".into() });
    }

    fn chapters() -> Vec<Chapter> {
        ["12", "11", "10"]
            .iter()
            .map(|n| Chapter { chapter: n.to_string(), link: format!("/x-chapter-{n}/"), ..Default::default() })
            .collect()
    }

    #[test]
    fn navigation_is_inverted_against_list_order() {
        let list = chapters();
        let nav = ChapterNav::by_label(&list, "11").unwrap();
        assert_eq!(nav.index(), 1);
        assert_eq!(nav.previous().unwrap().chapter, "10");
        assert_eq!(nav.next().unwrap().chapter, "12");
        assert_eq!(nav.first().unwrap().chapter, "10");
        assert_eq!(nav.latest().unwrap().chapter, "12");
    }

    #[test]
    fn navigation_edges() {
        let list = chapters();
        let newest = ChapterNav::new(&list, 0).unwrap();
        assert!(newest.next().is_none());
        let oldest = ChapterNav::by_link(&list, "x-chapter-10").unwrap();
        assert!(oldest.previous().is_none());
        assert!(ChapterNav::new(&list, 3).is_none());
        assert!(ChapterNav::by_label(&list, "99").is_none());
    }
}
