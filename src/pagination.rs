//! Pagination window and control set.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::Locale;

/// Number of pages needed for `total_hits` at `page_size` per page.
pub fn total_pages(total_hits: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_hits.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// A contiguous run of page numbers around the current page.
///
/// Always `min(width, total_pages)` pages wide, clamped to `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    start: u32,
    end: u32,
}

impl PaginationWindow {
    /// Centers a window of up to `width` pages on `current`, sliding it
    /// inward near either edge. Returns `None` when there are no pages.
    pub fn compute(current: u32, total_pages: u32, width: u32) -> Option<Self> {
        if total_pages == 0 || width == 0 {
            return None;
        }
        let current = current.clamp(1, total_pages);
        let width = width.min(total_pages);

        let start = current.saturating_sub(width / 2).max(1);
        let end = start.saturating_add(width - 1).min(total_pages);
        // A short window only happens against the last page, where end >= width.
        let start = if end - start + 1 < width {
            end - (width - 1)
        } else {
            start
        };

        Some(Self { start, end })
    }

    /// First page in the window.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last page in the window.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages in the window.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always false; an empty window is represented by `None`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Page numbers in the window.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// Kind of pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Previous,
    Page,
    Next,
}

/// One clickable pagination control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageControl {
    pub kind: ControlKind,
    pub label: String,
    /// Page requested when activated.
    pub target: u32,
    pub disabled: bool,
    /// Set on the numeric control of the current page.
    pub active: bool,
}

impl PageControl {
    /// Whether activating this control should issue a search while `current`
    /// is displayed.
    pub fn is_actionable(&self, current: u32) -> bool {
        !self.disabled && self.target != current
    }
}

/// Builds previous / numbered / next controls for the given result set.
///
/// Empty when everything fits on one page.
pub fn build_controls(
    total_hits: u64,
    page_size: u32,
    current: u32,
    width: u32,
    locale: Locale,
) -> Vec<PageControl> {
    let pages = total_pages(total_hits, page_size);
    if pages <= 1 {
        return Vec::new();
    }
    let Some(window) = PaginationWindow::compute(current, pages, width) else {
        return Vec::new();
    };
    let current = current.clamp(1, pages);
    let messages = locale.messages();

    let mut controls = Vec::with_capacity(window.len() as usize + 2);
    controls.push(PageControl {
        kind: ControlKind::Previous,
        label: messages.previous.to_string(),
        target: current - 1,
        disabled: current == 1,
        active: false,
    });
    for page in window.pages() {
        controls.push(PageControl {
            kind: ControlKind::Page,
            label: page.to_string(),
            target: page,
            disabled: false,
            active: page == current,
        });
    }
    controls.push(PageControl {
        kind: ControlKind::Next,
        label: messages.next.to_string(),
        target: current.saturating_add(1),
        disabled: current == pages,
        active: false,
    });
    controls
}
