use serde::{Deserialize, Serialize};

/// Pagination metadata for the visible page.
///
/// In server-paged mode every field is taken from the backend verbatim, even
/// when `total_pages` does not agree with `total / limit`. Only client-side
/// narrowing recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PaginationInfo {
    /// Nothing loaded yet: page 1, zero results.
    pub fn empty(limit: u32) -> Self {
        Self {
            total: 0,
            page: 1,
            limit: limit.max(1),
            total_pages: 0,
        }
    }

    /// Pagination computed by the client from a known result count.
    pub fn computed(total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            page: page.max(1),
            limit,
            total_pages: total_pages_for(total, limit),
        }
    }

    /// Clamp a requested page into `[1, total_pages]`.
    ///
    /// With no known pages the only valid page is 1.
    pub fn clamp_page(&self, requested: u32) -> u32 {
        requested.clamp(1, self.total_pages.max(1))
    }

    /// Page numbers to render as buttons: at most `window` numbers around the
    /// current page, shifted to stay in range. Empty when there is at most a
    /// single page.
    pub fn page_numbers(&self, window: u32) -> Vec<u32> {
        if self.total_pages <= 1 || window == 0 {
            return Vec::new();
        }

        let window = i64::from(window);
        let last = i64::from(self.total_pages);
        let page = i64::from(self.page);

        let mut start = (page - window / 2).max(1);
        let end = (start + window - 1).min(last);
        if end - start < window - 1 {
            start = (end - window + 1).max(1);
        }

        (start..=end).map(|n| n as u32).collect()
    }

    /// "Showing `first` to `last` of `total`", or `None` for an empty list.
    pub fn display_range(&self) -> Option<DisplayRange> {
        if self.total == 0 {
            return None;
        }
        let limit = u64::from(self.limit);
        let first = u64::from(self.page.saturating_sub(1)) * limit + 1;
        let last = (u64::from(self.page) * limit).min(self.total);
        Some(DisplayRange {
            first,
            last,
            total: self.total,
        })
    }
}

/// Inclusive item range shown on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayRange {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

/// `ceil(total / limit)`, saturating at `u32::MAX`.
pub fn total_pages_for(total: u64, limit: u32) -> u32 {
    let pages = total.div_ceil(u64::from(limit.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
