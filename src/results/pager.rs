use super::MatchResult;

pub const PAGE_SIZE: usize = 10;

/// Fixed-size pages over an ordered result list. Pages are 1-indexed.
#[derive(Debug)]
pub struct ResultPager {
    items: Vec<MatchResult>,
    current: usize,
}

impl ResultPager {
    pub fn new(items: Vec<MatchResult>) -> Self {
        Self { items, current: 1 }
    }

    /// Swaps in a new list and goes back to the first page.
    pub fn replace(&mut self, items: Vec<MatchResult>) {
        self.items = items;
        self.current = 1;
    }

    pub fn items(&self) -> &[MatchResult] {
        &self.items
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// The slice for page `n`, empty when `n` is out of range.
    pub fn page(&self, n: usize) -> &[MatchResult] {
        if n == 0 {
            return &[];
        }
        let start = ((n - 1) * PAGE_SIZE).min(self.items.len());
        let end = (n * PAGE_SIZE).min(self.items.len());
        &self.items[start..end]
    }

    pub fn current_items(&self) -> &[MatchResult] {
        self.page(self.current)
    }

    /// Offset of the first row on the current page within the full list.
    pub fn current_offset(&self) -> usize {
        self.current.saturating_sub(1) * PAGE_SIZE
    }

    /// One past the last row on the current page.
    pub fn current_end(&self) -> usize {
        self.current_offset() + self.current_items().len()
    }

    pub fn next(&mut self) {
        if self.current < self.page_count() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current > 1 {
            self.current -= 1;
        }
    }

    pub fn go_to(&mut self, n: usize) {
        self.current = n.clamp(1, self.page_count());
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }
}

impl Default for ResultPager {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
