use crate::crawler::{FetchError, MissingFields};
use crate::state::RecipeRecord;
use std::collections::HashSet;

/// Insertion-ordered set of recipe links
///
/// Links compare by exact string; the first occurrence keeps its position,
/// which is the order detail pages are harvested in.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link if not already present; returns whether it was new
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.order.push(link);
        true
    }

    /// Merges links in order, returning how many were new
    pub fn extend<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        links.into_iter().filter(|link| self.insert(link.clone())).count()
    }

    /// Keeps only the first `len` links
    pub fn truncate(&mut self, len: usize) {
        if len >= self.order.len() {
            return;
        }
        for dropped in self.order.drain(len..) {
            self.seen.remove(&dropped);
        }
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl FromIterator<String> for LinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = LinkSet::new();
        set.extend(iter);
        set
    }
}

/// Why a detail page produced no record
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// The page could not be fetched
    Transport(FetchError),
    /// The page was fetched but some recipe fields could not be extracted
    Incomplete(MissingFields),
}

/// Counters and accumulators for one harvest run
///
/// Created at run start, only ever grows during the run, and is consumed
/// into the dataset at the end. Each run owns its own instance.
#[derive(Debug, Default)]
pub struct HarvestState {
    pub collected_links: LinkSet,
    pub records: Vec<RecipeRecord>,
    pub success_count: usize,
    pub skip_count: usize,
    pub transport_skips: usize,
    pub incomplete_skips: usize,
    /// Detail links taken from `collected_links` so far
    pub processed_count: usize,
    /// Last listing page requested
    pub current_page: u32,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run from an already collected link list
    pub fn with_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            collected_links: links.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, record: RecipeRecord) {
        self.records.push(record);
        self.success_count += 1;
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        self.skip_count += 1;
        match reason {
            SkipReason::Transport(_) => self.transport_skips += 1,
            SkipReason::Incomplete(_) => self.incomplete_skips += 1,
        }
    }

    /// Consumes the state into the final dataset
    pub fn into_records(self) -> Vec<RecipeRecord> {
        self.records
    }
}
