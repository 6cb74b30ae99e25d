use crate::{entities::*, usecases::Error};

/// The lifecycle of the displayed result set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    Loading,
    Populated,
    NoResults,
    /// The last request failed with the contained message.
    Failed(String),
}

/// Holds the current page of results together with the
/// pagination state that produced it.
#[derive(Debug)]
pub struct SearchResultStore {
    phase: Phase,
    records: Vec<ObservationRecord>,
    page: u32,
    per_page: u32,
    total_results: u64,
}

impl SearchResultStore {
    pub fn new(per_page: u32) -> Self {
        debug_assert!(per_page > 0);
        Self {
            phase: Phase::Empty,
            records: vec![],
            page: 1,
            per_page,
            total_results: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Only records with a valid position.
    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// The number of matches reported by the remote API,
    /// including records without a position.
    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_results, self.per_page)
    }

    pub fn begin_search(&mut self) {
        log::debug!("{:?} -> Loading (page {})", self.phase, self.page);
        self.records.clear();
        self.phase = Phase::Loading;
    }

    /// Replace the current records with those of the given page.
    ///
    /// Returns `false` if no search is in progress.
    pub fn ingest(&mut self, result_page: ResultPage) -> bool {
        if self.phase != Phase::Loading {
            log::warn!("Ignoring results while in phase {:?}", self.phase);
            return false;
        }
        let ResultPage {
            results,
            page,
            per_page,
            total_results,
        } = result_page;
        if page > 0 {
            self.page = page;
        }
        if per_page > 0 {
            self.per_page = per_page;
        }
        self.total_results = total_results;
        let received = results.len();
        self.records = results.into_iter().filter(|r| r.has_position()).collect();
        if self.records.len() < received {
            log::debug!(
                "Skipped {} records without a position",
                received - self.records.len()
            );
        }
        self.phase = if self.records.is_empty() {
            Phase::NoResults
        } else {
            Phase::Populated
        };
        log::debug!("Loading -> {:?}", self.phase);
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.records.clear();
        self.phase = Phase::Failed(message.into());
        log::debug!("-> {:?}", self.phase);
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.total_results = 0;
        self.phase = Phase::Empty;
    }

    /// Switch to another page.
    ///
    /// Returns `true` if the page changed and a new
    /// search has to be dispatched. Out of range pages
    /// and the current page are ignored.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == self.page || page < 1 || page > self.total_pages() {
            log::debug!(
                "Ignoring navigation to page {page} (current {}, total {})",
                self.page,
                self.total_pages()
            );
            return false;
        }
        self.page = page;
        true
    }

    /// Change the page size and start over at the first page.
    pub fn set_per_page(&mut self, per_page: u32) -> Result<(), Error> {
        if per_page == 0 {
            return Err(Error::InvalidPerPage);
        }
        self.per_page = per_page;
        self.page = 1;
        Ok(())
    }

    /// Start over at the first page of a new query.
    ///
    /// The page count of the previous query no longer applies.
    pub fn reset_page(&mut self) {
        self.page = 1;
        self.total_results = 0;
    }

    /// Take over page and page size e.g. from a shared URL.
    pub fn restore(&mut self, page: u32, per_page: u32) -> Result<(), Error> {
        if per_page == 0 {
            return Err(Error::InvalidPerPage);
        }
        self.page = page.max(1);
        self.per_page = per_page;
        Ok(())
    }

    /// The pagination controls for the displayed results.
    ///
    /// Only available if there is more than one page.
    pub fn pagination(&self, per_page_options: &[u32]) -> Option<Pagination> {
        if self.phase != Phase::Populated || self.total_results <= u64::from(self.per_page) {
            return None;
        }
        let total_pages = self.total_pages();
        Some(Pagination {
            page: self.page,
            per_page: self.per_page,
            total_results: self.total_results,
            total_pages,
            showing: u64::from(self.per_page) * u64::from(self.page),
            has_previous: self.page > 1,
            has_next: self.page < total_pages,
            per_page_options: per_page_options.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_results: u64,
    pub total_pages: u32,
    pub showing: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub per_page_options: Vec<u32>,
}
