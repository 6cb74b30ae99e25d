//! Headless collaborators that render into a terminal.

use bird_finder_core::gateways::HistoryGateway;
use url::Url;

mod map;
mod view;

pub use self::{map::*, view::*};

/// Keeps the pushed URLs instead of a browser history.
#[derive(Debug, Default)]
pub struct ConsoleHistory {
    entries: Vec<Url>,
}

impl ConsoleHistory {
    pub fn entries(&self) -> &[Url] {
        &self.entries
    }
}

impl HistoryGateway for ConsoleHistory {
    fn push_state(&mut self, url: &Url) {
        log::debug!("Push history entry {url}");
        self.entries.push(url.clone());
    }
}
