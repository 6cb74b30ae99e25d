use crate::{
    entities::{Id, ObservationRecord},
    results::Pagination,
};

/// The rendering collaborator of the result list.
pub trait ResultsView {
    /// Initial hint how to start a search.
    fn show_welcome(&mut self);
    fn show_loader(&mut self);
    fn show_results(&mut self, records: &[ObservationRecord], pagination: Option<&Pagination>);
    fn show_no_results(&mut self);
    fn show_failure(&mut self, message: &str);
    fn set_search_term(&mut self, term: &str);
    fn highlight_item(&mut self, id: &Id);
    fn unhighlight_item(&mut self, id: &Id);
}
