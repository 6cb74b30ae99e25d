use url::Url;

pub trait HistoryGateway {
    /// Push a new history entry without reloading the document.
    fn push_state(&mut self, url: &Url);
}
