use std::fmt;

use super::{build_params, Result, SearchParams, SearchQuery};
use crate::{
    bbox::derive_bbox,
    entities::*,
    gateways::{self, HistoryGateway, MapGateway, ObservationGateway, ResultsView},
    markers::{MarkerSyncEngine, PopupTransition},
    results::{Phase, SearchResultStore},
    text::locale_from_lang,
    url_state::{UrlStateSync, PARAM_LANG, PARAM_PAGE, PARAM_PER_PAGE, PARAM_TERM},
};

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Parameters that are sent with every request.
    pub base_params: SearchParams,
    pub default_per_page: u32,
    pub per_page_options: Vec<u32>,
    pub default_lang: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request that has to be sent to the [`ObservationGateway`].
///
/// The response must be passed back with [`SearchController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: RequestId,
    pub params: SearchParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingResponse(RequestId),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Populated { displayed: usize },
    NoResults,
    /// A newer request has been started in the meantime.
    Discarded,
}

#[derive(Debug)]
struct PendingRequest {
    id: RequestId,
    term: Option<String>,
}

/// Orchestrates searching and keeps the map, the result list
/// and the URL in sync with each other.
///
/// All triggers that need data from the remote API return a
/// [`SearchRequest`]. Only the response of the most recent
/// request is accepted.
#[derive(Debug)]
pub struct SearchController<M, V, H> {
    settings: SearchSettings,
    markers: MarkerSyncEngine<M>,
    view: V,
    url_state: UrlStateSync<H>,
    store: SearchResultStore,
    term: Option<String>,
    bbox: Option<MapBbox>,
    lang: String,
    last_request_id: u64,
    pending: Option<PendingRequest>,
}

impl<M, V, H> SearchController<M, V, H>
where
    M: MapGateway,
    V: ResultsView,
    H: HistoryGateway,
{
    pub fn new(settings: SearchSettings, map: M, view: V, url_state: UrlStateSync<H>) -> Self {
        let store = SearchResultStore::new(settings.default_per_page);
        let lang = settings.default_lang.clone();
        Self {
            settings,
            markers: MarkerSyncEngine::new(map),
            view,
            url_state,
            store,
            term: None,
            bbox: None,
            lang,
            last_request_id: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        if let Some(pending) = &self.pending {
            return ControllerState::AwaitingResponse(pending.id);
        }
        if *self.store.phase() == Phase::Empty {
            ControllerState::Idle
        } else {
            ControllerState::Ready
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn store(&self) -> &SearchResultStore {
        &self.store
    }

    pub fn markers(&self) -> &MarkerSyncEngine<M> {
        &self.markers
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn url_state(&self) -> &UrlStateSync<H> {
        &self.url_state
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn bbox(&self) -> Option<&MapBbox> {
        self.bbox.as_ref()
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn locale(&self) -> String {
        locale_from_lang(&self.lang)
    }

    /// Take over the state of a shared URL.
    ///
    /// A search is only started if the URL contains a term.
    pub fn restore_from_url(&mut self) -> Option<SearchRequest> {
        let page = self.url_state.read_or_default(PARAM_PAGE, 1_u32);
        let per_page = self
            .url_state
            .read_or_default(PARAM_PER_PAGE, self.settings.default_per_page);
        if let Err(err) = self.store.restore(page, per_page) {
            log::warn!("Ignoring per_page from URL: {err}");
        }
        self.lang = self
            .url_state
            .read_or_default(PARAM_LANG, self.settings.default_lang.clone());
        self.view.show_welcome();
        let term = self
            .url_state
            .get(PARAM_TERM)
            .filter(|t| !t.trim().is_empty())?;
        log::debug!("Restoring search for '{term}' from URL");
        self.term = Some(term);
        self.search()
    }

    /// Start a new request for the current query.
    ///
    /// Returns `None` if the query is not constrained by
    /// a term or a bounding box.
    pub fn search(&mut self) -> Option<SearchRequest> {
        let query = self.query();
        if !query.is_eligible() {
            log::debug!("Neither a search term nor an area is defined");
            return None;
        }
        let params = build_params(&query, &self.settings.base_params);
        self.last_request_id += 1;
        let id = RequestId(self.last_request_id);
        if let Some(superseded) = self.pending.take() {
            log::debug!("Request {} is superseded by {id}", superseded.id);
        }
        self.pending = Some(PendingRequest {
            id,
            term: query.term().map(ToString::to_string),
        });
        if let Some(term) = query.term() {
            self.view.set_search_term(term);
        }
        self.markers.clear();
        self.store.begin_search();
        self.view.show_loader();
        log::info!("Searching observations {id}: {params}");
        Some(SearchRequest { id, params })
    }

    /// Feed the response of a request back into the controller.
    pub fn complete(
        &mut self,
        id: RequestId,
        response: std::result::Result<ResultPage, gateways::Error>,
    ) -> Result<SearchOutcome> {
        let Some(pending) = self.pending.take_if(|p| p.id == id) else {
            log::warn!("Discarding stale response of request {id}");
            return Ok(SearchOutcome::Discarded);
        };
        let result_page = match response {
            Ok(result_page) => result_page,
            Err(err) => {
                log::warn!("Request {id} failed: {err}");
                let message = err.to_string();
                self.store.fail(&message);
                self.view.show_failure(&message);
                return Err(err.into());
            }
        };
        self.store.ingest(result_page);
        self.persist_query(pending.term.as_deref());
        let outcome = match self.store.phase() {
            Phase::Populated => {
                self.markers.rebuild(self.store.records());
                self.markers.fit_viewport_to_results(self.bbox.as_ref());
                let pagination = self.store.pagination(&self.settings.per_page_options);
                self.view
                    .show_results(self.store.records(), pagination.as_ref());
                SearchOutcome::Populated {
                    displayed: self.store.records().len(),
                }
            }
            _ => {
                self.markers.clear();
                self.view.show_no_results();
                SearchOutcome::NoResults
            }
        };
        log::debug!("Request {id} completed: {outcome:?}");
        Ok(outcome)
    }

    /// Send the request and process its response.
    pub async fn execute<G>(&mut self, gateway: &G, request: SearchRequest) -> Result<SearchOutcome>
    where
        G: ObservationGateway,
    {
        let response = gateway.observations(&request.params).await;
        self.complete(request.id, response)
    }

    pub fn draw_started(&mut self) {
        if let Some(id) = self.markers.close_popups() {
            self.view.unhighlight_item(&id);
        }
    }

    pub fn shape_drawn(&mut self, shape: DrawnShape) -> Option<SearchRequest> {
        let Some(bbox) = derive_bbox(&shape) else {
            log::warn!("Ignoring {} without any vertices", shape.kind());
            return None;
        };
        log::debug!("Drawn {} covers {bbox}", shape.kind());
        let map = self.markers.map_mut();
        map.clear_search_area();
        map.show_search_area(&shape);
        self.bbox = Some(bbox);
        self.store.reset_page();
        self.search()
    }

    /// The drawn shape has been removed from the map.
    ///
    /// The results are cleared even if a term is still present.
    pub fn shape_deleted(&mut self) {
        self.bbox = None;
        self.reset_results();
        self.markers.map_mut().clear_search_area();
    }

    /// Search around the user's position.
    pub fn location_found(&mut self, pos: MapPoint, buffer_km: f64) -> Option<SearchRequest> {
        let shape = DrawnShape::buffer_around(pos, buffer_km);
        let bbox = derive_bbox(&shape)?;
        let map = self.markers.map_mut();
        map.clear_search_area();
        map.show_user_location(pos);
        map.show_search_area(&shape);
        map.fit_bounds(&bbox);
        self.bbox = Some(bbox);
        self.store.reset_page();
        self.search()
    }

    pub fn submit_term(&mut self, term: &str) -> Option<SearchRequest> {
        let term = Some(term.trim())
            .filter(|t| !t.is_empty())
            .map(ToString::to_string);
        if term != self.term {
            self.store.reset_page();
            self.term = term;
        }
        self.search()
    }

    /// Out of range pages and the current page are ignored.
    pub fn go_to_page(&mut self, page: u32) -> Option<SearchRequest> {
        if !self.store.go_to_page(page) {
            return None;
        }
        self.search()
    }

    pub fn set_per_page(&mut self, per_page: u32) -> Result<Option<SearchRequest>> {
        self.store.set_per_page(per_page)?;
        Ok(self.search())
    }

    pub fn clear_filters(&mut self) {
        self.bbox = None;
        self.term = None;
        self.reset_results();
        if let Err(err) = self.store.restore(1, self.settings.default_per_page) {
            log::warn!("Failed to reset pagination: {err}");
        }
        self.markers.map_mut().clear_search_area();
        self.view.set_search_term("");
        for key in [PARAM_TERM, PARAM_PAGE, PARAM_PER_PAGE] {
            self.url_state.remove_if_present(key);
        }
    }

    pub fn set_default_view(&mut self) {
        self.markers.map_mut().show_default_view();
    }

    /// Open or close the popup of a listed record.
    pub fn toggle_popup(&mut self, id: &Id) -> Result<PopupTransition> {
        let transition = self.markers.toggle_popup(id, self.bbox.as_ref())?;
        if let PopupTransition::Closed { id } = &transition {
            self.view.unhighlight_item(id);
        }
        Ok(transition)
    }

    /// Finish [`PopupTransition::Opening`] after its delay has elapsed.
    pub fn reveal_popup(&mut self, id: &Id) -> bool {
        let previous = self.markers.open_popup().cloned();
        if !self.markers.reveal_popup(id) {
            return false;
        }
        self.highlight_opened(previous, id);
        true
    }

    /// The user opened a popup directly on the map.
    pub fn popup_opened(&mut self, id: &Id) {
        let previous = self.markers.open_popup().cloned();
        if self.markers.popup_opened(id) {
            self.highlight_opened(previous, id);
        }
    }

    /// The user closed a popup directly on the map.
    pub fn popup_closed(&mut self, id: &Id) {
        if self.markers.popup_closed(id) {
            self.view.unhighlight_item(id);
        }
    }

    fn highlight_opened(&mut self, previous: Option<Id>, id: &Id) {
        if let Some(previous) = previous.filter(|p| p != id) {
            self.view.unhighlight_item(&previous);
        }
        self.view.highlight_item(id);
    }

    fn reset_results(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Abandoning request {}", pending.id);
        }
        self.store.clear();
        self.markers.clear();
        self.view.show_welcome();
    }

    fn query(&self) -> SearchQuery {
        SearchQuery {
            term: self.term.clone(),
            bbox: self.bbox,
            page: self.store.page(),
            per_page: self.store.per_page(),
            locale: self.locale(),
        }
    }

    fn persist_query(&mut self, term: Option<&str>) {
        match term {
            Some(term) => self.url_state.set_or_update(PARAM_TERM, term),
            None => {
                self.url_state.remove_if_present(PARAM_TERM);
            }
        }
        self.url_state.set_or_update(PARAM_PAGE, self.store.page());
        self.url_state
            .set_or_update(PARAM_PER_PAGE, self.store.per_page());
    }
}
