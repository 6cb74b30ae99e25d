use bird_finder_entities::builders::*;

use self::fakes::*;
use super::*;
use crate::{
    entities::*,
    gateways::{self, MapGateway},
    markers::PopupTransition,
    results::Phase,
    url_state::UrlStateSync,
};


type Controller = SearchController<FakeMap, FakeView, FakeHistory>;

fn settings() -> SearchSettings {
    SearchSettings {
        base_params: [("iconic_taxa", "Aves"), ("per_page", "30")]
            .into_iter()
            .collect(),
        default_per_page: 30,
        per_page_options: vec![10, 30, 50],
        default_lang: "en-US".into(),
    }
}

fn controller_with_url(url: &str) -> Controller {
    let url_state = UrlStateSync::new(url.parse().unwrap(), FakeHistory::default());
    SearchController::new(settings(), FakeMap::default(), FakeView::default(), url_state)
}

fn controller() -> Controller {
    controller_with_url("https://birds.example/")
}

fn record(id: u64) -> ObservationRecord {
    ObservationRecord::build()
        .id(&id.to_string())
        .pos(MapPoint::from_lat_lng_deg(
            -30.0 + id as f64 * 0.01,
            -51.2 + id as f64 * 0.01,
        ))
        .finish()
}

fn result_page(ids: impl IntoIterator<Item = u64>, page: u32, total_results: u64) -> ResultPage {
    ResultPage {
        results: ids.into_iter().map(record).collect(),
        page,
        per_page: 30,
        total_results,
    }
}

fn porto_alegre_circle() -> DrawnShape {
    DrawnShape::Circle {
        center: MapPoint::from_lat_lng_deg(-29.94, -51.21),
        radius_meters: 10_000.0,
    }
}

const BBOX_PARAMS: [&str; 4] = ["nelat", "nelng", "swlat", "swlng"];

#[test]
fn search_by_term_only() {
    let mut c = controller();
    let req = c.submit_term("Sicalis flaveola").unwrap();
    assert_eq!(req.params.get("q"), Some("Sicalis flaveola"));
    assert_eq!(req.params.get("page"), Some("1"));
    assert_eq!(req.params.get("per_page"), Some("30"));
    assert_eq!(req.params.get("locale"), Some("en-US"));
    assert_eq!(req.params.get("iconic_taxa"), Some("Aves"));
    for key in BBOX_PARAMS {
        assert!(!req.params.contains(key));
    }
    assert_eq!(c.state(), ControllerState::AwaitingResponse(req.id));
    assert_eq!(*c.store().phase(), Phase::Loading);
    assert_eq!(c.view().last(), Some(&ViewCall::Loader));

    let mut page = result_page(1..=4, 1, 5);
    page.results
        .push(ObservationRecord::build().id("99").without_pos().finish());
    let outcome = c.complete(req.id, Ok(page)).unwrap();
    assert_eq!(outcome, SearchOutcome::Populated { displayed: 4 });
    assert_eq!(c.state(), ControllerState::Ready);
    assert_eq!(*c.store().phase(), Phase::Populated);
    assert_eq!(c.markers().marker_count(), 4);
    assert!(!c.markers().has_marker(&"99".into()));
    let Some(ViewCall::Results { ids, pagination }) = c.view().last() else {
        panic!("no results shown");
    };
    assert_eq!(ids.len(), 4);
    assert!(pagination.is_none());
    assert_eq!(
        c.url_state().url().as_str(),
        "https://birds.example/?q=Sicalis+flaveola&page=1&per_page=30"
    );
    // without a drawn area the viewport is fitted to the markers
    let envelope = c.markers().map().markers_bounds().unwrap();
    assert!(c
        .markers()
        .map()
        .calls
        .contains(&MapCall::FitBounds(envelope)));
}

#[test]
fn search_by_drawn_circle() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=30, 1, 75))).unwrap();
    let req = c.go_to_page(2).unwrap();
    c.complete(req.id, Ok(result_page(31..=60, 2, 75))).unwrap();
    assert_eq!(c.store().page(), 2);

    c.clear_filters();
    let req = c.shape_drawn(porto_alegre_circle()).unwrap();
    for key in BBOX_PARAMS {
        assert!(req.params.contains(key), "missing {key}");
    }
    assert!(!req.params.contains("q"));
    assert_eq!(req.params.get("page"), Some("1"));
    let bbox = *c.bbox().unwrap();
    assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(-29.94, -51.21)));
    assert!(c
        .markers()
        .map()
        .calls
        .contains(&MapCall::ShowSearchArea(porto_alegre_circle())));

    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    // the drawn area wins over the marker envelope
    assert_eq!(
        c.markers().map().calls.last(),
        Some(&MapCall::FitBounds(bbox))
    );
    assert!(!c.url_state().contains("q"));
}

#[test]
fn drawing_resets_the_page() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=30, 1, 75))).unwrap();
    let req = c.go_to_page(3).unwrap();
    c.complete(req.id, Ok(result_page(61..=75, 3, 75))).unwrap();
    let req = c.shape_drawn(porto_alegre_circle()).unwrap();
    assert_eq!(req.params.get("page"), Some("1"));
    assert_eq!(req.params.get("q"), Some("owl"));
}

#[test]
fn page_count_of_previous_query_is_dropped() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=30, 1, 75))).unwrap();
    assert_eq!(c.store().total_pages(), 3);

    let req = c.shape_drawn(porto_alegre_circle()).unwrap();
    assert_eq!(c.store().total_pages(), 0);
    assert!(c.go_to_page(3).is_none());
    assert_eq!(c.state(), ControllerState::AwaitingResponse(req.id));

    c.complete(req.id, Ok(result_page(1..=30, 1, 40))).unwrap();
    assert!(c.go_to_page(3).is_none());
    let req = c.go_to_page(2).unwrap();
    assert_eq!(req.params.get("page"), Some("2"));
}

#[test]
fn paginate_within_range() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=30, 1, 75))).unwrap();
    assert_eq!(c.store().total_pages(), 3);
    let Some(ViewCall::Results {
        pagination: Some(pagination),
        ..
    }) = c.view().last()
    else {
        panic!("no pagination shown");
    };
    assert_eq!(pagination.total_pages, 3);
    assert_eq!(pagination.per_page_options, vec![10, 30, 50]);

    let pushed = c.url_state().history().pushed.len();
    assert!(c.go_to_page(4).is_none());
    assert!(c.go_to_page(0).is_none());
    assert!(c.go_to_page(1).is_none());
    assert_eq!(c.store().page(), 1);
    assert_eq!(*c.store().phase(), Phase::Populated);
    assert_eq!(c.url_state().history().pushed.len(), pushed);

    let req = c.go_to_page(2).unwrap();
    assert_eq!(req.params.get("page"), Some("2"));
    assert_eq!(*c.store().phase(), Phase::Loading);
    c.complete(req.id, Ok(result_page(31..=60, 2, 75))).unwrap();
    assert_eq!(c.url_state().get("page").as_deref(), Some("2"));
}

#[test]
fn empty_results() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=5, 1, 5))).unwrap();
    assert_eq!(c.markers().marker_count(), 5);

    let req = c.submit_term("dodo").unwrap();
    let outcome = c.complete(req.id, Ok(result_page([], 1, 0))).unwrap();
    assert_eq!(outcome, SearchOutcome::NoResults);
    assert_eq!(*c.store().phase(), Phase::NoResults);
    assert_eq!(c.markers().marker_count(), 0);
    assert!(c.markers().map().markers.is_empty());
    assert!(c.store().pagination(&[30]).is_none());
    assert_eq!(c.view().last(), Some(&ViewCall::NoResults));
}

#[test]
fn deleting_the_shape_keeps_the_term() {
    let mut c = controller();
    c.submit_term("owl");
    let req = c.shape_drawn(porto_alegre_circle()).unwrap();
    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();

    c.shape_deleted();
    assert!(c.bbox().is_none());
    assert_eq!(*c.store().phase(), Phase::Empty);
    assert_eq!(c.state(), ControllerState::Idle);
    assert_eq!(c.markers().marker_count(), 0);
    assert_eq!(c.term(), Some("owl"));
    assert_eq!(c.view().last(), Some(&ViewCall::Welcome));
}

#[test]
fn ineligible_triggers_keep_results() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    assert!(c.submit_term("   ").is_none());
    assert_eq!(c.term(), None);
    assert_eq!(*c.store().phase(), Phase::Populated);
    assert_eq!(c.markers().marker_count(), 3);
}

#[test]
fn nothing_to_search_for() {
    let mut c = controller();
    assert!(c.search().is_none());
    assert!(c.shape_drawn(DrawnShape::Polygon { vertices: vec![] }).is_none());
    assert_eq!(c.state(), ControllerState::Idle);
}

#[test]
fn stale_response_is_discarded() {
    let mut c = controller();
    let first = c.submit_term("owl").unwrap();
    let second = c.shape_drawn(porto_alegre_circle()).unwrap();
    assert_ne!(first.id, second.id);

    let outcome = c.complete(second.id, Ok(result_page(1..=2, 1, 2))).unwrap();
    assert_eq!(outcome, SearchOutcome::Populated { displayed: 2 });
    let outcome = c.complete(first.id, Ok(result_page(10..=20, 1, 11))).unwrap();
    assert_eq!(outcome, SearchOutcome::Discarded);
    assert_eq!(c.store().records().len(), 2);
    assert_eq!(c.markers().marker_count(), 2);
}

#[test]
fn stale_response_arriving_first_is_discarded() {
    let mut c = controller();
    let first = c.submit_term("owl").unwrap();
    let second = c.submit_term("hawk").unwrap();
    let outcome = c.complete(first.id, Ok(result_page(1..=5, 1, 5))).unwrap();
    assert_eq!(outcome, SearchOutcome::Discarded);
    assert_eq!(*c.store().phase(), Phase::Loading);
    assert_eq!(c.state(), ControllerState::AwaitingResponse(second.id));
    c.complete(second.id, Ok(result_page(1..=1, 1, 1))).unwrap();
    assert_eq!(c.url_state().get("q").as_deref(), Some("hawk"));
}

#[test]
fn deleting_the_shape_abandons_pending_request() {
    let mut c = controller();
    let req = c.shape_drawn(porto_alegre_circle()).unwrap();
    c.shape_deleted();
    let outcome = c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    assert_eq!(outcome, SearchOutcome::Discarded);
    assert_eq!(*c.store().phase(), Phase::Empty);
    assert_eq!(c.markers().marker_count(), 0);
}

#[test]
fn failed_request() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    let err = gateways::Error::Other(anyhow::anyhow!("connection refused"));
    let err = c.complete(req.id, Err(err)).unwrap_err();
    assert!(matches!(err, Error::Gateway(_)));
    assert_eq!(
        *c.store().phase(),
        Phase::Failed("connection refused".into())
    );
    assert_eq!(c.state(), ControllerState::Ready);
    assert_eq!(
        c.view().last(),
        Some(&ViewCall::Failure("connection refused".into()))
    );
    assert!(c.url_state().history().pushed.is_empty());

    // recoverable
    let req = c.search().unwrap();
    c.complete(req.id, Ok(result_page(1..=2, 1, 2))).unwrap();
    assert_eq!(*c.store().phase(), Phase::Populated);
}

#[test]
fn change_page_size() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=30, 1, 75))).unwrap();
    let req = c.go_to_page(2).unwrap();
    c.complete(req.id, Ok(result_page(31..=60, 2, 75))).unwrap();

    assert!(matches!(c.set_per_page(0), Err(Error::InvalidPerPage)));
    let req = c.set_per_page(50).unwrap().unwrap();
    assert_eq!(req.params.get("per_page"), Some("50"));
    assert_eq!(req.params.get("page"), Some("1"));
}

#[test]
fn resubmitting_the_same_term_keeps_the_page() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=30, 1, 75))).unwrap();
    let req = c.go_to_page(2).unwrap();
    c.complete(req.id, Ok(result_page(31..=60, 2, 75))).unwrap();
    let req = c.submit_term(" owl ").unwrap();
    assert_eq!(req.params.get("page"), Some("2"));
    let req = c.submit_term("hawk").unwrap();
    assert_eq!(req.params.get("page"), Some("1"));
}

#[test]
fn clear_filters() {
    let mut c = controller_with_url("https://birds.example/?lang=pt-BR");
    c.restore_from_url();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    c.set_per_page(10).unwrap();

    c.clear_filters();
    assert_eq!(c.term(), None);
    assert!(c.bbox().is_none());
    assert_eq!(c.state(), ControllerState::Idle);
    assert_eq!(c.store().page(), 1);
    assert_eq!(c.store().per_page(), 30);
    assert_eq!(c.markers().marker_count(), 0);
    assert!(c.view().calls.contains(&ViewCall::SearchTerm("".into())));
    assert_eq!(c.url_state().url().as_str(), "https://birds.example/?lang=pt-BR");
}

#[test]
fn restore_state_from_url() {
    let mut c = controller_with_url("https://birds.example/?q=owl&page=2&per_page=50&lang=pt_BR");
    let req = c.restore_from_url().unwrap();
    assert_eq!(c.lang(), "pt_BR");
    assert_eq!(req.params.get("q"), Some("owl"));
    assert_eq!(req.params.get("page"), Some("2"));
    assert_eq!(req.params.get("per_page"), Some("50"));
    assert_eq!(req.params.get("locale"), Some("pt-BR"));
    assert!(c.view().calls.contains(&ViewCall::SearchTerm("owl".into())));
}

#[test]
fn restore_without_term() {
    let mut c = controller_with_url("https://birds.example/?page=abc&per_page=0");
    assert!(c.restore_from_url().is_none());
    assert_eq!(c.store().page(), 1);
    assert_eq!(c.store().per_page(), 30);
    assert_eq!(c.lang(), "en-US");
    assert_eq!(c.view().last(), Some(&ViewCall::Welcome));
}

#[test]
fn search_around_location() {
    let mut c = controller();
    let pos = MapPoint::from_lat_lng_deg(-29.94, -51.21);
    let req = c.location_found(pos, 10.0).unwrap();
    for key in BBOX_PARAMS {
        assert!(req.params.contains(key));
    }
    let calls = &c.markers().map().calls;
    assert!(calls.contains(&MapCall::ShowUserLocation(pos)));
    assert!(calls.contains(&MapCall::ShowSearchArea(porto_alegre_circle())));
    assert!(calls.contains(&MapCall::FitBounds(*c.bbox().unwrap())));
}

#[test]
fn toggle_popup_of_listed_record() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    let id = Id::from("2");

    let PopupTransition::Opening { reveal_after, .. } = c.toggle_popup(&id).unwrap() else {
        panic!("popup not opening");
    };
    assert_eq!(reveal_after, crate::markers::POPUP_REVEAL_DELAY);
    assert!(c.reveal_popup(&id));
    assert_eq!(c.view().last(), Some(&ViewCall::Highlight(id.clone())));

    assert_eq!(
        c.toggle_popup(&id).unwrap(),
        PopupTransition::Closed { id: id.clone() }
    );
    assert_eq!(c.view().last(), Some(&ViewCall::Unhighlight(id)));
    assert!(matches!(
        c.toggle_popup(&"42".into()),
        Err(Error::UnknownRecord(_))
    ));
}

#[test]
fn popup_reveal_after_new_results() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    c.toggle_popup(&"1".into()).unwrap();
    let req = c.submit_term("hawk").unwrap();
    c.complete(req.id, Ok(result_page(10..=12, 1, 3))).unwrap();
    assert!(!c.reveal_popup(&"1".into()));
}

#[test]
fn popups_opened_and_closed_on_the_map() {
    let mut c = controller();
    let req = c.submit_term("owl").unwrap();
    c.complete(req.id, Ok(result_page(1..=3, 1, 3))).unwrap();
    c.popup_opened(&"1".into());
    c.popup_opened(&"3".into());
    let calls = &c.view().calls;
    let tail = &calls[calls.len() - 3..];
    assert_eq!(
        tail,
        [
            ViewCall::Highlight("1".into()),
            ViewCall::Unhighlight("1".into()),
            ViewCall::Highlight("3".into()),
        ]
    );
    c.popup_closed(&"3".into());
    assert_eq!(c.view().last(), Some(&ViewCall::Unhighlight("3".into())));

    c.popup_opened(&"2".into());
    c.draw_started();
    assert_eq!(c.view().last(), Some(&ViewCall::Unhighlight("2".into())));
    assert_eq!(
        c.markers().map().calls.last(),
        Some(&MapCall::CloseAllPopups)
    );
}

#[test]
fn default_view() {
    let mut c = controller();
    c.set_default_view();
    assert_eq!(c.markers().map().calls, vec![MapCall::ShowDefaultView]);
}

#[tokio::test]
async fn execute_request_with_gateway() {
    let mut c = controller();
    let api = FakeApi {
        response: Some(result_page(1..=3, 1, 3)),
        ..Default::default()
    };
    let req = c.submit_term("owl").unwrap();
    let outcome = c.execute(&api, req.clone()).await.unwrap();
    assert_eq!(outcome, SearchOutcome::Populated { displayed: 3 });
    assert_eq!(*api.requests.borrow(), vec![req.params]);

    let failing = FakeApi::default();
    let req = c.search().unwrap();
    assert!(c.execute(&failing, req).await.is_err());
    assert!(matches!(c.store().phase(), Phase::Failed(_)));
}
