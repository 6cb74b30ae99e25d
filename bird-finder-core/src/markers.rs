use std::{collections::HashMap, time::Duration};

use crate::{entities::*, gateways::MapGateway, usecases::Error};

/// Time for cluster animations to settle before a popup is revealed.
pub const POPUP_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Latitude offset for moving an opened popup into view.
const POPUP_PAN_OFFSET_DEG: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupTransition {
    /// The popup has to be revealed with [`MarkerSyncEngine::reveal_popup`]
    /// once `reveal_after` has elapsed.
    Opening { id: Id, reveal_after: Duration },
    Closed { id: Id },
}

/// Keeps exactly one map marker per displayed record
/// and tracks the single open popup.
#[derive(Debug)]
pub struct MarkerSyncEngine<M> {
    map: M,
    markers: HashMap<Id, MapPoint>,
    open_popup: Option<Id>,
}

impl<M> MarkerSyncEngine<M>
where
    M: MapGateway,
{
    pub fn new(map: M) -> Self {
        Self {
            map,
            markers: HashMap::new(),
            open_popup: None,
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn has_marker(&self, id: &Id) -> bool {
        self.markers.contains_key(id)
    }

    pub fn open_popup(&self) -> Option<&Id> {
        self.open_popup.as_ref()
    }

    /// Replace all markers by those of the given records.
    ///
    /// Records without a position don't get a marker.
    pub fn rebuild(&mut self, records: &[ObservationRecord]) {
        self.clear();
        for record in records {
            let Some(pos) = record.pos.filter(|pos| pos.is_valid()) else {
                continue;
            };
            debug_assert!(!self.markers.contains_key(&record.id));
            self.map.add_marker(&record.id, pos);
            self.markers.insert(record.id.clone(), pos);
        }
        log::debug!("Rebuilt {} markers", self.markers.len());
    }

    pub fn clear(&mut self) {
        self.open_popup = None;
        self.markers.clear();
        self.map.clear_markers();
    }

    /// Show the search area if there is one or otherwise all markers.
    pub fn fit_viewport_to_results(&mut self, bbox: Option<&MapBbox>) {
        match bbox.copied().or_else(|| self.map.markers_bounds()) {
            Some(bbox) => self.map.fit_bounds(&bbox),
            None => log::debug!("Nothing to fit the viewport to"),
        }
    }

    pub fn toggle_popup(
        &mut self,
        id: &Id,
        bbox: Option<&MapBbox>,
    ) -> Result<PopupTransition, Error> {
        let pos = *self
            .markers
            .get(id)
            .ok_or_else(|| Error::UnknownRecord(id.clone()))?;
        if self.open_popup.as_ref() == Some(id) {
            self.map.close_popup(id);
            self.open_popup = None;
            self.fit_viewport_to_results(bbox);
            return Ok(PopupTransition::Closed { id: id.clone() });
        }
        self.map.fit_bounds(&MapBbox::around_point(pos));
        Ok(PopupTransition::Opening {
            id: id.clone(),
            reveal_after: POPUP_REVEAL_DELAY,
        })
    }

    /// Open a popup that has been scheduled by [`Self::toggle_popup`].
    ///
    /// Returns `false` if the marker no longer exists.
    pub fn reveal_popup(&mut self, id: &Id) -> bool {
        if !self.markers.contains_key(id) {
            log::debug!("Marker {id} disappeared before its popup could be opened");
            return false;
        }
        if self.map.is_in_collapsed_cluster(id) {
            self.map.zoom_to_show_and_open_popup(id);
        } else {
            self.map.open_popup(id);
        }
        self.popup_opened(id)
    }

    /// A popup has been opened on the map.
    ///
    /// Returns `false` for unknown markers.
    pub fn popup_opened(&mut self, id: &Id) -> bool {
        let Some(pos) = self.markers.get(id).copied() else {
            return false;
        };
        if let Some(previous) = self.open_popup.replace(id.clone()) {
            if previous != *id {
                self.map.close_popup(&previous);
            }
        }
        self.map.pan_to(MapPoint::new(
            LatCoord::from_deg(pos.lat().to_deg() + POPUP_PAN_OFFSET_DEG).clamp(),
            pos.lng(),
        ));
        true
    }

    /// A popup has been closed on the map.
    pub fn popup_closed(&mut self, id: &Id) -> bool {
        if self.open_popup.as_ref() != Some(id) {
            return false;
        }
        self.open_popup = None;
        true
    }

    /// Close all popups and return the one that has been open.
    pub fn close_popups(&mut self) -> Option<Id> {
        self.map.close_all_popups();
        self.open_popup.take()
    }
}
