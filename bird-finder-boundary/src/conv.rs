use super::*;
use bird_finder_entities as e;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

fn map_point(from: GeoJsonPoint) -> Option<e::geo::MapPoint> {
    let GeoJsonPoint { kind, coordinates } = from;
    if kind != "Point" {
        return None;
    }
    // GeoJSON uses the [lng, lat] order
    match coordinates[..] {
        [lng, lat] => e::geo::MapPoint::try_from_lat_lng_deg(lat, lng).ok(),
        _ => None,
    }
}

impl From<User> for e::observation::Observer {
    fn from(from: User) -> Self {
        let User {
            id,
            login,
            name,
            icon,
        } = from;
        Self {
            id,
            login,
            name,
            icon,
        }
    }
}

impl From<ObservationPhoto> for e::observation::Photo {
    fn from(from: ObservationPhoto) -> Self {
        Self {
            url: from.photo.url,
        }
    }
}

impl From<ObservationSound> for e::observation::Sound {
    fn from(from: ObservationSound) -> Self {
        Self {
            url: from.sound.file_url,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(s, &Rfc3339)
        .map_err(|err| log::debug!("Unable to parse timestamp '{s}': {err}"))
        .ok()
}

impl From<Observation> for e::observation::ObservationRecord {
    fn from(from: Observation) -> Self {
        let Observation {
            id,
            geojson,
            taxon,
            species_guess,
            observation_photos,
            observation_sounds,
            description,
            place_guess,
            user,
            created_at,
            uri,
        } = from;
        let pos = geojson.and_then(map_point);
        let (taxon_name, preferred_common_name, english_common_name) = match taxon {
            Some(Taxon {
                name,
                preferred_common_name,
                english_common_name,
            }) => (name, preferred_common_name, english_common_name),
            None => (String::new(), None, None),
        };
        Self {
            id: id.into(),
            pos,
            taxon_name,
            preferred_common_name,
            english_common_name,
            species_guess,
            photos: observation_photos.into_iter().map(Into::into).collect(),
            sounds: observation_sounds.into_iter().map(Into::into).collect(),
            description: description.filter(|d| !d.trim().is_empty()),
            place_guess,
            user: user.into(),
            created_at: created_at.as_deref().and_then(parse_timestamp),
            permalink: uri.unwrap_or_default(),
        }
    }
}

impl From<ObservationsResponse> for e::observation::ResultPage {
    fn from(from: ObservationsResponse) -> Self {
        let ObservationsResponse {
            total_results,
            page,
            per_page,
            results,
        } = from;
        Self {
            results: results.into_iter().map(Into::into).collect(),
            page,
            per_page,
            total_results,
        }
    }
}
