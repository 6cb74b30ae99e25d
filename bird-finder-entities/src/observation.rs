use time::{macros::format_description, OffsetDateTime};

use crate::{geo::MapPoint, id::Id};

const SOUND_PLACEHOLDER: &str = "./assets/sound.png";
const DEFAULT_USER_ICON: &str =
    "https://www.inaturalist.org/attachment_defaults/users/icons/defaults/thumb.png";
const PEOPLE_BASE_URL: &str = "https://www.inaturalist.org/people";
const WIKIAVES_BASE_URL: &str = "https://www.wikiaves.com.br/wiki";
const ALL_ABOUT_BIRDS_BASE_URL: &str = "https://www.allaboutbirds.org/guide";

/// A single observation as delivered by the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub id: Id,
    /// Records without a position are never displayed.
    pub pos: Option<MapPoint>,
    pub taxon_name: String,
    pub preferred_common_name: Option<String>,
    pub english_common_name: Option<String>,
    pub species_guess: Option<String>,
    pub photos: Vec<Photo>,
    pub sounds: Vec<Sound>,
    pub description: Option<String>,
    pub place_guess: Option<String>,
    pub user: Observer,
    pub created_at: Option<OffsetDateTime>,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub url: String,
}

impl Photo {
    /// The remote API delivers square thumbnails.
    pub fn large_url(&self) -> String {
        self.url.replace("square", "large")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Observer {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl Observer {
    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or(&self.login)
    }

    pub fn icon_url(&self) -> &str {
        non_empty(self.icon.as_deref()).unwrap_or(DEFAULT_USER_ICON)
    }

    pub fn profile_url(&self) -> String {
        format!("{PEOPLE_BASE_URL}/{}", self.id)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

impl ObservationRecord {
    /// The first available common name or the given placeholder.
    pub fn species_name<'a>(&'a self, unnamed: &'a str) -> &'a str {
        non_empty(self.preferred_common_name.as_deref())
            .or_else(|| non_empty(self.english_common_name.as_deref()))
            .or_else(|| non_empty(self.species_guess.as_deref()))
            .unwrap_or(unnamed)
    }

    pub fn thumbnail_url(&self) -> &str {
        self.photos
            .first()
            .map(|p| p.url.as_str())
            .unwrap_or(SOUND_PLACEHOLDER)
    }

    pub fn large_photo_urls(&self) -> Vec<String> {
        self.photos.iter().map(Photo::large_url).collect()
    }

    pub fn has_position(&self) -> bool {
        self.pos.is_some_and(MapPoint::is_valid)
    }

    /// Number of slides in the media carousel.
    pub fn media_count(&self) -> usize {
        self.photos.len() + self.sounds.len()
    }

    /// Link to an external species guide that fits the user's language.
    pub fn reference_link(&self, lang: &str) -> Option<ReferenceLink> {
        let name = non_empty(self.preferred_common_name.as_deref())?;
        let link = if lang == "pt-BR" {
            ReferenceLink {
                title: "WikiAves",
                url: format!("{WIKIAVES_BASE_URL}/{name}"),
            }
        } else {
            ReferenceLink {
                title: "All About Birds",
                url: format!("{ALL_ABOUT_BIRDS_BASE_URL}/{}", name.replace(' ', "_")),
            }
        };
        Some(link)
    }

    pub fn created_on(&self) -> Option<String> {
        let fmt = format_description!("[year]-[month]-[day]");
        self.created_at.and_then(|ts| ts.date().format(&fmt).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLink {
    pub title: &'static str,
    pub url: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub results: Vec<ObservationRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total_results: u64,
}

impl ResultPage {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_results, self.per_page)
    }
}

pub fn total_pages(total_results: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total_results.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
