//! # bird-finder-core
//!
//! Keeps the drawn search region, the remote search results, the map markers
//! and the persisted URL state of the bird finder consistent with each other.
//!
//! All collaborators (map, result list, browser history, remote API) are
//! accessed through the traits in [`gateways`].

pub mod bbox;
pub mod gateways;
pub mod markers;
pub mod results;
pub mod text;
pub mod url_state;
pub mod usecases;

pub mod entities {
    pub use bird_finder_entities::{geo::*, id::*, observation::*, shape::*};
}
