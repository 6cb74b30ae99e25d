#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # bird-finder-entities
//!
//! Reusable, agnostic domain entities for the bird finder.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod geo;
pub mod id;
pub mod observation;
pub mod shape;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
