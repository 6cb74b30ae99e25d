mod build_params;
mod error;
mod search;

#[cfg(test)]
pub mod tests;

pub use self::{build_params::*, error::Error, search::*};

type Result<T> = std::result::Result<T, Error>;
