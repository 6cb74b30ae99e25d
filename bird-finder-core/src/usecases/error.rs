use thiserror::Error;

use crate::{entities::Id, gateways};

#[derive(Debug, Error)]
pub enum Error {
    #[error("There is no marker for record {0}")]
    UnknownRecord(Id),
    #[error("The number of records per page must be positive")]
    InvalidPerPage,
    #[error(transparent)]
    Gateway(#[from] gateways::Error),
}
