use async_trait::async_trait;
use thiserror::Error;

use crate::{entities::ResultPage, usecases::SearchParams};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The remote, paginated observation search.
#[async_trait(?Send)]
pub trait ObservationGateway {
    async fn observations(&self, params: &SearchParams) -> Result<ResultPage, Error>;
}
