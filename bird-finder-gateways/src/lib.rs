//! HTTP access to the remote observation search.

use serde::de::DeserializeOwned;
use thiserror::Error;

use bird_finder_core::gateways;

mod inaturalist;

pub use self::inaturalist::*;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] reqwest::Error),

    #[error("The API responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl From<Error> for gateways::Error {
    fn from(err: Error) -> Self {
        Self::Other(err.into())
    }
}

pub async fn into_json<T>(response: reqwest::Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    // ensure we've got 2xx status
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = match response.json::<bird_finder_boundary::Error>().await {
        Ok(err) => err.error,
        Err(err) => {
            log::debug!("Unable to decode error response: {err}");
            status.canonical_reason().unwrap_or_default().to_string()
        }
    };
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
