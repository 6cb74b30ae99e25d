use async_trait::async_trait;
use url::Url;

use bird_finder_boundary::ObservationsResponse;
use bird_finder_core::{
    entities::ResultPage,
    gateways::{self, ObservationGateway},
    usecases::SearchParams,
};

use crate::{into_json, Result};

/// The public iNaturalist API (v1).
#[derive(Debug, Clone)]
pub struct InaturalistApi {
    client: reqwest::Client,
    url: String,
}

impl InaturalistApi {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn observations_url(&self, params: &SearchParams) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/observations", self.url.trim_end_matches('/')))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    pub async fn search_observations(&self, params: &SearchParams) -> Result<ObservationsResponse> {
        let url = self.observations_url(params)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        into_json(response).await
    }
}

#[async_trait(?Send)]
impl ObservationGateway for InaturalistApi {
    async fn observations(
        &self,
        params: &SearchParams,
    ) -> std::result::Result<ResultPage, gateways::Error> {
        let response = self.search_observations(params).await?;
        log::debug!(
            "Received {} of {} observations",
            response.results.len(),
            response.total_results
        );
        Ok(response.into())
    }
}
