use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{ActivitySource, Candidate, Category, Service, UpstreamError, UpstreamErrorKind};

/// Client for the activity filter endpoint.
#[derive(Clone)]
pub struct BoredClient {
    client: Client,
    url: String,
}

impl BoredClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ActivitySource for BoredClient {
    async fn candidates(
        &self,
        category: Option<Category>,
        participants: Option<u32>,
    ) -> Result<Vec<Candidate>, UpstreamError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(category) = category {
            params.push(("type", category.as_str().to_string()));
        }
        if let Some(participants) = participants {
            params.push(("participants", participants.to_string()));
        }

        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(|err| UpstreamError::from_reqwest(Service::Activity, err))?;

        // The filter endpoint answers 404 when nothing matches.
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("activity endpoint reported no match");
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(UpstreamError::new(
                Service::Activity,
                UpstreamErrorKind::Status(response.status().as_u16()),
            ));
        }

        response
            .json::<Vec<Candidate>>()
            .await
            .map_err(|err| UpstreamError::from_reqwest(Service::Activity, err))
    }
}
