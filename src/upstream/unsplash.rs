use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde::Deserialize;

use super::{ImageSource, Service, UpstreamError, UpstreamErrorKind};

/// Client for the random photo search endpoint.
#[derive(Clone)]
pub struct UnsplashClient {
    client: Client,
    url: String,
    access_key: String,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    small: Option<String>,
}

impl UnsplashClient {
    pub fn new(client: Client, url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            access_key: access_key.into(),
        }
    }
}

fn first_small_url(photos: Option<Vec<Photo>>) -> Option<String> {
    photos?
        .into_iter()
        .next()?
        .urls?
        .small
        .filter(|url| !url.trim().is_empty())
}

#[async_trait]
impl ImageSource for UnsplashClient {
    async fn find_image(&self, query: &str) -> Result<Option<String>, UpstreamError> {
        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .query(&[("query", query), ("orientation", "landscape"), ("count", "1")])
            .send()
            .await
            .map_err(|err| UpstreamError::from_reqwest(Service::Image, err))?;

        if !response.status().is_success() {
            return Err(UpstreamError::new(
                Service::Image,
                UpstreamErrorKind::Status(response.status().as_u16()),
            ));
        }

        let photos = response
            .json::<Option<Vec<Photo>>>()
            .await
            .map_err(|err| UpstreamError::from_reqwest(Service::Image, err))?;
        Ok(first_small_url(photos))
    }
}

#[cfg(test)]
mod tests {
    use super::{Photo, first_small_url};

    fn parse(raw: &str) -> Option<Vec<Photo>> {
        serde_json::from_str(raw).expect("payload should parse")
    }

    #[test]
    fn picks_small_url_of_first_photo() {
        let photos = parse(
            r#"[{"urls":{"small":"https://img/1-small","raw":"https://img/1"}},
                {"urls":{"small":"https://img/2-small"}}]"#,
        );
        assert_eq!(first_small_url(photos).as_deref(), Some("https://img/1-small"));
    }

    #[test]
    fn empty_or_null_results_have_no_image() {
        assert_eq!(first_small_url(parse("[]")), None);
        assert_eq!(first_small_url(parse("null")), None);
    }

    #[test]
    fn photo_without_small_url_has_no_image() {
        assert_eq!(first_small_url(parse(r#"[{"urls":{"raw":"x"}}]"#)), None);
        assert_eq!(first_small_url(parse(r#"[{"id":"abc"}]"#)), None);
    }
}
