//! Clients for the two external HTTP services: the activity suggestion
//! endpoint and the photo search endpoint.

pub mod bored;
pub mod keywords;
pub mod unsplash;

use std::{fmt, str::FromStr, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use bored::BoredClient;
pub use unsplash::UnsplashClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recreational,
    Social,
    Diy,
    Education,
    Charity,
    Cooking,
    Relaxation,
    Music,
    Busywork,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Recreational,
        Category::Social,
        Category::Diy,
        Category::Education,
        Category::Charity,
        Category::Cooking,
        Category::Relaxation,
        Category::Music,
        Category::Busywork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Recreational => "recreational",
            Category::Social => "social",
            Category::Diy => "diy",
            Category::Education => "education",
            Category::Charity => "charity",
            Category::Cooking => "cooking",
            Category::Relaxation => "relaxation",
            Category::Music => "music",
            Category::Busywork => "busywork",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Recreational => "Recreational",
            Category::Social => "Social",
            Category::Diy => "DIY",
            Category::Education => "Education",
            Category::Charity => "Charity",
            Category::Cooking => "Cooking",
            Category::Relaxation => "Relaxation",
            Category::Music => "Music",
            Category::Busywork => "Busywork",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| format!("Unknown activity type: {value}"))
    }
}

/// One suggestion as returned by the activity endpoint, before selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub activity: String,
    #[serde(rename = "type")]
    pub category: String,
    pub participants: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Activity,
    Image,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Activity => f.write_str("activity"),
            Service::Image => f.write_str("image"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamErrorKind {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service} service error: {kind}")]
pub struct UpstreamError {
    pub service: Service,
    pub kind: UpstreamErrorKind,
}

impl UpstreamError {
    pub fn new(service: Service, kind: UpstreamErrorKind) -> Self {
        Self { service, kind }
    }

    pub(crate) fn from_reqwest(service: Service, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            UpstreamErrorKind::Timeout
        } else if err.is_decode() {
            UpstreamErrorKind::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamErrorKind::Status(status.as_u16())
        } else {
            UpstreamErrorKind::Transport(err.to_string())
        };
        Self::new(service, kind)
    }
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn candidates(
        &self,
        category: Option<Category>,
        participants: Option<u32>,
    ) -> Result<Vec<Candidate>, UpstreamError>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// `Ok(None)` when the search has no usable photo.
    async fn find_image(&self, query: &str) -> Result<Option<String>, UpstreamError>;
}

/// The one HTTP client shared by both upstream clients.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("activity_finder/", env!("CARGO_PKG_VERSION")))
        .build()
}
