use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::upstream::{
    ActivitySource, Category, ImageSource, UpstreamError,
    keywords::{MAX_KEYWORDS, extract_keywords},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub activity: String,
    #[serde(rename = "type")]
    pub category: String,
    pub participants: u32,
    #[serde(skip)]
    pub image_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("No activity found with the specified filters")]
    NoMatchingActivity {
        category: Option<Category>,
        participants: Option<u32>,
    },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Fetches a random activity and pairs it with a photo.
#[derive(Clone)]
pub struct ActivityAggregator {
    activities: Arc<dyn ActivitySource>,
    images: Arc<dyn ImageSource>,
}

impl ActivityAggregator {
    pub fn new(activities: Arc<dyn ActivitySource>, images: Arc<dyn ImageSource>) -> Self {
        Self { activities, images }
    }

    /// The image search runs only after a candidate was picked. A missing
    /// photo is not an error.
    pub async fn get_suggestion(
        &self,
        category: Option<Category>,
        participants: Option<u32>,
    ) -> Result<Suggestion, AggregatorError> {
        let candidates = self
            .activities
            .candidates(category, participants)
            .await
            .inspect_err(|err| tracing::warn!("activity lookup failed: {err}"))?;

        let picked = {
            let mut rng = rand::thread_rng();
            candidates.choose(&mut rng).cloned()
        };
        let Some(picked) = picked else {
            return Err(AggregatorError::NoMatchingActivity {
                category,
                participants,
            });
        };

        let query = extract_keywords(&picked.activity, MAX_KEYWORDS);
        let image_url = self
            .images
            .find_image(&query)
            .await
            .inspect_err(|err| tracing::warn!(%query, "image lookup failed: {err}"))?;
        if image_url.is_none() {
            tracing::debug!(%query, "no image for activity");
        }

        Ok(Suggestion {
            activity: picked.activity,
            category: picked.category,
            participants: picked.participants,
            image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        test_helpers::{StubActivitySource, StubImageSource, candidate},
        upstream::{Category, Service, UpstreamError, UpstreamErrorKind},
    };

    use super::{ActivityAggregator, AggregatorError};

    fn aggregator(
        activities: &Arc<StubActivitySource>,
        images: &Arc<StubImageSource>,
    ) -> ActivityAggregator {
        ActivityAggregator::new(activities.clone(), images.clone())
    }

    #[tokio::test]
    async fn combines_activity_and_image() {
        let activities = Arc::new(StubActivitySource::with_candidates(vec![candidate(
            "Go to the park and play basketball with friends",
            "recreational",
            3,
        )]));
        let images = Arc::new(StubImageSource::with_url("https://img.test/park.jpg"));

        let suggestion = aggregator(&activities, &images)
            .get_suggestion(Some(Category::Recreational), Some(3))
            .await
            .expect("suggestion");

        assert_eq!(suggestion.category, "recreational");
        assert_eq!(suggestion.participants, 3);
        assert_eq!(suggestion.image_url.as_deref(), Some("https://img.test/park.jpg"));
        assert_eq!(images.queries(), vec!["go park play".to_string()]);
        assert_eq!(
            activities.requests(),
            vec![(Some(Category::Recreational), Some(3))]
        );
    }

    #[tokio::test]
    async fn empty_candidates_skip_the_image_search() {
        let activities = Arc::new(StubActivitySource::with_candidates(Vec::new()));
        let images = Arc::new(StubImageSource::with_url("https://img.test/unused.jpg"));

        let err = aggregator(&activities, &images)
            .get_suggestion(Some(Category::Music), Some(8))
            .await
            .expect_err("nothing matches");

        assert!(matches!(
            err,
            AggregatorError::NoMatchingActivity {
                category: Some(Category::Music),
                participants: Some(8)
            }
        ));
        assert_eq!(images.calls(), 0);
    }

    #[tokio::test]
    async fn missing_image_is_not_a_failure() {
        let activities = Arc::new(StubActivitySource::with_candidates(vec![candidate(
            "Learn origami",
            "education",
            1,
        )]));
        let images = Arc::new(StubImageSource::empty());

        let suggestion = aggregator(&activities, &images)
            .get_suggestion(None, None)
            .await
            .expect("suggestion");

        assert_eq!(suggestion.activity, "Learn origami");
        assert!(suggestion.image_url.is_none());
    }

    #[tokio::test]
    async fn picked_candidate_comes_from_the_list() {
        let activities = Arc::new(StubActivitySource::with_candidates(vec![
            candidate("Bake bread", "cooking", 1),
            candidate("Paint a mural", "diy", 2),
            candidate("Write a poem", "relaxation", 1),
        ]));
        let images = Arc::new(StubImageSource::empty());
        let aggregator = aggregator(&activities, &images);

        for _ in 0..10 {
            let suggestion = aggregator.get_suggestion(None, None).await.expect("suggestion");
            assert!(
                ["Bake bread", "Paint a mural", "Write a poem"]
                    .contains(&suggestion.activity.as_str())
            );
        }
    }

    #[tokio::test]
    async fn upstream_failures_name_the_service() {
        let activities = Arc::new(StubActivitySource::failing(UpstreamError::new(
            Service::Activity,
            UpstreamErrorKind::Timeout,
        )));
        let images = Arc::new(StubImageSource::empty());
        let err = aggregator(&activities, &images)
            .get_suggestion(None, None)
            .await
            .expect_err("activity upstream down");
        assert!(matches!(
            err,
            AggregatorError::Upstream(UpstreamError { service: Service::Activity, .. })
        ));

        let activities = Arc::new(StubActivitySource::with_candidates(vec![candidate(
            "Bake bread",
            "cooking",
            1,
        )]));
        let images = Arc::new(StubImageSource::failing(UpstreamError::new(
            Service::Image,
            UpstreamErrorKind::Status(500),
        )));
        let err = aggregator(&activities, &images)
            .get_suggestion(None, None)
            .await
            .expect_err("image upstream down");
        assert!(matches!(
            err,
            AggregatorError::Upstream(UpstreamError { service: Service::Image, .. })
        ));
    }
}
