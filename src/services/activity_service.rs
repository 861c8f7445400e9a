use serde::Deserialize;

use crate::{
    db::dao::{ActivityDao, DaoLayerError, OwnedDelete},
    db::entities::activity,
    upstream::Category,
};

pub const MAX_DESCRIPTION_LEN: usize = 256;
/// Stored in the `type` column when no category was chosen.
pub const ANY_CATEGORY: &str = "all";

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    // Both render the same text so a caller cannot tell them apart.
    #[error("Activity not found")]
    NotOwner,
    #[error("Activity not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("activity store error: {0}")]
    Store(#[from] DaoLayerError),
}

/// Body of a save request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub description: String,
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
    pub participants: i64,
}

impl NewActivity {
    fn normalized(&self) -> Result<(String, String, i32), ActivityError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ActivityError::Validation(
                "Description is required".to_string(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ActivityError::Validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let activity_type = match self.activity_type.as_deref().map(str::trim) {
            None | Some("") => ANY_CATEGORY.to_string(),
            Some(raw) if raw.eq_ignore_ascii_case(ANY_CATEGORY) => ANY_CATEGORY.to_string(),
            Some(raw) => raw
                .parse::<Category>()
                .map_err(ActivityError::Validation)?
                .as_str()
                .to_string(),
        };

        let participants = i32::try_from(self.participants)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or_else(|| {
                ActivityError::Validation("Participants must be a positive number".to_string())
            })?;

        Ok((description.to_string(), activity_type, participants))
    }
}

/// The activity store: favorites owned by exactly one user each.
#[derive(Clone)]
pub struct ActivityService {
    activity_dao: ActivityDao,
}

impl ActivityService {
    pub fn new(activity_dao: ActivityDao) -> Self {
        Self { activity_dao }
    }

    pub async fn save(
        &self,
        user_id: i32,
        input: &NewActivity,
    ) -> Result<activity::Model, ActivityError> {
        let (description, activity_type, participants) = input.normalized()?;
        let saved = self
            .activity_dao
            .create_for_user(user_id, &description, &activity_type, participants)
            .await?;
        tracing::info!(user_id, activity_id = saved.id, "saved favorite activity");
        Ok(saved)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<activity::Model>, ActivityError> {
        Ok(self.activity_dao.list_for_user(user_id).await?)
    }

    pub async fn remove(&self, activity_id: i32, user_id: i32) -> Result<(), ActivityError> {
        match self.activity_dao.delete_owned(activity_id, user_id).await? {
            OwnedDelete::Deleted => {
                tracing::info!(user_id, activity_id, "removed favorite activity");
                Ok(())
            }
            OwnedDelete::NotOwner => {
                tracing::warn!(user_id, activity_id, "refused to remove another user's activity");
                Err(ActivityError::NotOwner)
            }
            OwnedDelete::Missing => Err(ActivityError::NotFound),
        }
    }
}
