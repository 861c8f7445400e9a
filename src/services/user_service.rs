use crate::{
    auth::password::{hash_password, verify_password},
    db::dao::{DaoBase, DaoLayerError, UserDao},
    db::entities::user,
    services::auth_service::AuthError,
};

pub const MAX_USERNAME_LEN: usize = 64;
pub const MAX_EMAIL_LEN: usize = 120;

/// Registration form as submitted.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

impl Registration {
    fn validate(&self) -> Result<(), AuthError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(AuthError::Validation(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }

        let email = self.email.trim();
        if !looks_like_email(email) {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(AuthError::Validation(format!(
                "Email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }

        if self.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }
        if self.password != self.password2 {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

/// The credential store: users, their password hashes and login history.
#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, AuthError> {
        match self.user_dao.find_by_id(id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(AuthError::Store(err)),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AuthError> {
        Ok(self.user_dao.find_by_email(email).await?)
    }

    /// Creates the account. A taken username or email is reported as
    /// `DuplicateIdentity` whether the pre-check or the unique index catches it.
    pub async fn register(&self, form: &Registration) -> Result<user::Model, AuthError> {
        form.validate()?;
        let username = form.username.trim();
        let email = form.email.trim();

        if self.user_dao.find_by_username(username).await?.is_some()
            || self.user_dao.find_by_email(email).await?.is_some()
        {
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = hash_password(&form.password)?;
        match self
            .user_dao
            .create_user(username, email, &password_hash)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = user.id, "registered new user");
                Ok(user)
            }
            Err(DaoLayerError::Conflict(detail)) => {
                tracing::info!("registration lost a uniqueness race: {detail}");
                Err(AuthError::DuplicateIdentity)
            }
            Err(err) => Err(AuthError::Store(err)),
        }
    }

    pub fn verify_password(&self, user: &user::Model, password: &str) -> bool {
        verify_password(password, &user.password_hash)
    }

    pub async fn record_login(
        &self,
        user_id: i32,
        at: &chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<user::Model, AuthError> {
        Ok(self.user_dao.set_last_login(user_id, at).await?)
    }
}
