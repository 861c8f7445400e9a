use crate::{
    auth::{
        SessionClaims, SessionKeys,
        session::{decode_session, encode_session},
    },
    db::{dao::DaoLayerError, entities::user},
    services::user_service::UserService,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username or email is already registered")]
    DuplicateIdentity,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please log in to access this page")]
    Unauthenticated,
    #[error("{0}")]
    Validation(String),
    #[error("credential store error: {0}")]
    Store(#[from] DaoLayerError),
    /// Hashing or token signing failed; never shown to the user.
    #[error("internal auth failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Store(_) | AuthError::Internal(_))
    }
}

/// A freshly established session: the user and the token to hand back.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: user::Model,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    keys: SessionKeys,
    ttl_secs: usize,
}

impl AuthService {
    pub fn new(users: UserService, keys: SessionKeys, ttl_secs: usize) -> Self {
        Self {
            users,
            keys,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> usize {
        self.ttl_secs
    }

    /// Unknown email, wrong password and inactive account all fail with the
    /// same `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError> {
        let email = email.trim();
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!("login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.users.verify_password(&user, password) {
            tracing::info!(user_id = user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            tracing::info!(user_id = user.id, "login rejected: inactive account");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_session(user.id)?;
        let now = chrono::Utc::now().fixed_offset();
        let user = self.users.record_login(user.id, &now).await?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok(LoginSession { user, token })
    }

    pub fn issue_session(&self, user_id: i32) -> Result<String, AuthError> {
        let claims = SessionClaims::for_user(user_id, self.ttl_secs);
        encode_session(&self.keys, &claims)
    }

    /// Resolves a session token to its active user.
    pub async fn authenticate(&self, token: &str) -> Result<user::Model, AuthError> {
        let claims = decode_session(&self.keys, token)?;
        let user_id = claims.user_id()?;
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AuthError::Unauthenticated),
        }
    }
}
