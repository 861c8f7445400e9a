use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_active: Set(true),
            last_login: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(
        &self,
        id: i32,
        at: &chrono::DateTime<chrono::FixedOffset>,
    ) -> DaoResult<user::Model> {
        let mut active = self.find_by_id(id).await?.into_active_model();
        active.last_login = Set(Some(*at));
        active.update(&self.db).await.map_err(DaoLayerError::Db)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use crate::db::entities::user;

    use super::UserDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: i32, username: &str, email: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            last_login: None,
        }
    }

    #[tokio::test]
    async fn find_by_email_returns_first_match() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(7, "alice", "alice@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("alice@example.com")
            .await
            .expect("query should succeed");
        assert_eq!(result.map(|u| u.id), Some(7));
    }

    #[tokio::test]
    async fn find_by_username_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_username("ghost")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn create_user_returns_inserted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(1, "alice", "alice@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let created = dao
            .create_user("alice", "alice@example.com", "hash")
            .await
            .expect("insert should succeed");
        assert_eq!(created.id, 1);
        assert!(created.is_active);
        assert!(created.last_login.is_none());
    }

    #[tokio::test]
    async fn create_user_surfaces_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("boom".to_string())])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .create_user("alice", "alice@example.com", "hash")
            .await
            .expect_err("insert should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }

    #[tokio::test]
    async fn set_last_login_updates_timestamp() {
        let mut updated = user_model(3, "bob", "bob@example.com");
        updated.last_login = Some(ts());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(3, "bob", "bob@example.com")]])
            .append_query_results([[updated]])
            .into_connection();
        let dao = UserDao::new(&db);

        let user = dao
            .set_last_login(3, &ts())
            .await
            .expect("update should succeed");
        assert_eq!(user.last_login, Some(ts()));
    }

    #[tokio::test]
    async fn set_last_login_propagates_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .set_last_login(42, &ts())
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 42, .. }));
    }
}
