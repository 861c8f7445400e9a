use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{activity, prelude::Activity};

#[derive(Clone)]
pub struct ActivityDao {
    db: DatabaseConnection,
}

/// Result of an ownership-checked delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedDelete {
    Deleted,
    NotOwner,
    Missing,
}

impl DaoBase for ActivityDao {
    type Entity = Activity;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ActivityDao {
    pub async fn create_for_user(
        &self,
        user_id: i32,
        description: &str,
        activity_type: &str,
        participants: i32,
    ) -> DaoResult<activity::Model> {
        let model = activity::ActiveModel {
            description: Set(description.to_string()),
            activity_type: Set(activity_type.to_string()),
            participants: Set(participants),
            user_id: Set(user_id),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Favorites of one user in insertion order.
    pub async fn list_for_user(&self, user_id: i32) -> DaoResult<Vec<activity::Model>> {
        Activity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .order_by_asc(activity::Column::Id)
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Deletes the row only when `user_id` owns it. The lookup and the delete
    /// share one transaction so a concurrent remove cannot slip in between.
    pub async fn delete_owned(&self, id: i32, user_id: i32) -> DaoResult<OwnedDelete> {
        let txn = self.db.begin().await?;

        let mut query = Activity::find_by_id(id);
        if txn.get_database_backend() == DbBackend::Postgres {
            query = query.lock_exclusive();
        }
        let Some(existing) = query.one(&txn).await? else {
            txn.rollback().await?;
            return Ok(OwnedDelete::Missing);
        };
        if existing.user_id != user_id {
            txn.rollback().await?;
            return Ok(OwnedDelete::NotOwner);
        }

        let result = Activity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected == 0 {
            return Ok(OwnedDelete::Missing);
        }
        Ok(OwnedDelete::Deleted)
    }
}
