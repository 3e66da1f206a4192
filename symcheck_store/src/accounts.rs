use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use symcheck_core::{LoginSession, SessionRepo, User, UserRepo};
use symcheck_entities::{sessions, users};
use tracing::debug;
use uuid::Uuid;

use crate::convert;

pub struct DatabaseUserRepository {
    db: DatabaseConnection,
}

impl DatabaseUserRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for DatabaseUserRepository {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            salt: Set(user.salt.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<User>> {
        Ok(users::Entity::find_by_id(*id)
            .one(&self.db)
            .await?
            .map(convert::user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(convert::user_from_model))
    }
}

pub struct DatabaseSessionRepository {
    db: DatabaseConnection,
}

impl DatabaseSessionRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepo for DatabaseSessionRepository {
    async fn insert(&self, session: &LoginSession) -> anyhow::Result<()> {
        sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            created_at: Set(session.created_at),
            expires_at: Set(session.expires_at),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn find(&self, id: &Uuid) -> anyhow::Result<Option<LoginSession>> {
        Ok(sessions::Entity::find_by_id(*id)
            .one(&self.db)
            .await?
            .as_ref()
            .map(convert::session_from_model))
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<()> {
        sessions::Entity::delete_by_id(*id).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;
        if result.rows_affected > 0 {
            debug!("Purged {} expired sessions", result.rows_affected);
        }
        Ok(result.rows_affected)
    }
}
