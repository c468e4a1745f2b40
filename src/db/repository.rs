//! User repository - all access to the `users` table
//!
//! Plain data access over an injected connection handle; no business logic.
//! Uniqueness of `email` is left to the store's constraint, so concurrent
//! inserts race there and not on any application lock.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::user;

/// Field set for inserting a user; `password_hash` must already be hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

/// Field set for updating a user; `password_hash: None` keeps the stored one
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, DbErr> {
        user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    pub async fn create(&self, new: NewUser) -> Result<user::Model, DbErr> {
        let now = Utc::now();

        user::ActiveModel {
            name: Set(new.name),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            role: Set(new.role),
            is_active: Set(new.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Update a user. A missing id is a no-op returning `None`.
    pub async fn update(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<user::Model>, DbErr> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.email = Set(changes.email);
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.role = Set(changes.role);
        active.is_active = Set(changes.is_active);
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&self.db).await?))
    }

    /// Delete by id. Not existence-checked: deleting a missing id simply
    /// affects zero rows.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
