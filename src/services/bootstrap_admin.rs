use crate::{
    error::AppResult,
    models::{user, User},
    utils::hash_password,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use std::env;

/// Ensure at least one admin account exists at startup.
///
/// Reads BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_USERNAME and
/// BOOTSTRAP_ADMIN_PASSWORD. Does nothing if they are unset or an admin is
/// already present. If a user with the given email exists it is promoted,
/// otherwise the account is created.
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection) -> AppResult<()> {
    let (email, username, password) = match (
        env::var("BOOTSTRAP_ADMIN_EMAIL"),
        env::var("BOOTSTRAP_ADMIN_USERNAME"),
        env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(username), Ok(password)) => (email, username, password),
        _ => {
            tracing::debug!("Bootstrap admin not configured, skipping");
            return Ok(());
        }
    };

    let admin_count = User::find()
        .filter(user::Column::Role.eq("admin"))
        .count(db)
        .await?;
    if admin_count > 0 {
        tracing::debug!("Admin account already present, skipping bootstrap");
        return Ok(());
    }

    let now = chrono::Utc::now().naive_utc();

    if let Some(existing) = User::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?
    {
        let username = existing.username.clone();
        let mut active: user::ActiveModel = existing.into();
        active.role = sea_orm::ActiveValue::Set("admin".to_string());
        active.updated_at = sea_orm::ActiveValue::Set(now);
        active.update(db).await?;
        tracing::info!("Promoted existing user '{}' to admin", username);
        return Ok(());
    }

    let password_hash = hash_password(&password)?;
    let admin = user::ActiveModel {
        username: sea_orm::ActiveValue::Set(username.clone()),
        email: sea_orm::ActiveValue::Set(email),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        role: sea_orm::ActiveValue::Set("admin".to_string()),
        created_at: sea_orm::ActiveValue::Set(now),
        updated_at: sea_orm::ActiveValue::Set(now),
        ..Default::default()
    };
    admin.insert(db).await?;
    tracing::info!("Created bootstrap admin account '{}'", username);

    Ok(())
}
