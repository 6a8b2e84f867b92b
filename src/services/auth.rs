use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
    utils::{encode_token, hash_password, verify_password},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new account and issue a session token.
    /// Returns (user_model, token).
    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<(UserModel, String)> {
        if self.user_exists(username, email).await? {
            return Err(AppError::Validation(
                "User with this email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            username: sea_orm::ActiveValue::Set(username.to_string()),
            email: sea_orm::ActiveValue::Set(email.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            role: sea_orm::ActiveValue::Set("user".to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let user = new_user.insert(&self.db).await?;
        let token = encode_token(&user)?;

        Ok((user, token))
    }

    /// Verify credentials and issue a session token.
    /// Returns (user_model, token).
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(UserModel, String)> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::Unauthorized);
        }

        let token = encode_token(&user)?;
        Ok((user, token))
    }

    pub async fn get_user_by_id(&self, id: i32) -> AppResult<UserModel> {
        let user = User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(user)
    }

    async fn user_exists(&self, username: &str, email: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(
                sea_orm::Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
