//! User Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use shared::models::User;
use shared::util::now_millis;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(base: BaseRepository) -> Self {
        Self { base }
    }

    /// One page of users plus the total number of users
    pub async fn find_page(&self, limit: u64, start: u64) -> RepoResult<(u64, Vec<User>)> {
        self.base
            .run(async {
                let mut response = self
                    .base
                    .db()
                    .query("SELECT * FROM user ORDER BY created_at ASC LIMIT $limit START $start")
                    .query("SELECT count() FROM user GROUP ALL")
                    .bind(("limit", limit))
                    .bind(("start", start))
                    .await?;
                let users: Vec<User> = response.take(0)?;
                let total: Option<CountRow> = response.take(1)?;
                let total = total.map(|r| r.count.max(0) as u64).unwrap_or(0);
                Ok((total, users))
            })
            .await
    }

    pub async fn find_by_id(&self, user_id: &str) -> RepoResult<Option<User>> {
        let user_id = user_id.to_string();
        self.base
            .run(async {
                let user: Option<User> = self
                    .base
                    .db()
                    .query("SELECT * FROM user WHERE user_id = $user_id LIMIT 1")
                    .bind(("user_id", user_id))
                    .await?
                    .take(0)?;
                Ok(user)
            })
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_string();
        self.base
            .run(async {
                let user: Option<User> = self
                    .base
                    .db()
                    .query("SELECT * FROM user WHERE email = $email LIMIT 1")
                    .bind(("email", email))
                    .await?
                    .take(0)?;
                Ok(user)
            })
            .await
    }

    /// Whether any user already holds this email or phone
    pub async fn exists_email_or_phone(&self, email: &str, phone: &str) -> RepoResult<bool> {
        let email = email.to_string();
        let phone = phone.to_string();
        self.base
            .run(async {
                let row: Option<CountRow> = self
                    .base
                    .db()
                    .query("SELECT count() FROM user WHERE email = $email OR phone = $phone GROUP ALL")
                    .bind(("email", email))
                    .bind(("phone", phone))
                    .await?
                    .take(0)?;
                Ok(row.map(|r| r.count > 0).unwrap_or(false))
            })
            .await
    }

    /// Persist a fully built user (password already hashed)
    pub async fn create(&self, user: User) -> RepoResult<User> {
        self.base
            .run(async {
                let created: Option<User> = self
                    .base
                    .db()
                    .create(TABLE)
                    .content(user)
                    .await
                    .map_err(|e| {
                        let msg = e.to_string();
                        if msg.contains("already contains") {
                            RepoError::Duplicate("email or phone number already exists".into())
                        } else {
                            RepoError::Database(msg)
                        }
                    })?;
                created.ok_or_else(|| RepoError::Database("Failed to create user".into()))
            })
            .await
    }

    /// Store the freshly issued token pair on the user record
    pub async fn update_tokens(
        &self,
        user_id: &str,
        token: String,
        refresh_token: String,
    ) -> RepoResult<User> {
        let user_id = user_id.to_string();
        self.base
            .run(async {
                let updated: Option<User> = self
                    .base
                    .db()
                    .query(
                        "UPDATE user SET token = $token, refresh_token = $refresh_token, \
                         updated_at = $now WHERE user_id = $user_id RETURN AFTER",
                    )
                    .bind(("token", token))
                    .bind(("refresh_token", refresh_token))
                    .bind(("now", now_millis()))
                    .bind(("user_id", user_id.clone()))
                    .await?
                    .take(0)?;
                updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", user_id)))
            })
            .await
    }
}
