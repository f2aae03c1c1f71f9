use tracing::{info, warn};
use validator::Validate;

use crate::{
    database::Database,
    error::{Error, Result},
    models::{SignUp, User},
};

#[derive(Clone)]
pub struct Accounts {
    db: Database,
}

impl Accounts {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn sign_up(&self, request: SignUp) -> Result<User> {
        request.validate()?;

        let inserted = sqlx::query("INSERT INTO users (username, password, phone) VALUES (?, ?, ?)")
            .bind(&request.username)
            .bind(&request.password)
            .bind(&request.phone)
            .execute(&self.db.pool)
            .await;

        match inserted {
            Ok(result) => {
                info!("User {} registered", request.username);
                Ok(User {
                    id: result.last_insert_rowid(),
                    username: request.username,
                    password: request.password,
                    phone: request.phone,
                })
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(Error::UsernameTaken(request.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, phone FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        let ok = self
            .find_by_username(username)
            .await?
            .is_some_and(|user| user.verify_password(password));
        if !ok {
            warn!("Failed login for {}", username);
        }
        Ok(ok)
    }
}
