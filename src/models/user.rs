use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
}

impl User {
    // Plain comparison, credentials are stored as entered
    pub fn verify_password(&self, password: &str) -> bool {
        self.password == password
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUp {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
}
