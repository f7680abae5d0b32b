use serde::Deserialize;
use std::fmt;

/// Primary key of a row in the `"user"` table, read as text.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_owned())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        UserRecord {
            id: id.into(),
            username: username.into(),
        }
    }
}
