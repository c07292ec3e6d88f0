//! User accounts and the identity carried by an authenticated request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user as stored.
#[derive(Debug, Clone)]
pub struct User {
  pub id:            i64,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn identity(&self) -> Identity {
    Identity {
      user_id:  self.id,
      username: self.username.clone(),
    }
  }
}

/// The caller of an authenticated request, as decoded from its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub user_id:  i64,
  pub username: String,
}
