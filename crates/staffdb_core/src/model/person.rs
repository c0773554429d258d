//! Person record.
//!
//! # Invariants
//! - `person_name` is the primary key and is immutable once stored.
//! - `nickname` is the only optional field.

use super::schema::{LIVES_IN_TOWN, NICKNAME, PERSON_NAME};
use super::{validate_char, ValidationError};
use serde::{Deserialize, Serialize};

/// Someone whose career history is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_name: String,
    pub lives_in_town: String,
    pub nickname: Option<String>,
}

impl Person {
    pub fn new(
        person_name: impl Into<String>,
        lives_in_town: impl Into<String>,
        nickname: Option<&str>,
    ) -> Self {
        Self {
            person_name: person_name.into(),
            lives_in_town: lives_in_town.into(),
            nickname: nickname.map(str::to_string),
        }
    }

    /// Checks every field against the `person` schema descriptor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_char(&PERSON_NAME, &self.person_name)?;
        validate_char(&LIVES_IN_TOWN, &self.lives_in_town)?;
        if let Some(nickname) = self.nickname.as_deref() {
            validate_char(&NICKNAME, nickname)?;
        }
        Ok(())
    }
}
