use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::domain::UserRole;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("This value should not be blank.".into());
        return Err(err);
    }
    Ok(())
}

fn comma_separated_uuids(value: &str) -> Result<(), ValidationError> {
    for id in value.split(',') {
        let id = id.trim();
        if id.is_empty() || Uuid::parse_str(id).is_err() {
            let mut err = ValidationError::new("uuid");
            err.message = Some(format!("'{}' is not a valid UUID.", id).into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 180, message = "Username must be between 3 and 180 characters."),
        custom(function = "not_blank")
    )]
    pub username: String,

    pub roles: Option<Vec<UserRole>>,

    #[validate(length(min = 1, max = 255))]
    pub provider: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub provider_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "Title must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 1000, message = "Text must be between 1 and 1000 characters."),
        custom(function = "not_blank")
    )]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UsersQuery {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,

    /// Comma separated user ids
    #[validate(custom(function = "comma_separated_uuids"))]
    pub ids: Option<String>,
}

impl UsersQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }

    pub fn ids(&self) -> Option<Vec<String>> {
        self.ids.as_ref().map(|ids| {
            ids.split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect()
        })
    }
}
