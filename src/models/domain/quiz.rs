use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by_user_id: String, // Only the creator may mutate the quiz
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(title: &str, description: Option<String>, created_by_user_id: &str) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description,
            created_by_user_id: created_by_user_id.to_string(),
            participant_ids: Vec::new(),
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.created_by_user_id == user_id
    }
}
