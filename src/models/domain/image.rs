use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata of the file bound to an [`Image`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageFile {
    pub file_name: String, // Name inside the upload directory
    pub original_name: Option<String>,
    pub mime_type: String,
    pub size: i64,
    pub checksum: String, // sha-256, lowercase hex
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    pub id: String,
    pub created_by_user_id: String,
    #[serde(default)]
    pub file: Option<ImageFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Image {
    /// An image without a file, waiting for an upload.
    pub fn new_placeholder(created_by_user_id: &str) -> Self {
        let now = Utc::now();
        Image {
            id: Uuid::new_v4().to_string(),
            created_by_user_id: created_by_user_id.to_string(),
            file: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.file.is_some()
    }

    /// Binds `file` and returns the previously bound file, if any.
    pub fn bind(&mut self, file: ImageFile) -> Option<ImageFile> {
        self.updated_at = Some(Utc::now());
        self.file.replace(file)
    }
}
