use serde::{Deserialize, Serialize};

use super::FlexNumber;

/// A time-logged progress entry belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Devlog {
    pub id: FlexNumber,
    pub text: Option<String>,
    pub comments_count: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub likes_count: Option<i64>,
    pub media_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
