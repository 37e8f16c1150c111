use serde::{Deserialize, Serialize};

use super::FlexNumber;

/// A community member. `cookies` is a plain integer in every observed
/// response, unlike the id fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: FlexNumber,
    pub slack_id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub project_ids: Vec<FlexNumber>,
    pub cookies: Option<i64>,
}
