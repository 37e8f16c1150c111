use serde::{Deserialize, Serialize};

use super::FlexNumber;

/// A project, as returned by `/projects` and `/projects/{id}`. The backend
/// omits fields freely, so everything but the id is optional. Timestamps are
/// kept as opaque strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: FlexNumber,
    pub title: Option<String>,
    pub description: Option<String>,
    pub repo_link: Option<String>,
    pub demo_link: Option<String>,
    pub readme_link: Option<String>,
    #[serde(default)]
    pub devlog_ids: Vec<FlexNumber>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
