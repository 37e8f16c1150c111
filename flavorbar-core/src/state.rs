use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use flavortown::domain::{Devlog, Project, StoreItem, User};

/// A fetchable slice of the UI. Fetch failures are recorded against the
/// section they affect and never fail the surrounding refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Projects,
    Store,
    Users,
    Devlogs,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Projects => write!(f, "projects"),
            Section::Store => write!(f, "store"),
            Section::Users => write!(f, "users"),
            Section::Devlogs => write!(f, "devlogs"),
        }
    }
}

/// In-memory cache of everything fetched from the backend. Collections are
/// replaced wholesale on each successful fetch; devlogs are cached per
/// project id and survive unrelated refreshes.
#[derive(Debug, Clone, Default)]
pub struct CachedState {
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub store_items: Vec<StoreItem>,
    pub devlogs: HashMap<i64, Vec<Devlog>>,
    pub errors: HashMap<Section, String>,
    pub is_fetching: bool,
    pub last_updated: Option<Instant>,
}

impl CachedState {
    pub fn record_error(&mut self, section: Section, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{section} fetch failed: {message}");
        self.errors.insert(section, message);
    }

    pub fn error(&self, section: Section) -> Option<&str> {
        self.errors.get(&section).map(String::as_str)
    }

    /// Insert or replace a project by id.
    pub fn merge_project(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flavortown::domain::FlexNumber;

    fn project(id: i64, title: &str) -> Project {
        Project {
            id: FlexNumber::from(id),
            title: Some(title.to_string()),
            description: None,
            repo_link: None,
            demo_link: None,
            readme_link: None,
            devlog_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn merge_project_replaces_by_id() {
        let mut state = CachedState::default();
        state.merge_project(project(1, "Old"));
        state.merge_project(project(2, "Other"));
        state.merge_project(project(1, "New"));

        assert_eq!(state.projects.len(), 2);
        assert_eq!(state.projects[0].title.as_deref(), Some("New"));
    }

    #[test]
    fn record_error_is_per_section() {
        let mut state = CachedState::default();
        state.record_error(Section::Store, "HTTP 401: invalid token");
        assert_eq!(state.error(Section::Store), Some("HTTP 401: invalid token"));
        assert_eq!(state.error(Section::Projects), None);
    }
}
