//! Pure computations over cached entities. Inputs are small, so everything
//! is recomputed on demand instead of memoized.

use flavortown::domain::{Devlog, Project, StoreItem, User};

/// Projects sorted ascending by title; a missing title sorts as "".
pub fn sorted_projects(projects: &[Project]) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by(|a, b| {
        a.title
            .as_deref()
            .unwrap_or("")
            .cmp(b.title.as_deref().unwrap_or(""))
    });
    sorted
}

/// Store items with a positive base cost, sorted ascending by cost. Items
/// with a zero or absent cost are excluded entirely.
pub fn sorted_store_items(items: &[StoreItem]) -> Vec<StoreItem> {
    let mut priced: Vec<StoreItem> = items
        .iter()
        .filter(|item| item.base_cost().unwrap_or(0) > 0)
        .cloned()
        .collect();
    priced.sort_by_key(|item| item.base_cost().unwrap_or(0));
    priced
}

/// Users sorted ascending by display name; a missing name sorts as "".
pub fn sorted_users(users: &[User]) -> Vec<User> {
    let mut sorted = users.to_vec();
    sorted.sort_by(|a, b| {
        a.display_name
            .as_deref()
            .unwrap_or("")
            .cmp(b.display_name.as_deref().unwrap_or(""))
    });
    sorted
}

/// The cached user whose id matches the configured user-id string, if the
/// string parses as an integer and a match exists.
pub fn current_user<'a>(users: &'a [User], user_id: &str) -> Option<&'a User> {
    let id: i64 = user_id.trim().parse().ok()?;
    users.iter().find(|user| user.id.value() == id)
}

/// Cached projects owned by the given user.
pub fn owned_projects<'a>(projects: &'a [Project], user: &User) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|project| user.project_ids.contains(&project.id))
        .collect()
}

/// Sum of base costs over store items in the target set.
pub fn total_target_cost(items: &[StoreItem], target_ids: &[i64]) -> i64 {
    items
        .iter()
        .filter(|item| target_ids.contains(&item.id.value()))
        .filter_map(StoreItem::base_cost)
        .sum()
}

/// Cookies still needed to afford the target set; never negative. A missing
/// cookie count is treated as zero.
pub fn remaining_cookies(total_target_cost: i64, cookies: Option<i64>) -> i64 {
    (total_target_cost - cookies.unwrap_or(0)).max(0)
}

/// Estimated hours until the target set is affordable, or `None` when the
/// rate is non-positive or nothing remains needed.
pub fn hours_to_target(remaining: i64, cookies_per_hour: i64) -> Option<f64> {
    if cookies_per_hour <= 0 || remaining <= 0 {
        return None;
    }
    Some(remaining as f64 / cookies_per_hour as f64)
}

/// Total logged time over the given devlogs as an "Xh Ym" display string,
/// dropping the hour part when it is zero. `None` when nothing is logged.
pub fn logged_time_display(devlogs: &[Devlog]) -> Option<String> {
    let total_seconds: i64 = devlogs.iter().filter_map(|d| d.duration_seconds).sum();
    if total_seconds <= 0 {
        return None;
    }
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        Some(format!("{hours}h {minutes}m"))
    } else {
        Some(format!("{minutes}m"))
    }
}
