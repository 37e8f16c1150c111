use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use flavortown::domain::{Project, StoreItem, User};
use flavortown::{FlavortownClient, FlavortownURL};

use crate::debounce::Debouncer;
use crate::derived;
use crate::settings::Settings;
use crate::state::{CachedState, Section};

/// Quiet period after a credential or selection change before a refresh
/// cycle fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(800);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(180);

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub base_url: FlavortownURL,
    pub poll_interval: Duration,
    /// Whether settings changes are written to disk. Disabled in tests.
    pub persist_settings: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            base_url: FlavortownURL::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            persist_settings: true,
        }
    }
}

/// Owns the in-memory cache and coordinates all fetching: periodic polling,
/// debounced restarts on credential changes, and manual refreshes. One
/// instance is constructed at app start and shared with the presentation
/// layer by cloning.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    client: RwLock<FlavortownClient>,
    state: RwLock<CachedState>,
    settings: RwLock<Settings>,
    debouncer: Debouncer,
    poller: std::sync::Mutex<Option<JoinHandle<()>>>,
    poll_interval: Duration,
    persist_settings: bool,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Orchestrator {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        Self::with_config(settings, OrchestratorConfig::default())
    }

    pub fn with_config(settings: Settings, config: OrchestratorConfig) -> anyhow::Result<Self> {
        let client = FlavortownClient::with_base(settings.api_key.clone(), config.base_url)?;
        Ok(Self {
            inner: Arc::new(Inner {
                client: RwLock::new(client),
                state: RwLock::new(CachedState::default()),
                settings: RwLock::new(settings),
                debouncer: Debouncer::new(DEBOUNCE_DELAY),
                poller: std::sync::Mutex::new(None),
                poll_interval: config.poll_interval,
                persist_settings: config.persist_settings,
            }),
        })
    }

    // ── Refresh cycle ───────────────────────────────────────────────

    /// Run one full refresh cycle and wait for it to complete.
    pub async fn refresh(&self) {
        Self::run_cycle(self.inner.clone()).await;
    }

    async fn run_cycle(inner: Arc<Inner>) {
        {
            let mut state = inner.state.write().await;
            state.is_fetching = true;
            state.errors.clear();
        }
        tracing::debug!("refresh cycle started");

        // Store fetch and the user/project branch are independent.
        tokio::join!(Self::fetch_store(&inner), Self::fetch_directory(&inner));

        // The devlog fetch depends on the branch having validated the
        // selection, so it runs strictly after.
        let selected = inner.settings.read().await.selected_project_id;
        if let Some(project_id) = selected {
            Self::fetch_devlogs(&inner, project_id).await;
        }

        let mut state = inner.state.write().await;
        state.is_fetching = false;
        state.last_updated = Some(Instant::now());
        tracing::debug!("refresh cycle finished");
    }

    async fn fetch_store(inner: &Arc<Inner>) {
        let client = inner.client.read().await.clone();
        match client.fetch_store_items().await {
            Ok(items) => inner.state.write().await.store_items = items,
            Err(e) => inner
                .state
                .write()
                .await
                .record_error(Section::Store, e.to_string()),
        }
    }

    /// Targeted mode when the configured user id parses as an integer,
    /// browse mode otherwise.
    async fn fetch_directory(inner: &Arc<Inner>) {
        let user_id = inner.settings.read().await.user_id.trim().parse::<i64>();
        match user_id {
            Ok(id) => Self::fetch_targeted(inner, id).await,
            Err(_) => Self::fetch_browse(inner).await,
        }
    }

    async fn fetch_targeted(inner: &Arc<Inner>, user_id: i64) {
        let client = inner.client.read().await.clone();
        let user = match client.fetch_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                inner
                    .state
                    .write()
                    .await
                    .record_error(Section::Users, e.to_string());
                return;
            }
        };

        let owned_ids: Vec<i64> = user.project_ids.iter().map(|id| id.value()).collect();
        inner.state.write().await.users = vec![user];

        // Unordered fan-out over the user's projects; one failure does not
        // cancel the siblings.
        let fetches = owned_ids.iter().map(|&project_id| {
            let client = client.clone();
            async move { client.fetch_project(project_id).await }
        });
        let results = join_all(fetches).await;

        let mut fetched = Vec::new();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(project) => fetched.push(project),
                Err(e) => first_error = Some(e),
            }
        }

        let mut state = inner.state.write().await;
        // Project cache is scoped to the targeted user from here on.
        state
            .projects
            .retain(|project| owned_ids.contains(&project.id.value()));
        for project in fetched {
            state.merge_project(project);
        }
        if let Some(e) = first_error {
            state.record_error(Section::Projects, e.to_string());
        }
    }

    async fn fetch_browse(inner: &Arc<Inner>) {
        let client = inner.client.read().await.clone();
        let (projects, users) = tokio::join!(client.fetch_projects(), client.fetch_users());

        let mut state = inner.state.write().await;
        match projects {
            Ok(list) => state.projects = list,
            Err(e) => state.record_error(Section::Projects, e.to_string()),
        }
        match users {
            Ok(list) => state.users = list,
            Err(e) => state.record_error(Section::Users, e.to_string()),
        }
    }

    async fn fetch_devlogs(inner: &Arc<Inner>, project_id: i64) {
        let client = inner.client.read().await.clone();
        match client.fetch_devlogs(project_id).await {
            Ok(devlogs) => {
                inner.state.write().await.devlogs.insert(project_id, devlogs);
            }
            Err(e) => inner
                .state
                .write()
                .await
                .record_error(Section::Devlogs, e.to_string()),
        }
    }

    // ── Polling ─────────────────────────────────────────────────────

    /// Start periodic refreshes. The first cycle runs immediately. Cycles
    /// are spawned independently, so stopping the poller never aborts one
    /// already in flight.
    pub fn start_polling(&self) {
        let inner = Arc::downgrade(&self.inner);
        let interval = self.inner.poll_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let Some(inner) = inner.upgrade() else { break };
                tokio::spawn(Self::run_cycle(inner));
            }
        });

        if let Some(previous) = self.inner.poller.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self.inner.poller.lock().unwrap().take() {
            handle.abort();
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    pub async fn set_api_key(&self, api_key: impl Into<String>) {
        let api_key = api_key.into();
        {
            let mut settings = self.inner.settings.write().await;
            settings.api_key = api_key.clone();
            self.persist(&settings);
        }
        self.inner.client.write().await.set_api_key(api_key);
        self.schedule_debounced_refresh();
    }

    pub async fn set_user_id(&self, user_id: impl Into<String>) {
        {
            let mut settings = self.inner.settings.write().await;
            settings.user_id = user_id.into();
            self.persist(&settings);
        }
        self.schedule_debounced_refresh();
    }

    pub async fn set_selected_project(&self, project_id: Option<i64>) {
        {
            let mut settings = self.inner.settings.write().await;
            settings.selected_project_id = project_id;
            self.persist(&settings);
        }
        self.schedule_debounced_refresh();
    }

    pub async fn set_cookies_per_hour(&self, rate: i64) {
        let mut settings = self.inner.settings.write().await;
        settings.cookies_per_hour = rate;
        self.persist(&settings);
    }

    /// Add the item to the target set, or remove it if already present.
    pub async fn toggle_target_item(&self, item_id: i64) {
        let mut settings = self.inner.settings.write().await;
        match settings.target_item_ids.iter().position(|&id| id == item_id) {
            Some(index) => {
                settings.target_item_ids.remove(index);
            }
            None => settings.target_item_ids.push(item_id),
        }
        self.persist(&settings);
    }

    fn persist(&self, settings: &Settings) {
        if !self.inner.persist_settings {
            return;
        }
        if let Err(e) = settings.save() {
            tracing::error!("failed to persist settings: {e:#}");
        }
    }

    fn schedule_debounced_refresh(&self) {
        let inner = self.inner.clone();
        self.inner
            .debouncer
            .schedule(async move { Self::run_cycle(inner).await });
    }

    // ── Reads & derived state ───────────────────────────────────────

    pub async fn snapshot(&self) -> CachedState {
        self.inner.state.read().await.clone()
    }

    pub async fn settings(&self) -> Settings {
        self.inner.settings.read().await.clone()
    }

    pub async fn sorted_projects(&self) -> Vec<Project> {
        derived::sorted_projects(&self.inner.state.read().await.projects)
    }

    pub async fn sorted_store_items(&self) -> Vec<StoreItem> {
        derived::sorted_store_items(&self.inner.state.read().await.store_items)
    }

    pub async fn sorted_users(&self) -> Vec<User> {
        derived::sorted_users(&self.inner.state.read().await.users)
    }

    pub async fn current_user(&self) -> Option<User> {
        let user_id = self.inner.settings.read().await.user_id.clone();
        derived::current_user(&self.inner.state.read().await.users, &user_id).cloned()
    }

    pub async fn owned_projects(&self) -> Vec<Project> {
        let Some(user) = self.current_user().await else {
            return Vec::new();
        };
        derived::owned_projects(&self.inner.state.read().await.projects, &user)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn total_target_cost(&self) -> i64 {
        let targets = self.inner.settings.read().await.target_item_ids.clone();
        derived::total_target_cost(&self.inner.state.read().await.store_items, &targets)
    }

    pub async fn remaining_cookies(&self) -> i64 {
        let total = self.total_target_cost().await;
        let cookies = self.current_user().await.and_then(|user| user.cookies);
        derived::remaining_cookies(total, cookies)
    }

    pub async fn hours_to_target(&self) -> Option<f64> {
        let remaining = self.remaining_cookies().await;
        let rate = self.inner.settings.read().await.cookies_per_hour;
        derived::hours_to_target(remaining, rate)
    }

    /// Logged-time display for the selected project, from cached devlogs.
    pub async fn selected_project_logged_time(&self) -> Option<String> {
        let selected = self.inner.settings.read().await.selected_project_id?;
        let state = self.inner.state.read().await;
        derived::logged_time_display(state.devlogs.get(&selected)?)
    }
}
