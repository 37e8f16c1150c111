pub mod debounce;
pub mod derived;
pub mod orchestrator;
pub mod settings;
pub mod state;

pub use debounce::Debouncer;
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use settings::Settings;
pub use state::{CachedState, Section};
