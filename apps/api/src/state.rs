use crate::coach::Coach;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Facade over the model backend. Tests swap in a scripted backend.
    pub coach: Coach,
    pub sessions: SessionStore,
    pub config: Config,
}
