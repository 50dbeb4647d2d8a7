use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::AccountStore;
use crate::registration::RegistrationService;

/// Shared handler state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registration: Arc<RegistrationService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn AccountStore>) -> Self {
        let registration = RegistrationService::new(store, &config);
        Self {
            config: Arc::new(config),
            registration: Arc::new(registration),
        }
    }
}
