use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::CreationStore;
use crate::identity::IdentityProvider;
use crate::services::CreationService;

/// Shared application state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn CreationStore>,
    pub creations: Arc<CreationService>,
}
