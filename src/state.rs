use crate::config::AppConfig;
use crate::models::ServiceError;
use crate::utils::record_store::Store;

/// Shared application state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: AppConfig,
}

impl AppState {
    pub fn init(config: AppConfig) -> Result<Self, ServiceError> {
        let store = Store::open(config.data_dir.clone())?;
        Ok(Self { store, config })
    }
}
