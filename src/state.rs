//! Application state management
//!
//! Contains shared state accessible across all handlers. Built once at
//! startup from [`Settings`]; handlers never consult the environment.

use crate::auth::{AdminSecret, PasswordHasher};
use crate::config::Settings;
use crate::store::SharedStore;
use crate::upload::UploadStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Document store backend (PostgreSQL or in-memory)
    pub store: SharedStore,

    /// Destination for uploaded animal photos
    pub uploads: UploadStore,

    /// Shared secret guarding the admin endpoints
    pub admin_secret: AdminSecret,

    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: SharedStore, settings: &Settings) -> Self {
        Self {
            store,
            uploads: UploadStore::new(settings.assets.upload_dir.clone()),
            admin_secret: AdminSecret::new(settings.admin.secret.clone()),
            passwords: PasswordHasher::new(settings.auth.bcrypt_cost),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
