pub mod system;
pub mod users;

pub use system::*;
pub use users::*;

use crate::core::services::UserService;
use crate::db::manager::DatabaseManager;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub user_service: Arc<UserService>,
}
