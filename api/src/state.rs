use std::sync::Arc;

use crate::user_service::UserService;

/// Application state shared across handlers
#[derive(Clone, Default)]
pub struct AppState {
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            users: Arc::new(UserService::new()),
        }
    }
}
