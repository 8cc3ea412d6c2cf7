//! User service stub. Nothing is persisted; created users are only logged.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{CreateUserRequest, User};

#[derive(Debug, Default)]
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    /// Expects a request that already passed the create-user schema.
    pub fn create_user(&self, request: CreateUserRequest) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            created_at: Utc::now(),
        };

        tracing::info!(user_id = %user.id, email = %user.email, "user created");
        user
    }
}
