//! Validation implementations for API request types

use crate::models::CreateUserRequest;

use super::sanitizers::trim_in_place;
use super::schema::{FieldError, ModelSchema, Validatable, ValidationBuilder};
use super::validators::validate_email;

impl Validatable for CreateUserRequest {
    fn sanitize(&mut self) {
        trim_in_place(&mut self.name);
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        ValidationBuilder::new()
            .check("email", || validate_email(&self.email))
            .build()
    }
}

/// Body schema for `POST /api/v1/users`
pub fn create_user_schema() -> ModelSchema<CreateUserRequest> {
    ModelSchema::new()
}
