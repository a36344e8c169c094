//! Document store
//!
//! One collection per entity (animals, users, applications, feedback). Each
//! write touches exactly one record. Two backends implement [`Store`]:
//! PostgreSQL for deployments and an in-memory map for local runs and tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::models::{
    Animal, AnimalType, AnimalUpdate, Application, Feedback, NewAnimal, NewApplication,
    NewFeedback, NewUser, ProfileUpdate, User, UserApplication,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Filter for animal listings
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimalFilter {
    pub kind: Option<AnimalType>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert an animal with a fresh id, `adopted = false` and `created_at = now`
    async fn create_animal(&self, animal: NewAnimal) -> Result<Animal, AppError>;

    async fn find_animal(&self, id: Uuid) -> Result<Option<Animal>, AppError>;

    /// Animals matching `filter`, newest first
    async fn list_animals(&self, filter: AnimalFilter) -> Result<Vec<Animal>, AppError>;

    async fn update_animal(&self, id: Uuid, update: AnimalUpdate)
        -> Result<Option<Animal>, AppError>;

    /// Flip `adopted` in one atomic step and return the updated record
    async fn toggle_adopted(&self, id: Uuid) -> Result<Option<Animal>, AppError>;

    /// Fails with `Conflict` when the (lowercased) email is already taken
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
        -> Result<Option<User>, AppError>;

    async fn create_application(&self, application: NewApplication)
        -> Result<Application, AppError>;

    /// Applications made by `user_id`, newest first, joined with their animal
    async fn applications_for_user(&self, user_id: Uuid)
        -> Result<Vec<UserApplication>, AppError>;

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback, AppError>;
}

pub type SharedStore = Arc<dyn Store>;
