//! In-memory store
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. Data is
//! lost on restart.

use super::{AnimalFilter, Store};
use crate::error::AppError;
use crate::models::{
    Animal, AnimalSummary, AnimalUpdate, Application, Feedback, NewAnimal, NewApplication,
    NewFeedback, NewUser, ProfileUpdate, User, UserApplication,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    /// Insertion order doubles as the tie-breaker for equal timestamps
    animals: RwLock<Vec<Animal>>,
    users: RwLock<Users>,
    applications: RwLock<Vec<Application>>,
    feedback: RwLock<Vec<Feedback>>,
}

#[derive(Default)]
struct Users {
    by_id: HashMap<Uuid, User>,
    email_index: HashMap<String, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn applications(&self) -> Vec<Application> {
        self.applications.read().await.clone()
    }

    #[cfg(test)]
    pub async fn feedback(&self) -> Vec<Feedback> {
        self.feedback.read().await.clone()
    }
}

/// Newest first; among equal timestamps the later insert comes first
fn newest_first<T, F>(items: impl DoubleEndedIterator<Item = T>, created: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    let mut list: Vec<T> = items.rev().collect();
    list.sort_by_key(|item| std::cmp::Reverse(created(item)));
    list
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_animal(&self, animal: NewAnimal) -> Result<Animal, AppError> {
        let created = Animal {
            id: Uuid::new_v4(),
            name: animal.name,
            kind: animal.kind,
            breed: animal.breed,
            age: animal.age,
            size: animal.size,
            description: animal.description,
            photo: animal.photo,
            adopted: false,
            created_at: Utc::now(),
        };
        self.animals.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_animal(&self, id: Uuid) -> Result<Option<Animal>, AppError> {
        let animals = self.animals.read().await;
        Ok(animals.iter().find(|a| a.id == id).cloned())
    }

    async fn list_animals(&self, filter: AnimalFilter) -> Result<Vec<Animal>, AppError> {
        let animals = self.animals.read().await;
        let matching = animals
            .iter()
            .filter(|a| filter.kind.map_or(true, |kind| a.kind == kind))
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(matching.into_iter(), |a| a.created_at))
    }

    async fn update_animal(
        &self,
        id: Uuid,
        update: AnimalUpdate,
    ) -> Result<Option<Animal>, AppError> {
        let mut animals = self.animals.write().await;
        Ok(animals.iter_mut().find(|a| a.id == id).map(|animal| {
            update.apply(animal);
            animal.clone()
        }))
    }

    async fn toggle_adopted(&self, id: Uuid) -> Result<Option<Animal>, AppError> {
        // Read and write happen under the same lock
        let mut animals = self.animals.write().await;
        Ok(animals.iter_mut().find(|a| a.id == id).map(|animal| {
            animal.adopted = !animal.adopted;
            animal.clone()
        }))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let email = user.email.to_lowercase();

        if users.email_index.contains_key(&email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: email.clone(),
            password_hash: user.password_hash,
            mobile: user.mobile,
            address: user.address,
            created_at: now,
            updated_at: now,
        };
        users.email_index.insert(email, created.id);
        users.by_id.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .email_index
            .get(&email.to_lowercase())
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        Ok(users.by_id.get_mut(&id).map(|user| {
            update.apply(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, AppError> {
        let now = Utc::now();
        let created = Application {
            id: Uuid::new_v4(),
            animal_id: application.animal_id,
            user_id: application.user_id,
            name: application.name,
            email: application.email,
            message: application.message,
            created_at: now,
            updated_at: now,
        };
        self.applications.write().await.push(created.clone());
        Ok(created)
    }

    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserApplication>, AppError> {
        let applications = self.applications.read().await;
        let animals = self.animals.read().await;

        let mine = applications
            .iter()
            .filter(|a| a.user_id == Some(user_id))
            .cloned()
            .collect::<Vec<_>>();

        Ok(newest_first(mine.into_iter(), |a| a.created_at)
            .into_iter()
            .map(|application| {
                let animal = animals
                    .iter()
                    .find(|a| a.id == application.animal_id)
                    .map(AnimalSummary::from);
                UserApplication {
                    application,
                    animal,
                }
            })
            .collect())
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback, AppError> {
        let now = Utc::now();
        let created = Feedback {
            id: Uuid::new_v4(),
            name: feedback.name,
            email: feedback.email,
            message: feedback.message,
            created_at: now,
            updated_at: now,
        };
        self.feedback.write().await.push(created.clone());
        Ok(created)
    }
}
