//! PostgreSQL-backed store
//!
//! Each collection is a table keyed by UUID. Applications keep the animal id
//! as a plain column (no foreign key) so a referenced animal may change or
//! disappear without touching its applications.

use super::{AnimalFilter, Store};
use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::models::{
    Animal, AnimalSummary, AnimalType, AnimalUpdate, Application, Feedback, NewAnimal,
    NewApplication, NewFeedback, NewUser, ProfileUpdate, User, UserApplication,
};
use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};
use tracing::info;
use uuid::Uuid;

const ANIMAL_COLUMNS: &str =
    "id, name, kind, breed, age, size, description, photo, adopted, created_at";
const USER_COLUMNS: &str =
    "id, name, email, password_hash, mobile, address, created_at, updated_at";
const APPLICATION_COLUMNS: &str =
    "id, animal_id, user_id, name, email, message, created_at, updated_at";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS animals (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        kind VARCHAR(10) NOT NULL DEFAULT 'dog',
        breed TEXT,
        age TEXT,
        size TEXT,
        description TEXT,
        photo TEXT,
        adopted BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        mobile VARCHAR(20),
        address VARCHAR(500),
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS applications (
        id UUID PRIMARY KEY,
        animal_id UUID NOT NULL,
        user_id UUID,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        message TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS feedback (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email TEXT NOT NULL,
        message VARCHAR(1000) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_animals_kind_created ON animals(kind, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_applications_user_id ON applications(user_id)",
];

pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Build the pool, verify the connection and bootstrap the schema
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.dbname = Some(config.database.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.max_pool_size));

        let pool = if config.require_tls {
            let certs = rustls_native_certs::load_native_certs();
            let mut root_store = rustls::RootCertStore::empty();
            for cert in certs.certs {
                root_store.add(cert).ok();
            }

            let tls_config = rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();
            let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

            cfg.create_pool(Some(Runtime::Tokio1), tls)
        } else {
            cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        }
        .map_err(|e| AppError::Internal(format!("Failed to create pool: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;

        info!(
            "Database connection successful ({}:{}/{}, TLS: {})",
            config.host, config.port, config.database, config.require_tls
        );
        Ok(store)
    }

    /// Create tables if they don't exist
    async fn init_schema(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        for statement in SCHEMA {
            client.execute(*statement, &[]).await?;
        }
        Ok(())
    }
}

fn animal_from_row(row: &Row) -> Result<Animal, AppError> {
    let kind: String = row.get("kind");
    Ok(Animal {
        id: row.get("id"),
        name: row.get("name"),
        kind: kind.parse()?,
        breed: row.get("breed"),
        age: row.get("age"),
        size: row.get("size"),
        description: row.get("description"),
        photo: row.get("photo"),
        adopted: row.get("adopted"),
        created_at: row.get("created_at"),
    })
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        mobile: row.get("mobile"),
        address: row.get("address"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn application_from_row(row: &Row) -> Application {
    Application {
        id: row.get("id"),
        animal_id: row.get("animal_id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        email: row.get("email"),
        message: row.get("message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// `Some(None)` means "clear", which the SQL side needs as a separate flag
fn split_clearable(value: &Option<Option<String>>) -> (bool, Option<&str>) {
    match value {
        Some(inner) => (true, inner.as_deref()),
        None => (false, None),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_animal(&self, animal: NewAnimal) -> Result<Animal, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO animals (id, name, kind, breed, age, size, description, photo, adopted, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false, $9)
                     RETURNING {ANIMAL_COLUMNS}"
                ),
                &[
                    &Uuid::new_v4(),
                    &animal.name,
                    &animal.kind.as_str(),
                    &animal.breed,
                    &animal.age,
                    &animal.size,
                    &animal.description,
                    &animal.photo,
                    &Utc::now(),
                ],
            )
            .await?;
        animal_from_row(&row)
    }

    async fn find_animal(&self, id: Uuid) -> Result<Option<Animal>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {ANIMAL_COLUMNS} FROM animals WHERE id = $1"),
                &[&id],
            )
            .await?;
        row.as_ref().map(animal_from_row).transpose()
    }

    async fn list_animals(&self, filter: AnimalFilter) -> Result<Vec<Animal>, AppError> {
        let client = self.pool.get().await?;
        let kind = filter.kind.map(|k| k.as_str());
        let rows = client
            .query(
                &format!(
                    "SELECT {ANIMAL_COLUMNS} FROM animals
                     WHERE ($1::TEXT IS NULL OR kind = $1)
                     ORDER BY created_at DESC"
                ),
                &[&kind],
            )
            .await?;
        rows.iter().map(animal_from_row).collect()
    }

    async fn update_animal(
        &self,
        id: Uuid,
        update: AnimalUpdate,
    ) -> Result<Option<Animal>, AppError> {
        let client = self.pool.get().await?;
        let (set_breed, breed) = split_clearable(&update.breed);
        let (set_age, age) = split_clearable(&update.age);
        let (set_size, size) = split_clearable(&update.size);
        let (set_description, description) = split_clearable(&update.description);
        let kind = update.kind.map(|k| k.as_str());

        let row = client
            .query_opt(
                &format!(
                    "UPDATE animals SET
                        name = COALESCE($2, name),
                        kind = COALESCE($3, kind),
                        breed = CASE WHEN $4 THEN $5 ELSE breed END,
                        age = CASE WHEN $6 THEN $7 ELSE age END,
                        size = CASE WHEN $8 THEN $9 ELSE size END,
                        description = CASE WHEN $10 THEN $11 ELSE description END,
                        photo = COALESCE($12, photo),
                        adopted = COALESCE($13, adopted)
                     WHERE id = $1
                     RETURNING {ANIMAL_COLUMNS}"
                ),
                &[
                    &id,
                    &update.name,
                    &kind,
                    &set_breed,
                    &breed,
                    &set_age,
                    &age,
                    &set_size,
                    &size,
                    &set_description,
                    &description,
                    &update.photo,
                    &update.adopted,
                ],
            )
            .await?;
        row.as_ref().map(animal_from_row).transpose()
    }

    async fn toggle_adopted(&self, id: Uuid) -> Result<Option<Animal>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!(
                    "UPDATE animals SET adopted = NOT COALESCE(adopted, false)
                     WHERE id = $1
                     RETURNING {ANIMAL_COLUMNS}"
                ),
                &[&id],
            )
            .await?;
        row.as_ref().map(animal_from_row).transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let client = self.pool.get().await?;
        let now = Utc::now();
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO users (id, name, email, password_hash, mobile, address, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                     RETURNING {USER_COLUMNS}"
                ),
                &[
                    &Uuid::new_v4(),
                    &user.name,
                    &user.email.to_lowercase(),
                    &user.password_hash,
                    &user.mobile,
                    &user.address,
                    &now,
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::Conflict("Email already registered".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(user_from_row(&row))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"), &[&id])
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"),
                &[&email.to_lowercase()],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let client = self.pool.get().await?;
        let (set_mobile, mobile) = split_clearable(&update.mobile);
        let (set_address, address) = split_clearable(&update.address);

        let row = client
            .query_opt(
                &format!(
                    "UPDATE users SET
                        name = $2,
                        mobile = CASE WHEN $3 THEN $4 ELSE mobile END,
                        address = CASE WHEN $5 THEN $6 ELSE address END,
                        updated_at = $7
                     WHERE id = $1
                     RETURNING {USER_COLUMNS}"
                ),
                &[
                    &id,
                    &update.name,
                    &set_mobile,
                    &mobile,
                    &set_address,
                    &address,
                    &Utc::now(),
                ],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, AppError> {
        let client = self.pool.get().await?;
        let now = Utc::now();
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO applications (id, animal_id, user_id, name, email, message, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                     RETURNING {APPLICATION_COLUMNS}"
                ),
                &[
                    &Uuid::new_v4(),
                    &application.animal_id,
                    &application.user_id,
                    &application.name,
                    &application.email,
                    &application.message,
                    &now,
                ],
            )
            .await?;
        Ok(application_from_row(&row))
    }

    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserApplication>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT ap.id, ap.animal_id, ap.user_id, ap.name, ap.email, ap.message,
                        ap.created_at, ap.updated_at,
                        an.id AS animal_ref, an.name AS animal_name,
                        an.kind AS animal_kind, an.breed AS animal_breed
                 FROM applications ap
                 LEFT JOIN animals an ON an.id = ap.animal_id
                 WHERE ap.user_id = $1
                 ORDER BY ap.created_at DESC",
                &[&user_id],
            )
            .await?;

        rows.iter()
            .map(|row| -> Result<UserApplication, AppError> {
                let animal_ref: Option<Uuid> = row.get("animal_ref");
                let animal = match animal_ref {
                    Some(id) => {
                        let kind: String = row.get("animal_kind");
                        Some(AnimalSummary {
                            id,
                            name: row.get("animal_name"),
                            kind: kind.parse::<AnimalType>()?,
                            breed: row.get("animal_breed"),
                        })
                    }
                    None => None,
                };
                Ok(UserApplication {
                    application: application_from_row(row),
                    animal,
                })
            })
            .collect()
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback, AppError> {
        let client = self.pool.get().await?;
        let now = Utc::now();
        let row = client
            .query_one(
                "INSERT INTO feedback (id, name, email, message, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $5)
                 RETURNING id, name, email, message, created_at, updated_at",
                &[
                    &Uuid::new_v4(),
                    &feedback.name,
                    &feedback.email,
                    &feedback.message,
                    &now,
                ],
            )
            .await?;
        Ok(Feedback {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            message: row.get("message"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
