use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use std::sync::Arc;
use symcheck_core::{AppointmentRepo, DoctorRepo, HistoryRepo, SessionRepo, UserRepo};
use symcheck_entities::{appointments, doctors, search_history, sessions, users};
use tracing::{debug, info};

use crate::accounts::{DatabaseSessionRepository, DatabaseUserRepository};
use crate::history::DatabaseHistoryRepository;
use crate::providers::{DatabaseAppointmentRepository, DatabaseDoctorRepository};
use crate::seed;

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("table") && err.to_string().contains("already exists")
}

/// Owns the database connection and hands out repositories over it.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    /// Connect to `database_url`, create missing tables and seed doctors.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to database: {}", database_url);

        let mut options = ConnectOptions::new(database_url);
        // Every pooled connection to `sqlite::memory:` is its own database
        if database_url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }
        options.sqlx_logging(false);

        let db = Database::connect(options).await?;
        Self::from_connection(db).await
    }

    pub async fn from_connection(db: DatabaseConnection) -> anyhow::Result<Self> {
        let store = Self { db };
        store.create_tables().await?;
        seed::seed_doctors(&store.db).await?;
        info!("Store initialized");
        Ok(store)
    }

    async fn create_tables(&self) -> anyhow::Result<()> {
        self.create_table(users::Entity).await?;
        self.create_table(sessions::Entity).await?;
        self.create_table(search_history::Entity).await?;
        self.create_table(doctors::Entity).await?;
        self.create_table(appointments::Entity).await?;
        Ok(())
    }

    async fn create_table<E: EntityTrait>(&self, entity: E) -> anyhow::Result<()> {
        let table = entity.table_name().to_owned();
        let backend = self.db.get_database_backend();
        let stmt = Schema::new(backend).create_table_from_entity(entity);
        match self
            .db
            .execute_unprepared(&backend.build(&stmt).to_string())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_table_already_exists_error(&e) => {
                debug!("Table {table} already exists, skipping creation");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    #[must_use]
    pub fn users(&self) -> Arc<dyn UserRepo> {
        Arc::new(DatabaseUserRepository::new(self.db.clone()))
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<dyn SessionRepo> {
        Arc::new(DatabaseSessionRepository::new(self.db.clone()))
    }

    #[must_use]
    pub fn history(&self) -> Arc<dyn HistoryRepo> {
        Arc::new(DatabaseHistoryRepository::new(self.db.clone()))
    }

    #[must_use]
    pub fn doctors(&self) -> Arc<dyn DoctorRepo> {
        Arc::new(DatabaseDoctorRepository::new(self.db.clone()))
    }

    #[must_use]
    pub fn appointments(&self) -> Arc<dyn AppointmentRepo> {
        Arc::new(DatabaseAppointmentRepository::new(self.db.clone()))
    }
}
