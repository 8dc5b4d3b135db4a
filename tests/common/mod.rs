#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use client_registry::db::{DbPool, establish_connection_pool, run_migrations};
use client_registry::domain::client::NewClient;
use client_registry::repository::DieselRepository;
use tempfile::TempDir;

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(name);
        let database_url = path.to_str().expect("temp path is not utf-8");

        let pool = establish_connection_pool(database_url).expect("failed to build pool");
        let mut conn = pool.get().expect("failed to get connection");
        run_migrations(&mut conn).expect("failed to run migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn new_client(name: &str, income: f64) -> NewClient {
    NewClient::try_new(name, None, income, date(1990, 1, 1), 0).unwrap()
}
