//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Tests connect to the server named by `TASKSTORE_TEST_DATABASE_URL` or,
//! when the variable is unset, to a shared embedded cluster started on first
//! use. Each test runs inside a throwaway schema that is dropped afterwards.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_cluster;
use rstest::fixture;
use taskstore::task::{adapters::postgres::PostgresTaskRepository, services::TaskStore};
use uuid::Uuid;

/// Environment variable naming the test server.
pub const TEST_DATABASE_URL_ENV: &str = "TASKSTORE_TEST_DATABASE_URL";

/// SQL creating the task tables.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_tasks/up.sql");

/// Boxed error used by setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Store type exercised by the `PostgreSQL` tests.
pub type PgStore = TaskStore<PostgresTaskRepository, DefaultClock>;

/// Points every pooled connection at the test schema.
#[derive(Debug)]
struct SearchPath {
    schema: String,
}

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(&format!("SET search_path TO {}", self.schema))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Schema dropped when the guard goes out of scope.
pub struct TestSchema {
    database_url: String,
    name: String,
}

impl TestSchema {
    fn create(database_url: &str) -> Result<Self, BoxError> {
        let name = format!("taskstore_test_{}", Uuid::new_v4().simple());
        let mut connection = PgConnection::establish(database_url)?;
        connection.batch_execute(&format!("CREATE SCHEMA {name}"))?;
        Ok(Self {
            database_url: database_url.to_owned(),
            name,
        })
    }

    fn drop_schema(&self) -> Result<(), BoxError> {
        let mut connection = PgConnection::establish(&self.database_url)?;
        connection.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name))?;
        Ok(())
    }
}

impl Drop for TestSchema {
    fn drop(&mut self) {
        if let Err(err) = self.drop_schema() {
            tracing::warn!(schema = %self.name, error = %err, "test schema cleanup failed");
        }
    }
}

/// Store bound to a migrated, empty test schema.
///
/// Fields drop in order, so the pool closes before the schema is removed.
pub struct PreparedStore {
    /// Store under test.
    pub store: Arc<PgStore>,
    _schema: TestSchema,
}

/// Starts the shared embedded cluster once per test binary.
///
/// The cluster bootstraps its own runtime, so it is started off the calling
/// thread to stay clear of the test's tokio runtime. `TestCluster` is not
/// `Send`, so the process-wide singleton from
/// `pg_embedded_setup_unpriv::test_support` is initialised on that thread and
/// the cached reference is fetched afterwards.
fn embedded_cluster() -> &'static TestCluster {
    let started = std::thread::spawn(|| shared_cluster().map(|_| ())).join();
    match started.map(|_| shared_cluster()) {
        Ok(Ok(cluster)) => cluster,
        Ok(Err(err)) => panic!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}"),
        Err(_) => panic!("SKIP-TEST-CLUSTER: PostgreSQL bootstrap panicked"),
    }
}

/// Returns the configured test server, or the embedded cluster's
/// `postgres` database.
pub fn test_database_url() -> String {
    std::env::var(TEST_DATABASE_URL_ENV)
        .unwrap_or_else(|_| embedded_cluster().connection().database_url("postgres"))
}

/// Creates a migrated test schema and a store bound to it.
///
/// # Errors
///
/// Returns an error if the schema, pool or tables cannot be created.
pub fn prepare_store() -> Result<PreparedStore, BoxError> {
    let database_url = test_database_url();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();

    let schema = TestSchema::create(&database_url)?;
    let pool = Pool::builder()
        .max_size(4)
        .connection_customizer(Box::new(SearchPath {
            schema: schema.name.clone(),
        }))
        .build(ConnectionManager::<PgConnection>::new(database_url))?;
    pool.get()?.batch_execute(CREATE_TASKS_SQL)?;

    let store = TaskStore::new(
        Arc::new(PostgresTaskRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    Ok(PreparedStore {
        store: Arc::new(store),
        _schema: schema,
    })
}

/// Fixture yielding a store over a fresh, migrated schema.
#[fixture]
pub fn prepared_store() -> PreparedStore {
    prepare_store().expect("prepare PostgreSQL test schema")
}
