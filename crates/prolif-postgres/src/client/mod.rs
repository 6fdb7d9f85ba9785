//! PostgreSQL client with connection pooling and migration management.

mod migrate;
mod pg_client;
mod pg_config;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::{Object, Pool};

pub use migrate::{MigrationResult, run_pending_migrations};
pub use pg_client::{PgClient, PgPoolStatus};
pub use pg_config::PgConfig;

pub(crate) use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

/// Type alias for the connection pool used throughout the application.
pub type ConnectionPool = Pool<AsyncPgConnection>;

/// Type alias for a connection object from the pool.
pub type PooledConnection = Object<AsyncPgConnection>;

/// Alias used by request extractors; repository traits auto-deref through it.
pub type PgConn = Object<AsyncPgConnection>;

// Keep the manager type nameable for pool construction.
pub(crate) type Manager = AsyncDieselConnectionManager<AsyncPgConnection>;
