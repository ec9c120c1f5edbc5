//! PostgreSQL access: the bb8 pool for request handling and the embedded
//! schema migrations.

mod pool;

pub use pool::{
    AsyncDbPool, MIGRATIONS, establish_async_connection_pool, run_pending_migrations,
    with_migration_connection,
};
