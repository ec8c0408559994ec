/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup health check
/// - `migrations`: Embedded schema migrations
///
/// Models live in [`crate::models`]; the store traits that services use are
/// in [`crate::store`].

pub mod migrations;
pub mod pool;
