/// Database plumbing
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded migration runner
///
/// Row-level queries live next to the model in `models::user`; the store
/// adapter over them is `store::PgUserStore`.

pub mod migrations;
pub mod pool;
