use sqlx::PgPool;

/// Thin wrapper around the connection pool. Domain queries live in the
/// sibling modules as `impl PostgresRepository` blocks.
pub struct PostgresRepository {
    pub pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
