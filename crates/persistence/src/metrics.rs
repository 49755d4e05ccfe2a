//! Database metrics for the issuer store.
//!
//! Query timings are labelled by table and operation so provisioning
//! (issuer, endpoint and mapping inserts) can be told apart from read-back.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Tables owned by the issuer store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Issuers,
    Endpoints,
    UserFieldMappings,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Issuers => "oauth2_issuers",
            Table::Endpoints => "oauth2_endpoints",
            Table::UserFieldMappings => "oauth2_user_field_mappings",
        }
    }
}

/// Record database query duration.
pub fn record_query_duration(table: Table, operation: &'static str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "table" => table.as_str(),
        "operation" => operation
    )
    .record(duration_secs);
}

/// Count a failed query by error kind.
pub fn record_query_error(table: Table, operation: &'static str, err: &sqlx::Error) {
    counter!(
        "database_query_errors_total",
        "table" => table.as_str(),
        "operation" => operation,
        "kind" => error_kind(err)
    )
    .increment(1);
}

/// Short label for a query failure. Constraint violations get their own
/// kinds since they are the expected failures during provisioning.
fn error_kind(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => "unique_violation",
            Some("23503") => "foreign_key_violation",
            _ => "database",
        },
        sqlx::Error::RowNotFound => "not_found",
        sqlx::Error::PoolTimedOut => "pool_timeout",
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => "decode",
        _ => "other",
    }
}

/// Record database connection pool metrics.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one query against a store table.
///
/// ```ignore
/// let timer = QueryTimer::new(Table::Endpoints, "create");
/// let result = sqlx::query_as::<_, EndpointEntity>(...).fetch_one(&pool).await;
/// timer.finish(&result);
/// ```
pub struct QueryTimer {
    table: Table,
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(table: Table, operation: &'static str) -> Self {
        Self {
            table,
            operation,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time, and the error kind if the query failed.
    pub fn finish<T>(self, result: &Result<T, sqlx::Error>) {
        record_query_duration(
            self.table,
            self.operation,
            self.start.elapsed().as_secs_f64(),
        );
        if let Err(err) = result {
            record_query_error(self.table, self.operation, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_labels() {
        assert_eq!(Table::Issuers.as_str(), "oauth2_issuers");
        assert_eq!(Table::Endpoints.as_str(), "oauth2_endpoints");
        assert_eq!(
            Table::UserFieldMappings.as_str(),
            "oauth2_user_field_mappings"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(error_kind(&sqlx::Error::RowNotFound), "not_found");
        assert_eq!(error_kind(&sqlx::Error::PoolTimedOut), "pool_timeout");
        assert_eq!(error_kind(&sqlx::Error::PoolClosed), "other");
    }

    #[test]
    fn test_query_timer_finish_without_recorder() {
        let timer = QueryTimer::new(Table::Issuers, "list");
        assert_eq!(timer.operation, "list");

        // No global recorder installed; both paths are no-ops.
        timer.finish(&Ok::<(), sqlx::Error>(()));
        QueryTimer::new(Table::Endpoints, "create").finish(&Err::<(), _>(sqlx::Error::RowNotFound));
    }
}
