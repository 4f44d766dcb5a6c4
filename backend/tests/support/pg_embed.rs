//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own temporary database on a cluster shared by the
//! test binary. The schema comes from the same embedded migrations the
//! server applies at startup, so the suites exercise the production DDL.
//!
//! Set `SKIP_TEST_CLUSTER=1` where no cluster can be started; the suites
//! then log a skip marker instead of failing.

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use std::time::Duration;

use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated temporary database with a pool and a runtime to drive it.
///
/// Fields drop in declaration order: the pool closes before the runtime
/// stops and the database is removed last.
pub struct EmbeddedDatabase {
    pub pool: DbPool,
    pub runtime: Runtime,
    _database: TemporaryDatabase,
}

fn shared_cluster() -> BootstrapResult<&'static ClusterHandle> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(error),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn provision() -> Result<EmbeddedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster().map_err(|err| err.to_string())?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| err.to_string())?;
    let url = database.url().to_string();

    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(
            PoolConfig::new(url.as_str())
                .with_max_size(2)
                .with_min_idle(Some(1)),
        )
        .await
        .map_err(|err| err.to_string())
    })?;

    Ok(EmbeddedDatabase {
        pool,
        runtime,
        _database: database,
    })
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Provision a database, or `None` when the cluster is unavailable and
/// skipping was requested.
///
/// # Panics
/// When setup fails and `SKIP_TEST_CLUSTER` is not set, so CI breakage is
/// not masked.
pub fn embedded_database() -> Option<EmbeddedDatabase> {
    match provision() {
        Ok(database) => Some(database),
        Err(reason) if should_skip_test_cluster() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}
