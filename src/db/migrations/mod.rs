//! Database schema migrations.
//!
//! Migration files are stored in this directory with the naming convention:
//! - `migration_NN_up.sql` - Upgrades schema from version `NN-1` to version `NN`
//! - `migration_NN_down.sql` - Downgrades schema from version `NN` to version `NN-1`

use crate::Result;
use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

/// One schema step. `version` is the schema version after applying `up_sql`; `down_sql` returns
/// the schema to `version - 1`.
struct Migration {
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

/// The schema version this build of the program expects.
pub(crate) const CURRENT_VERSION: i32 = 1;

/// Ordered by version, without gaps.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up_sql: include_str!("migration_01_up.sql"),
    down_sql: include_str!("migration_01_down.sql"),
}];

fn find(version: i32) -> Result<&'static Migration> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .with_context(|| format!("Migration {version} not found"))
}

/// Moves the schema from version `from` to version `to`, one migration at a time, upgrading or
/// downgrading as needed. Every step runs in its own transaction together with the update of
/// `schema_version`, so an interrupted run leaves the schema at the last completed step.
///
/// Nothing is run unless every migration between `from` and `to` exists.
pub(crate) async fn run(pool: &SqlitePool, from: i32, to: i32) -> Result<()> {
    if from == to {
        debug!("Database schema is at version {to}, nothing to migrate");
        return Ok(());
    }
    validate_migrations(from, to)?;

    if from < to {
        for version in (from + 1)..=to {
            debug!("Upgrading database schema to version {version:02}");
            apply(pool, find(version)?.up_sql, version).await?;
        }
    } else {
        for version in ((to + 1)..=from).rev() {
            debug!("Downgrading database schema from version {version:02}");
            apply(pool, find(version)?.down_sql, version - 1).await?;
        }
    }

    debug!("Database schema migrated from version {from} to {to}");
    Ok(())
}

async fn apply(pool: &SqlitePool, sql: &str, new_version: i32) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin migration transaction")?;

    // The migration files hold several statements each
    tx.execute(sql)
        .await
        .with_context(|| format!("Failed to migrate the schema to version {new_version}"))?;

    sqlx::query("UPDATE schema_version SET version = ?")
        .bind(new_version)
        .execute(&mut *tx)
        .await
        .context("Failed to update schema_version")?;

    tx.commit()
        .await
        .context("Failed to commit migration transaction")
}

/// Fails if any migration needed between `from` and `to` is missing.
fn validate_migrations(from: i32, to: i32) -> Result<()> {
    let (low, high) = if from < to { (from + 1, to) } else { (to + 1, from) };
    if let Some(missing) = (low..=high).find(|v| !MIGRATIONS.iter().any(|m| m.version == *v)) {
        bail!("Migration {missing} is missing but required to migrate from version {from} to {to}");
    }
    Ok(())
}
