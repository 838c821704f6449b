//! SQLite staging store for scored vehicles.
//!
//! The `convoy` table is created with its score column on first open, so
//! opening the same file on every run is safe. Each run clears the table and
//! inserts the whole convoy in a single transaction. The connection closes
//! when the store is dropped, including on error paths.

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::output::ExportBucket;
use crate::scoring::{ScoredConvoy, VehicleRecord};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS convoy (
        vehicle_id INTEGER PRIMARY KEY NOT NULL,
        engine_capacity INTEGER NOT NULL,
        fuel_consumption INTEGER NOT NULL,
        maximum_load INTEGER NOT NULL,
        score INTEGER NOT NULL
    );";

const INSERT_VEHICLE: &str = "
    INSERT INTO convoy (vehicle_id, engine_capacity, fuel_consumption, maximum_load, score)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_HIGH: &str = "
    SELECT vehicle_id, engine_capacity, fuel_consumption, maximum_load
    FROM convoy WHERE score > 3 ORDER BY vehicle_id";

const SELECT_LOW: &str = "
    SELECT vehicle_id, engine_capacity, fuel_consumption, maximum_load
    FROM convoy WHERE score <= 3 ORDER BY vehicle_id";

/// Handle to a `.s3db` store file.
pub struct ConvoyStore {
    conn: Connection,
    path: PathBuf,
}

impl ConvoyStore {
    /// Opens or creates the store at `path` and ensures the table exists.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open store {}", path.display()))?;
        conn.execute_batch(CREATE_TABLE)
            .with_context(|| format!("failed to create convoy table in {}", path.display()))?;
        debug!("Store ready");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Opens a store written by an earlier run without creating anything.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("failed to open store {}", path.display()))?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes every stored vehicle. Returns the number of rows removed.
    pub fn reset(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM convoy", [])?;
        debug!(removed, "Store cleared");
        Ok(removed)
    }

    /// Inserts every scored vehicle in one transaction.
    ///
    /// A failing row (for example a duplicate `vehicle_id`) rolls back the
    /// whole batch.
    #[tracing::instrument(skip_all, fields(path = %self.path.display(), vehicles = convoy.len()))]
    pub fn insert_all(&mut self, convoy: &ScoredConvoy) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(INSERT_VEHICLE)?;
            for vehicle in &convoy.vehicles {
                let r = &vehicle.record;
                inserted += stmt
                    .execute(params![
                        r.vehicle_id,
                        r.engine_capacity,
                        r.fuel_consumption,
                        r.maximum_load,
                        vehicle.score,
                    ])
                    .with_context(|| format!("failed to insert vehicle {}", r.vehicle_id))?;
            }
        }
        tx.commit()?;

        info!(inserted, "Vehicles stored");
        Ok(inserted)
    }

    /// Reads the base columns of every vehicle in `bucket`, ordered by id.
    pub fn vehicles(&self, bucket: ExportBucket) -> Result<Vec<VehicleRecord>> {
        let sql = match bucket {
            ExportBucket::Json => SELECT_HIGH,
            ExportBucket::Xml => SELECT_LOW,
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .with_context(|| format!("{} has no scored convoy table", self.path.display()))?;
        let rows = stmt.query_map([], |row| {
            Ok(VehicleRecord {
                vehicle_id: row.get(0)?,
                engine_capacity: row.get(1)?,
                fuel_consumption: row.get(2)?,
                maximum_load: row.get(3)?,
            })
        })?;

        let vehicles = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(bucket = %bucket, count = vehicles.len(), "Bucket queried");
        Ok(vehicles)
    }

    /// Total number of stored vehicles.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM convoy", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Closes the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}
