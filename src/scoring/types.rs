//! Data types used by the scoring pipeline.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::sanitizer::is_all_digits;
use crate::table::Table;

/// Columns every vehicle table must carry, in store order.
pub const VEHICLE_COLUMNS: [&str; 4] = [
    "vehicle_id",
    "engine_capacity",
    "fuel_consumption",
    "maximum_load",
];

/// One vehicle as read from a sanitized table or the store.
///
/// Field order is the export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: i64,
    pub engine_capacity: i64,
    pub fuel_consumption: i64,
    pub maximum_load: i64,
}

impl VehicleRecord {
    /// Converts every row of a sanitized table.
    ///
    /// # Errors
    ///
    /// Fails when a required column is missing, a cell is empty or not all
    /// digits, a value overflows, fuel consumption is zero, or a vehicle id
    /// repeats.
    pub fn from_table(table: &Table) -> Result<Vec<VehicleRecord>> {
        let mut idx = [0usize; 4];
        for (slot, name) in idx.iter_mut().zip(VEHICLE_COLUMNS) {
            *slot = table
                .column_index(name)
                .with_context(|| format!("missing required column '{name}'"))?;
        }

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(table.len());

        for (n, row) in table.rows().iter().enumerate() {
            let record_no = n + 1;
            let mut values = [0i64; 4];
            for ((value, &col), name) in values.iter_mut().zip(&idx).zip(VEHICLE_COLUMNS) {
                let cell = row.get(col).map(String::as_str).unwrap_or_default();
                *value = parse_cell(cell)
                    .with_context(|| format!("record {record_no}: invalid '{name}'"))?;
            }

            let [vehicle_id, engine_capacity, fuel_consumption, maximum_load] = values;
            if fuel_consumption == 0 {
                bail!("record {record_no}: fuel_consumption must be greater than zero");
            }
            if !seen.insert(vehicle_id) {
                bail!("record {record_no}: duplicate vehicle_id {vehicle_id}");
            }

            records.push(VehicleRecord {
                vehicle_id,
                engine_capacity,
                fuel_consumption,
                maximum_load,
            });
        }

        Ok(records)
    }
}

fn parse_cell(cell: &str) -> Result<i64> {
    if cell.is_empty() {
        bail!("cell is empty");
    }
    if !is_all_digits(cell) {
        bail!("'{cell}' is not a whole number");
    }
    cell.parse::<i64>()
        .with_context(|| format!("'{cell}' is out of range"))
}

/// Thresholds the three score criteria are judged against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreThresholds {
    /// Average route length; route efficiency is compared against it.
    pub average_route: f64,
    /// Maximum fuel burned over the average route for the full two points.
    pub burned_fuel: f64,
    /// Minimum maximum_load for the capacity points.
    pub capacity: i64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            average_route: 450.0,
            burned_fuel: 230.0,
            capacity: 20,
        }
    }
}

/// A vehicle with its computed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredVehicle {
    pub record: VehicleRecord,
    pub score: u8,
}

/// All scored vehicles of one run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoredConvoy {
    pub vehicles: Vec<ScoredVehicle>,
}

impl ScoredConvoy {
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
