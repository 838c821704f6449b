use anyhow::Result;
use tracing::{debug, info};

use crate::scoring::types::{ScoreThresholds, ScoredConvoy, ScoredVehicle, VehicleRecord};
use crate::table::Table;

/// Distance covered per 100 units of fuel.
pub fn route_efficiency(record: &VehicleRecord) -> f64 {
    record.engine_capacity as f64 / record.fuel_consumption as f64 * 100.0
}

/// Fuel burned over the average route.
pub fn projected_fuel_burn(record: &VehicleRecord, thresholds: &ScoreThresholds) -> f64 {
    thresholds.average_route / 100.0 * record.fuel_consumption as f64
}

/// Scores a single vehicle on a 0–6 scale.
///
/// | Criterion                               | Points |
/// |-----------------------------------------|--------|
/// | route efficiency >= average route       | 2      |
/// | 2 × route efficiency >= average route   | 1      |
/// | projected fuel burn <= burned fuel      | 2      |
/// | projected fuel burn > burned fuel       | 1      |
/// | maximum load >= capacity                | 2      |
pub fn score_vehicle(record: &VehicleRecord, thresholds: &ScoreThresholds) -> u8 {
    let mut score = 0;

    let route = route_efficiency(record);
    if route >= thresholds.average_route {
        score += 2;
    } else if 2.0 * route >= thresholds.average_route {
        score += 1;
    }

    if projected_fuel_burn(record, thresholds) <= thresholds.burned_fuel {
        score += 2;
    } else {
        score += 1;
    }

    if record.maximum_load >= thresholds.capacity {
        score += 2;
    }

    score
}

/// Converts a sanitized table into records and scores each one, keeping
/// input order.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn score_table(table: &Table, thresholds: &ScoreThresholds) -> Result<ScoredConvoy> {
    let records = VehicleRecord::from_table(table)?;

    let vehicles: Vec<ScoredVehicle> = records
        .into_iter()
        .map(|record| {
            let score = score_vehicle(&record, thresholds);
            debug!(vehicle_id = record.vehicle_id, score, "Vehicle scored");
            ScoredVehicle { record, score }
        })
        .collect();

    info!(vehicles = vehicles.len(), "Convoy scored");
    Ok(ScoredConvoy { vehicles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::VEHICLE_COLUMNS;

    fn vehicle(engine_capacity: i64, fuel_consumption: i64, maximum_load: i64) -> VehicleRecord {
        VehicleRecord {
            vehicle_id: 1,
            engine_capacity,
            fuel_consumption,
            maximum_load,
        }
    }

    #[test]
    fn test_efficient_vehicle_with_high_fuel_burn() {
        let v = vehicle(900, 100, 25);
        let t = ScoreThresholds::default();

        assert_eq!(route_efficiency(&v), 900.0);
        assert_eq!(projected_fuel_burn(&v, &t), 450.0);
        // 450 > 230 burned fuel, so only one fuel point.
        assert_eq!(score_vehicle(&v, &t), 5);
    }

    #[test]
    fn test_low_score() {
        let v = vehicle(100, 100, 5);
        assert_eq!(score_vehicle(&v, &ScoreThresholds::default()), 1);
    }

    #[test]
    fn test_maximum_score() {
        // route 200 / 10 * 100 = 2000, burn 4.5 * 10 = 45
        let v = vehicle(200, 10, 20);
        assert_eq!(score_vehicle(&v, &ScoreThresholds::default()), 6);
    }

    #[test]
    fn test_half_route_efficiency_earns_one_point() {
        // route = 250, 2 * 250 >= 450; burn = 450 > 230; load < 20
        let v = vehicle(250, 100, 0);
        assert_eq!(score_vehicle(&v, &ScoreThresholds::default()), 2);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = ScoreThresholds {
            average_route: 100.0,
            burned_fuel: 50.0,
            capacity: 10,
        };
        // route = 100 (== average), burn = 1 * 50 = 50 (== burned), load == capacity
        let v = vehicle(50, 50, 10);
        assert_eq!(score_vehicle(&v, &t), 6);
    }

    #[test]
    fn test_score_is_non_decreasing_in_load() {
        let t = ScoreThresholds::default();
        let mut last = 0;
        for load in 0..60 {
            let s = score_vehicle(&vehicle(300, 80, load), &t);
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn test_score_never_below_one() {
        let t = ScoreThresholds::default();
        for (ec, fc, ml) in [(1, 1000, 0), (0, 1, 0), (10, 999, 19)] {
            assert!(score_vehicle(&vehicle(ec, fc, ml), &t) >= 1);
        }
    }

    #[test]
    fn test_score_table_keeps_order() {
        let table = Table::new(
            VEHICLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![
                vec!["3".into(), "200".into(), "10".into(), "20".into()],
                vec!["1".into(), "100".into(), "100".into(), "5".into()],
            ],
        );

        let convoy = score_table(&table, &ScoreThresholds::default()).unwrap();

        assert_eq!(convoy.len(), 2);
        assert_eq!(convoy.vehicles[0].record.vehicle_id, 3);
        assert_eq!(convoy.vehicles[0].score, 6);
        assert_eq!(convoy.vehicles[1].record.vehicle_id, 1);
        assert_eq!(convoy.vehicles[1].score, 1);
    }
}
