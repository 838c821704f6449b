//! Export formatting and persistence for scored vehicles.
//!
//! High scorers go to JSON, the rest to XML. Both documents wrap the
//! vehicles in a top-level `convoy` collection.

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::scoring::VehicleRecord;
use crate::scoring::types::VEHICLE_COLUMNS;

/// Scores above this go to the JSON bucket.
pub const SCORE_THRESHOLD: u8 = 3;

/// Which export a stored vehicle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportBucket {
    /// score > 3
    Json,
    /// score <= 3
    Xml,
}

impl ExportBucket {
    pub fn for_score(score: u8) -> Self {
        if score > SCORE_THRESHOLD {
            ExportBucket::Json
        } else {
            ExportBucket::Xml
        }
    }
}

impl fmt::Display for ExportBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportBucket::Json => f.write_str("json"),
            ExportBucket::Xml => f.write_str("xml"),
        }
    }
}

#[derive(Serialize)]
struct ConvoyDocument<'a> {
    convoy: &'a [VehicleRecord],
}

/// Writes `{"convoy": [...]}` to `path`, replacing any existing file.
pub fn write_json(path: &Path, vehicles: &[VehicleRecord]) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_json_to(BufWriter::new(file), vehicles)?;
    debug!(path = %path.display(), count = vehicles.len(), "JSON written");
    Ok(vehicles.len())
}

pub fn write_json_to<W: Write>(mut writer: W, vehicles: &[VehicleRecord]) -> Result<()> {
    serde_json::to_writer(&mut writer, &ConvoyDocument { convoy: vehicles })?;
    writer.flush()?;
    Ok(())
}

/// Writes a `<convoy>` document with one `<vehicle>` per record to `path`.
pub fn write_xml(path: &Path, vehicles: &[VehicleRecord]) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_xml_to(BufWriter::new(file), vehicles)?;
    debug!(path = %path.display(), count = vehicles.len(), "XML written");
    Ok(vehicles.len())
}

/// An empty bucket still yields `<convoy></convoy>`, never a self-closed root.
pub fn write_xml_to<W: Write>(writer: W, vehicles: &[VehicleRecord]) -> Result<()> {
    let mut xml = Writer::new(writer);

    xml.write_event(Event::Start(BytesStart::new("convoy")))?;
    for vehicle in vehicles {
        xml.write_event(Event::Start(BytesStart::new("vehicle")))?;
        for (name, value) in vehicle_fields(vehicle) {
            let text = value.to_string();
            xml.write_event(Event::Start(BytesStart::new(name)))?;
            xml.write_event(Event::Text(BytesText::new(&text)))?;
            xml.write_event(Event::End(BytesEnd::new(name)))?;
        }
        xml.write_event(Event::End(BytesEnd::new("vehicle")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("convoy")))?;

    xml.into_inner().flush()?;
    Ok(())
}

fn vehicle_fields(v: &VehicleRecord) -> [(&'static str, i64); 4] {
    let [id, engine, fuel, load] = VEHICLE_COLUMNS;
    [
        (id, v.vehicle_id),
        (engine, v.engine_capacity),
        (fuel, v.fuel_consumption),
        (load, v.maximum_load),
    ]
}

/// `"s were"` for any count but one, `" was"` for exactly one.
pub fn plural(count: usize) -> &'static str {
    if count == 1 { " was" } else { "s were" }
}

/// Formats a progress line such as `3 vehicles were saved into convoy.json`.
pub fn status_line(count: usize, noun: &str, action: &str, target: &Path) -> String {
    format!("{count} {noun}{} {action} {}", plural(count), target.display())
}
