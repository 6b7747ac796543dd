//! Reference data bootstrap from CSV datasets.
//!
//! Each table is loaded only while it is still empty, so running the
//! loader against an already populated state is a no-op.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use airspace_core::{Airline, Airport, Gate, Plane, Runway, SizeClass};

use crate::state::AppState;

const AIRPORTS: &str = "airport.csv";
const AIRLINES: &str = "airline.csv";
const AIRPORT_AIRLINES: &str = "airport_airline.csv";
const GATES: &str = "gate.csv";
const RUNWAYS: &str = "runway.csv";
const PLANES: &str = "plane.csv";

/// Rows loaded per table in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureReport {
    pub airports: usize,
    pub airlines: usize,
    pub links: usize,
    pub gates: usize,
    pub runways: usize,
    pub planes: usize,
}

impl FixtureReport {
    pub fn total(&self) -> usize {
        self.airports + self.airlines + self.links + self.gates + self.runways + self.planes
    }
}

#[derive(Debug, Deserialize)]
struct AirportRow {
    name: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct AirlineRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    airport: String,
    airline: String,
}

#[derive(Debug, Deserialize)]
struct SlotRow {
    id: String,
    airport: String,
    size: String,
}

#[derive(Debug, Deserialize)]
struct PlaneRow {
    id: String,
    airline: String,
    size: String,
    #[serde(rename = "maxPassenger")]
    max_passenger: u32,
}

fn read_rows<T: for<'de> Deserialize<'de>>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    let reader = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<T>().enumerate() {
        let row = record.with_context(|| format!("{} row {}", path.display(), index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load every dataset in `dir` into empty tables.
pub fn load_fixtures(state: &AppState, dir: &Path) -> Result<FixtureReport> {
    let catalog = state.catalog();
    let mut report = FixtureReport::default();

    if catalog.airport_count() == 0 {
        for row in read_rows::<AirportRow>(dir, AIRPORTS)? {
            catalog.insert_airport(Airport::new(row.name, row.x, row.y))?;
            report.airports += 1;
        }
    }

    if catalog.airline_count() == 0 {
        for row in read_rows::<AirlineRow>(dir, AIRLINES)? {
            catalog.insert_airline(Airline::new(row.name));
            report.airlines += 1;
        }
    }

    if report.airports > 0 || report.airlines > 0 {
        for row in read_rows::<LinkRow>(dir, AIRPORT_AIRLINES)? {
            catalog.link_airline(&row.airport, &row.airline)?;
            report.links += 1;
        }
    }

    if catalog.gate_count() == 0 {
        for row in read_rows::<SlotRow>(dir, GATES)? {
            let size: SizeClass = row.size.parse()?;
            catalog.insert_gate(Gate::new(row.id, size, row.airport))?;
            report.gates += 1;
        }
    }

    if catalog.runway_count() == 0 {
        for row in read_rows::<SlotRow>(dir, RUNWAYS)? {
            let size: SizeClass = row.size.parse()?;
            catalog.insert_runway(Runway::new(row.id, size, row.airport))?;
            report.runways += 1;
        }
    }

    if state.plane_count() == 0 {
        for row in read_rows::<PlaneRow>(dir, PLANES)? {
            catalog.airline(&row.airline)?;
            let size: SizeClass = row.size.parse()?;
            state.insert_plane(Plane::new(row.id, size, row.airline, row.max_passenger));
            report.planes += 1;
        }
    }

    tracing::info!(
        airports = report.airports,
        airlines = report.airlines,
        links = report.links,
        gates = report.gates,
        runways = report.runways,
        planes = report.planes,
        "Loaded fixtures from {}",
        dir.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::alert_channel;
    use crate::config::Config;
    use std::path::PathBuf;

    fn datasets() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../datasets")
    }

    fn state() -> AppState {
        let (alerts, _queue) = alert_channel(8);
        AppState::new(Config::default(), alerts)
    }

    fn write_dataset(dir: &Path, airports: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(AIRPORTS), airports).unwrap();
        std::fs::write(dir.join(AIRLINES), "name\nacme\n").unwrap();
        std::fs::write(dir.join(AIRPORT_AIRLINES), "airport,airline\nkkz,acme\n").unwrap();
        std::fs::write(dir.join(GATES), "id,airport,size\ng1,kkz,large\n").unwrap();
        std::fs::write(dir.join(RUNWAYS), "id,airport,size\nr1,kkz,SMALL\n").unwrap();
        std::fs::write(
            dir.join(PLANES),
            "id,airline,size,maxPassenger\np1,acme,MEDIUM,120\n",
        )
        .unwrap();
    }

    #[test]
    fn test_loads_bundled_datasets() {
        let state = state();
        let report = load_fixtures(&state, &datasets()).unwrap();

        assert!(report.airports > 0);
        assert!(report.planes > 0);
        assert_eq!(report.airports, state.catalog().airport_count());
        assert_eq!(report.planes, state.plane_count());

        let plane = state.get_plane("khnndacsrj").unwrap();
        assert_eq!(plane.size, SizeClass::Large);
        assert_eq!(plane.current_passenger_count, 0);
        assert!(plane.origin.is_none());
    }

    #[test]
    fn test_second_run_loads_nothing() {
        let state = state();
        let first = load_fixtures(&state, &datasets()).unwrap();
        let second = load_fixtures(&state, &datasets()).unwrap();

        assert!(first.total() > 0);
        assert_eq!(second, FixtureReport::default());
        assert_eq!(state.plane_count(), first.planes);
    }

    #[test]
    fn test_size_classes_are_case_insensitive() {
        let dir = std::env::temp_dir().join(format!("airspace-fixtures-{}", std::process::id()));
        write_dataset(&dir, "name,x,y\nkkz,0,0\n");

        let state = state();
        let report = load_fixtures(&state, &dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(report.gates, 1);
        assert_eq!(state.catalog().gate("g1").unwrap().size, SizeClass::Large);
        assert!(state.catalog().airport("kkz").unwrap().permits("acme"));
    }

    #[test]
    fn test_colocated_airports_are_rejected() {
        let dir = std::env::temp_dir().join(format!(
            "airspace-fixtures-colocated-{}",
            std::process::id()
        ));
        write_dataset(&dir, "name,x,y\nkkz,0,0\nxhz,0,0\n");

        let result = load_fixtures(&state(), &dir);
        std::fs::remove_dir_all(&dir).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_directory_fails() {
        let result = load_fixtures(&state(), Path::new("/nonexistent/airspace"));
        assert!(result.is_err());
    }
}
