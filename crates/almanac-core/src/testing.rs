//! Test doubles shared by the unit tests.

use almanac_geo::{GeocodeOutcome, Geocoder};
use almanac_types::Coordinates;
use tokio::sync::Mutex;

/// Geocoder that answers a fixed outcome and records every address it saw.
#[derive(Debug)]
pub struct RecordingGeocoder {
    outcome: GeocodeOutcome,
    calls: Mutex<Vec<String>>,
}

impl RecordingGeocoder {
    pub fn found(latitude: f64, longitude: f64) -> Self {
        Self {
            outcome: GeocodeOutcome::Found(Coordinates::new(latitude, longitude)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            outcome: GeocodeOutcome::Unavailable,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

impl Geocoder for RecordingGeocoder {
    async fn geocode(&self, address: &str) -> GeocodeOutcome {
        self.calls.lock().await.push(address.to_owned());
        self.outcome
    }
}
