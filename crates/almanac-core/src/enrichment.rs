//! Best-effort geocoding of an event's address.

use almanac_geo::{GeocodeOutcome, Geocoder};
use almanac_types::{Address, Coordinates};

/// Geocode `address` and write the result into `coordinates`.
///
/// A blank address skips the provider entirely. When the provider has no
/// answer the slot keeps whatever it held before. Returns whether the slot
/// was overwritten.
pub async fn enrich<G: Geocoder>(
    geocoder: &G,
    address: &Address,
    coordinates: &mut Option<Coordinates>,
) -> bool {
    let line = address.line();
    if line.is_empty() {
        tracing::debug!("Enrichment skipped: blank address");
        return false;
    }

    match geocoder.geocode(&line).await {
        GeocodeOutcome::Found(found) => {
            *coordinates = Some(found);
            true
        }
        GeocodeOutcome::Unavailable => {
            tracing::debug!("Enrichment yielded no coordinates");
            false
        }
    }
}
