//! Spherical geometry for radius search.
//!
//! Radius search runs in two phases. A latitude/longitude bounding box is a
//! cheap, index-friendly range predicate that over-approximates the search
//! circle; the great-circle distance is the exact (and expensive) test applied
//! only to candidates inside the box. [`NearQuery`] carries both so a store can
//! evaluate them in that order.

use almanac_types::Coordinates;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Approximate length of one degree of latitude in statute miles.
pub const MILES_PER_DEGREE_LATITUDE: f64 = 69.0;

/// Great-circle distance in miles between two points, using the spherical
/// law of cosines.
///
/// The cosine term is clamped to `[-1, 1]` before the arccosine: rounding can
/// push it to e.g. `1.0000000000000002` for coincident points, which would
/// otherwise produce `NaN`.
pub fn great_circle_miles(from: Coordinates, to: Coordinates) -> f64 {
    let lat_from = from.latitude.to_radians();
    let lat_to = to.latitude.to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let cosine = (lat_from.cos() * lat_to.cos())
        .mul_add(delta_lng.cos(), lat_from.sin() * lat_to.sin())
        .clamp(-1.0, 1.0);

    EARTH_RADIUS_MILES * cosine.acos()
}

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge in degrees.
    pub min_lat: f64,
    /// Northern edge in degrees.
    pub max_lat: f64,
    /// Western edge in degrees.
    pub min_lng: f64,
    /// Eastern edge in degrees.
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box enclosing the circle of `radius_miles` around `center`.
    ///
    /// One degree of latitude is taken as 69 miles. The longitude half-width
    /// is the larger of the flat estimate `r / (cos(latitude) * 69)` and the
    /// exact spherical half-width `asin(sin(r / R) / cos(latitude))`, which
    /// grows faster toward the poles. When the circle reaches a pole every
    /// longitude is within range, so the box spans them all.
    pub fn around(center: Coordinates, radius_miles: f64) -> Self {
        let lat_delta = radius_miles / MILES_PER_DEGREE_LATITUDE;
        let min_lat = center.latitude - lat_delta;
        let max_lat = center.latitude + lat_delta;

        let (min_lng, max_lng) = match longitude_half_width(center.latitude, radius_miles) {
            Some(lng_delta) if max_lat < 90.0 && min_lat > -90.0 => {
                (center.longitude - lng_delta, center.longitude + lng_delta)
            }
            _ => (-180.0, 180.0),
        };

        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Whether `point` lies inside the box (edges included).
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lng..=self.max_lng).contains(&point.longitude)
    }
}

/// Longitude half-width in degrees of the circle of `radius_miles` around a
/// point at `latitude`, or `None` when it covers every longitude.
fn longitude_half_width(latitude: f64, radius_miles: f64) -> Option<f64> {
    let cos_lat = latitude.to_radians().cos();
    let flat = radius_miles / (cos_lat * MILES_PER_DEGREE_LATITUDE);

    let ratio = (radius_miles / EARTH_RADIUS_MILES).sin() / cos_lat;
    if !ratio.is_finite() || ratio >= 1.0 {
        return None;
    }
    let spherical = ratio.asin().to_degrees();

    let delta = flat.max(spherical);
    (delta.is_finite() && delta < 180.0).then_some(delta)
}

/// A fully-resolved radius search: exact center and radius plus the
/// pre-filter box derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearQuery {
    /// Search center.
    pub center: Coordinates,
    /// Search radius in miles (already clamped by the caller).
    pub radius_miles: f64,
    /// Pre-filter rectangle around the circle.
    pub bounds: BoundingBox,
}

impl NearQuery {
    /// Build a query and its bounding box.
    pub fn new(center: Coordinates, radius_miles: f64) -> Self {
        Self {
            center,
            radius_miles,
            bounds: BoundingBox::around(center, radius_miles),
        }
    }

    /// Two-phase test: inside the box, then within the exact radius
    /// (inclusive).
    pub fn admits(&self, point: Coordinates) -> bool {
        self.bounds.contains(point) && great_circle_miles(self.center, point) <= self.radius_miles
    }
}
