use serde::Serialize;

/// A decoded receiver position.
///
/// Coordinates are signed decimal degrees: north and east are positive,
/// south and west are negative. Latitude stays within -90 through 90
/// and longitude within -180 through 180; the sentence decoder refuses
/// to produce a fix outside those ranges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Fix {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}
