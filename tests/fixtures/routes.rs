//! Waypoints of realistic runs.
//!
//! Points are already rounded to five decimals so they survive encoding
//! unchanged.

/// A named waypoint.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Strip loop: north along Las Vegas Blvd, back south on Koval Ln
// ============================================================================

pub const STRIP_LOOP: &[Waypoint] = &[
    Waypoint::new("MGM Grand", 36.10237, -115.16887),
    Waypoint::new("Hard Rock Cafe", 36.10416, -115.17222),
    Waypoint::new("Bellagio", 36.1126, -115.1767),
    Waypoint::new("Caesars Palace", 36.1162, -115.1745),
    Waypoint::new("Brooklyn Bowl", 36.11754, -115.16951),
    Waypoint::new("Wynn Las Vegas", 36.12638, -115.16582),
    Waypoint::new("Encore at Wynn", 36.12893, -115.16536),
    Waypoint::new("Koval Ln north", 36.12612, -115.15902),
    Waypoint::new("Koval Ln south", 36.10512, -115.15951),
    Waypoint::new("MGM Grand", 36.10237, -115.16887),
];

// ============================================================================
// Degenerate shapes
// ============================================================================

/// Due east along Tropicana Ave.
pub const TROPICANA_EAST: &[Waypoint] = &[
    Waypoint::new("Tropicana & Strip", 36.10247, -115.17222),
    Waypoint::new("Tropicana & Koval", 36.10247, -115.15951),
    Waypoint::new("Tropicana & Paradise", 36.10247, -115.15254),
];

/// Due north on Koval Ln.
pub const KOVAL_NORTH: &[Waypoint] = &[
    Waypoint::new("Koval & Tropicana", 36.10247, -115.15951),
    Waypoint::new("Koval & Harmon", 36.10938, -115.15951),
    Waypoint::new("Koval & Flamingo", 36.11604, -115.15951),
];

/// A treadmill session that only recorded its start.
pub const STANDING_START: &[Waypoint] = &[Waypoint::new("Gym", 36.11604, -115.15951)];

pub fn coords(route: &[Waypoint]) -> Vec<(f64, f64)> {
    route.iter().map(Waypoint::coords).collect()
}

pub fn encoded(route: &[Waypoint]) -> String {
    route_preview::encode(&coords(route))
}

/// Activity JSON in the shape the backend returns.
pub fn activity_json(id: i64, name: &str, start: &str, route: Option<&[Waypoint]>) -> String {
    let polyline = match route {
        Some(route) => format!("\"{}\"", encoded(route).replace('\\', "\\\\")),
        None => "null".to_string(),
    };
    format!(
        r#"{{"activityId": {id}, "name": "{name}", "startDateLocal": "{start}", "polyline": {polyline}, "type": "Run"}}"#
    )
}
