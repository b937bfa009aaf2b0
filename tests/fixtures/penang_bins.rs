//! George Town / Penang island bin sites for realistic test fixtures.
//!
//! Coordinates are approximate street-level positions of public landmarks.

use collection_planner::types::Stop;

/// A named bin site with coordinates and a current fill level.
#[derive(Debug, Clone)]
pub struct BinSite {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub fill: f64,
}

impl BinSite {
    pub const fn new(id: &'static str, name: &'static str, lat: f64, lng: f64, fill: f64) -> Self {
        Self { id, name, lat, lng, fill }
    }

    pub fn stop(&self) -> Stop {
        Stop::new(self.id, self.lat, self.lng, self.fill).with_capacity(120.0)
    }
}

// ============================================================================
// George Town heritage core
// ============================================================================

pub const HERITAGE_CORE: &[BinSite] = &[
    BinSite::new("GT01", "KOMTAR Bus Terminal", 5.4140, 100.3290, 72.0),
    BinSite::new("GT02", "Penang Times Square", 5.4123, 100.3254, 95.0),
    BinSite::new("GT03", "Chowrasta Market", 5.4183, 100.3332, 81.0),
    BinSite::new("GT04", "Little India Market Street", 5.4170, 100.3397, 64.0),
    BinSite::new("GT05", "Armenian Street", 5.4147, 100.3377, 33.0),
    BinSite::new("GT06", "Chew Jetty", 5.4123, 100.3420, 58.0),
    BinSite::new("GT07", "Fort Cornwallis", 5.4206, 100.3440, 22.0),
    BinSite::new("GT08", "Esplanade", 5.4215, 100.3415, 47.0),
];

// ============================================================================
// Northern coastal strip
// ============================================================================

pub const NORTH_COAST: &[BinSite] = &[
    BinSite::new("NC01", "Gurney Plaza Entrance", 5.4376, 100.3098, 85.0),
    BinSite::new("NC02", "Gurney Drive Hawker Centre", 5.4388, 100.3108, 90.0),
    BinSite::new("NC03", "Tanjung Tokong", 5.4576, 100.3060, 41.0),
    BinSite::new("NC04", "Straits Quay", 5.4585, 100.3128, 18.0),
    BinSite::new("NC05", "Batu Ferringhi Beach", 5.4710, 100.2770, 38.0),
];

// ============================================================================
// South / Bayan Lepas
// ============================================================================

pub const SOUTH_ISLAND: &[BinSite] = &[
    BinSite::new("SI01", "Queensbay Mall South", 5.3325, 100.3067, 45.0),
    BinSite::new("SI02", "Bayan Lepas Market", 5.2949, 100.2593, 77.0),
    BinSite::new("SI03", "Penang Airport Arrivals", 5.2930, 100.2650, 12.0),
];

pub fn all_sites() -> Vec<BinSite> {
    let mut all = Vec::new();
    all.extend_from_slice(HERITAGE_CORE);
    all.extend_from_slice(NORTH_COAST);
    all.extend_from_slice(SOUTH_ISLAND);
    all
}

pub fn stops(sites: &[BinSite]) -> Vec<Stop> {
    sites.iter().map(BinSite::stop).collect()
}
