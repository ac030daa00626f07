//! Wentzville, MO households for canvassing fixtures.
//!
//! Three neighbourhoods a few miles apart; households inside one
//! neighbourhood are within a few blocks of each other.

use canvass_planner::geocode::StaticGeocoder;

/// A household address with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Household {
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Household {
    pub const fn new(address: &'static str, lat: f64, lng: f64) -> Self {
        Self { address, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Old Town (around Main St / Church St)
// ============================================================================

pub const OLD_TOWN: &[Household] = &[
    Household::new("101 E Main St, Wentzville, MO 63385", 38.8113, -90.8527),
    Household::new("115 E Main St, Wentzville, MO 63385", 38.8114, -90.8521),
    Household::new("207 E Main St, Wentzville, MO 63385", 38.8116, -90.8510),
    Household::new("12 Church St, Wentzville, MO 63385", 38.8121, -90.8533),
    Household::new("30 Church St, Wentzville, MO 63385", 38.8127, -90.8534),
    Household::new("104 S Linn Ave, Wentzville, MO 63385", 38.8104, -90.8541),
    Household::new("118 S Linn Ave, Wentzville, MO 63385", 38.8098, -90.8542),
    Household::new("9 W Allen St, Wentzville, MO 63385", 38.8109, -90.8552),
    Household::new("25 W Allen St, Wentzville, MO 63385", 38.8108, -90.8561),
    Household::new("310 E Pearce Blvd, Wentzville, MO 63385", 38.8131, -90.8502),
    Household::new("322 E Pearce Blvd, Wentzville, MO 63385", 38.8133, -90.8495),
    Household::new("5 N Elm St, Wentzville, MO 63385", 38.8122, -90.8519),
];

// ============================================================================
// Heritage subdivision (north-east, off Luetkenhaus Blvd)
// ============================================================================

pub const HERITAGE: &[Household] = &[
    Household::new("1402 Heritage Dr, Wentzville, MO 63385", 38.8290, -90.8320),
    Household::new("1410 Heritage Dr, Wentzville, MO 63385", 38.8292, -90.8314),
    Household::new("1418 Heritage Dr, Wentzville, MO 63385", 38.8295, -90.8308),
    Household::new("1426 Heritage Dr, Wentzville, MO 63385", 38.8298, -90.8302),
    Household::new("3 Liberty Ct, Wentzville, MO 63385", 38.8302, -90.8325),
    Household::new("7 Liberty Ct, Wentzville, MO 63385", 38.8305, -90.8329),
    Household::new("11 Liberty Ct, Wentzville, MO 63385", 38.8307, -90.8322),
    Household::new("200 Patriot Way, Wentzville, MO 63385", 38.8284, -90.8297),
    Household::new("212 Patriot Way, Wentzville, MO 63385", 38.8281, -90.8290),
    Household::new("224 Patriot Way, Wentzville, MO 63385", 38.8278, -90.8283),
    Household::new("1501 Luetkenhaus Blvd, Wentzville, MO 63385", 38.8271, -90.8331),
    Household::new("1515 Luetkenhaus Blvd, Wentzville, MO 63385", 38.8276, -90.8339),
];

// ============================================================================
// Southern subdivision (south of I-70, off Wentzville Pkwy)
// ============================================================================

pub const SOUTH_PARKWAY: &[Household] = &[
    Household::new("801 Meadow Lake Dr, Wentzville, MO 63385", 38.7905, -90.8620),
    Household::new("809 Meadow Lake Dr, Wentzville, MO 63385", 38.7909, -90.8614),
    Household::new("817 Meadow Lake Dr, Wentzville, MO 63385", 38.7913, -90.8608),
    Household::new("825 Meadow Lake Dr, Wentzville, MO 63385", 38.7917, -90.8601),
    Household::new("2 Willow Bend Ct, Wentzville, MO 63385", 38.7898, -90.8633),
    Household::new("6 Willow Bend Ct, Wentzville, MO 63385", 38.7894, -90.8639),
    Household::new("10 Willow Bend Ct, Wentzville, MO 63385", 38.7891, -90.8631),
    Household::new("450 Stone Meadow Pkwy, Wentzville, MO 63385", 38.7921, -90.8645),
    Household::new("462 Stone Meadow Pkwy, Wentzville, MO 63385", 38.7925, -90.8652),
    Household::new("474 Stone Meadow Pkwy, Wentzville, MO 63385", 38.7929, -90.8659),
    Household::new("15 Prairie View Ln, Wentzville, MO 63385", 38.7887, -90.8610),
    Household::new("27 Prairie View Ln, Wentzville, MO 63385", 38.7883, -90.8603),
];

/// Every household, neighbourhoods interleaved so input order carries no
/// geography.
pub fn all_households() -> Vec<Household> {
    let mut all = Vec::new();
    for i in 0..OLD_TOWN.len().max(HERITAGE.len()).max(SOUTH_PARKWAY.len()) {
        for area in [OLD_TOWN, HERITAGE, SOUTH_PARKWAY] {
            if let Some(household) = area.get(i) {
                all.push(*household);
            }
        }
    }
    all
}

pub fn addresses(households: &[Household]) -> Vec<String> {
    households.iter().map(|h| h.address.to_string()).collect()
}

/// Offline geocoder that knows exactly these households.
pub fn geocoder(households: &[Household]) -> StaticGeocoder {
    households.iter().map(|h| (h.address, h.coords())).collect()
}

/// Which neighbourhood an address belongs to.
pub fn neighbourhood_of(address: &str) -> Option<&'static str> {
    [("old-town", OLD_TOWN), ("heritage", HERITAGE), ("south-parkway", SOUTH_PARKWAY)]
        .into_iter()
        .find(|(_, area)| area.iter().any(|h| h.address == address))
        .map(|(name, _)| name)
}
