/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True for finite coordinates inside the valid lat/lon range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Normalize longitude from [-180, 180] to [0, 360) for grid indexing
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0)
}

/// Normalize latitude from [-90, 90] to [0, 180) for grid indexing
#[inline(always)]
pub fn normalize_lat(lat: f64) -> f64 {
    (lat + 90.0).clamp(0.0, 179.999)
}

/// Fast equirectangular distance approximation in kilometers
/// Good for small distances (<1000km)
#[inline(always)]
pub fn fast_distance_km(a: LatLon, b: LatLon) -> f64 {
    const R: f64 = 6371.0;

    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let cos_lat = ((a.lat + b.lat) * 0.5).to_radians().cos();

    let dx = dlon * cos_lat;
    R * (dx * dx + dlat * dlat).sqrt()
}
