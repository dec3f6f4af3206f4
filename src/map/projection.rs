use crate::geo::LatLon;
use crate::viewport::{ViewportState, MAX_ZOOM, MIN_ZOOM};
use std::f64::consts::PI;

/// Braille dots spanned by the whole world at zoom 0
const WORLD_DOTS: f64 = 64.0;

/// Web Mercator x in [0, 1)
fn world_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Web Mercator y in [0, 1), 0 at the north edge
fn world_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-85.0511, 85.0511).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

fn world_to_lat_lon(x: f64, y: f64) -> LatLon {
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    LatLon::new(lat, lon)
}

/// Projection of the session viewport onto a Braille canvas
#[derive(Clone, Debug)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
    /// Canvas width in Braille dots
    pub width: usize,
    /// Canvas height in Braille dots
    pub height: usize,
}

impl Viewport {
    pub fn new(center: LatLon, zoom: u8, width: usize, height: usize) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    pub fn from_state(state: &ViewportState, width: usize, height: usize) -> Self {
        Self::new(state.center, state.zoom, width, height)
    }

    /// Dots per unit of world coordinates
    fn scale(&self) -> f64 {
        WORLD_DOTS * f64::from(1u32 << self.zoom.min(MAX_ZOOM))
    }

    /// Project a geographic coordinate to dot coordinates
    pub fn project(&self, pos: LatLon) -> (i32, i32) {
        let scale = self.scale();
        let px = (world_x(pos.lon) - world_x(self.center.lon)) * scale + self.width as f64 / 2.0;
        let py = (world_y(pos.lat) - world_y(self.center.lat)) * scale + self.height as f64 / 2.0;
        (px.floor() as i32, py.floor() as i32)
    }

    /// Unproject dot coordinates back to a geographic coordinate
    pub fn unproject(&self, px: i32, py: i32) -> LatLon {
        let scale = self.scale();
        let x = (px as f64 - self.width as f64 / 2.0) / scale + world_x(self.center.lon);
        let y = (py as f64 - self.height as f64 / 2.0) / scale + world_y(self.center.lat);
        world_to_lat_lon(x, y)
    }

    /// Center after dragging the map by a dot delta
    pub fn panned(&self, dx: i32, dy: i32) -> LatLon {
        let mut center = self.unproject(self.width as i32 / 2 + dx, self.height as i32 / 2 + dy);
        center.lon = (center.lon + 180.0).rem_euclid(360.0) - 180.0;
        center.lat = center.lat.clamp(-85.0, 85.0);
        center
    }

    /// Center and zoom after zooming by `steps` levels, keeping the point
    /// under (px, py) fixed on screen
    pub fn zoomed_at(&self, px: i32, py: i32, steps: i8) -> (LatLon, u8) {
        let zoom = (i16::from(self.zoom) + i16::from(steps))
            .clamp(i16::from(MIN_ZOOM), i16::from(MAX_ZOOM)) as u8;
        let anchor = self.unproject(px, py);

        let next = Self::new(self.center, zoom, self.width, self.height);
        let scale = next.scale();
        let cx = world_x(anchor.lon) - (px as f64 - self.width as f64 / 2.0) / scale;
        let cy = world_y(anchor.lat) - (py as f64 - self.height as f64 / 2.0) / scale;

        (world_to_lat_lon(cx, cy), zoom)
    }

    /// Dots per kilometer at the center latitude
    pub fn dots_per_km(&self) -> f64 {
        let earth_circumference_km = 40_075.0 * self.center.lat.to_radians().cos();
        self.scale() / earth_circumference_km
    }

    /// Check if a projected point is visible in the viewport
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}
