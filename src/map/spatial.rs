use crate::geo::{fast_distance_km, normalize_lat, normalize_lon, LatLon};
use std::collections::HashMap;

/// Spatial hash grid over point items for nearest-marker lookups
pub struct SpatialGrid<T> {
    /// Grid cells indexed by (cell_x, cell_y)
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// Items with their positions (indices stored in cells)
    items: Vec<(LatLon, T)>,
    /// Cell size in degrees
    cell_size: f64,
}

impl<T> SpatialGrid<T> {
    /// Create a new spatial grid with given cell size in degrees
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            items: Vec::new(),
            cell_size,
        }
    }

    /// Build a grid from positioned items
    pub fn build(items: impl IntoIterator<Item = (LatLon, T)>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (pos, item) in items {
            grid.insert(pos, item);
        }
        grid
    }

    #[inline(always)]
    fn to_cell(&self, pos: LatLon) -> (i32, i32) {
        let x = (normalize_lon(pos.lon) / self.cell_size).floor() as i32;
        let y = (normalize_lat(pos.lat) / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Insert an item at a geographic position
    pub fn insert(&mut self, pos: LatLon, item: T) {
        let idx = self.items.len();
        self.items.push((pos, item));

        let cell = self.to_cell(pos);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Indices of items in cells within `radius_degrees` of a point (may include
    /// items slightly outside)
    pub fn query_radius(&self, pos: LatLon, radius_degrees: f64) -> Vec<usize> {
        let center_cell = self.to_cell(pos);
        let cell_radius = (radius_degrees / self.cell_size).ceil() as i32;

        let mut results = Vec::new();
        for dy in -cell_radius..=cell_radius {
            for dx in -cell_radius..=cell_radius {
                let cell = (center_cell.0 + dx, center_cell.1 + dy);
                if let Some(indices) = self.cells.get(&cell) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results
    }

    /// Closest item within `max_km` of a point
    pub fn nearest(&self, pos: LatLon, max_km: f64) -> Option<&T> {
        // One degree of latitude is ~111km; longitude degrees are shorter so
        // widen the search by the latitude's cosine
        let radius_degrees = max_km / (111.0 * pos.lat.to_radians().cos().max(0.1));

        self.query_radius(pos, radius_degrees)
            .into_iter()
            .filter_map(|idx| self.items.get(idx))
            .map(|(p, item)| (fast_distance_km(pos, *p), item))
            .filter(|(d, _)| *d <= max_km)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, item)| item)
    }

    /// Get item by index
    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
