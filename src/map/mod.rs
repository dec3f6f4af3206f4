mod geometry;
mod projection;
mod renderer;
mod spatial;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

pub use geometry::{draw_circle, draw_linestring};
pub use projection::Viewport;
pub use renderer::{
    BaseLayer, BoundaryStyle, CircleMarker, MapRenderer, Overlay, Popup, RenderedMap,
    BOUNDARY_LAYER_NAME, BOUNDARY_STYLE,
};
pub use spatial::SpatialGrid;
