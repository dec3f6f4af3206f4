use crate::catalog::{CategoryIndex, Rgb, PALETTE};
use crate::config::MapConfig;
use crate::data::{BoundarySet, SchoolRecord};
use crate::geo::LatLon;
use crate::viewport::ViewportState;

/// Display name of the boundary overlay in the layer control
pub const BOUNDARY_LAYER_NAME: &str = "Hranice krajů";

/// Border-only style of the boundary overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryStyle {
    pub fill: Option<Rgb>,
    pub color: Rgb,
    pub weight: u8,
}

pub const BOUNDARY_STYLE: BoundaryStyle = BoundaryStyle {
    fill: None,
    color: Rgb::BLUE,
    weight: 2,
};

/// Base layer drawn under everything else
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseLayer {
    /// Spacing of the lat/lon grid in degrees
    pub graticule_step: f64,
}

/// Toggleable layer drawn above the base layer
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay<'a> {
    pub name: &'static str,
    pub style: BoundaryStyle,
    pub boundaries: &'a BoundarySet,
}

/// Popup attached to a marker
#[derive(Debug, Clone, PartialEq)]
pub struct Popup<'a> {
    pub title: &'a str,
    pub authority: &'a str,
    /// Non-null school types in column order
    pub items: Vec<&'a str>,
}

impl<'a> Popup<'a> {
    pub fn for_school(school: &'a SchoolRecord) -> Self {
        Self {
            title: &school.name,
            authority: &school.authority,
            items: school.type_values().collect(),
        }
    }
}

/// Filled circle marker for one school
#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker<'a> {
    pub position: LatLon,
    /// Radius in screen pixels
    pub radius: u32,
    pub color: Rgb,
    pub fill_color: Rgb,
    pub fill_opacity: f32,
    pub popup: Popup<'a>,
}

/// Everything needed to draw one frame of the map
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMap<'a> {
    pub center: LatLon,
    pub zoom: u8,
    pub base: BaseLayer,
    pub overlays: Vec<Overlay<'a>>,
    pub markers: Vec<CircleMarker<'a>>,
    /// Whether the layer control is shown; set when any overlay is present
    pub layer_control: bool,
}

impl RenderedMap<'_> {
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn has_overlay(&self, name: &str) -> bool {
        self.overlays.iter().any(|o| o.name == name)
    }
}

/// Composes the filtered schools into a [`RenderedMap`]
pub struct MapRenderer {
    pub marker_radius: u32,
    pub base: BaseLayer,
}

impl MapRenderer {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            marker_radius: config.marker_radius,
            base: BaseLayer { graticule_step: 1.0 },
        }
    }

    /// Build the map for the current filter result and viewport.
    ///
    /// The boundary overlay is included only when `show_boundaries` is set and
    /// a boundary set is available.
    pub fn render<'a>(
        &self,
        schools: &[&'a SchoolRecord],
        catalog: &CategoryIndex,
        viewport: &ViewportState,
        show_boundaries: bool,
        boundaries: Option<&'a BoundarySet>,
    ) -> RenderedMap<'a> {
        let overlays: Vec<Overlay<'a>> = boundaries
            .filter(|_| show_boundaries)
            .map(|set| Overlay {
                name: BOUNDARY_LAYER_NAME,
                style: BOUNDARY_STYLE,
                boundaries: set,
            })
            .into_iter()
            .collect();

        let markers = schools
            .iter()
            .map(|school| {
                // The catalog covers every authority in the dataset; gray is
                // only reachable for records from elsewhere
                let color = catalog.color_of(&school.authority).unwrap_or(PALETTE[7]);
                CircleMarker {
                    position: school.coordinates,
                    radius: self.marker_radius,
                    color,
                    fill_color: color,
                    fill_opacity: 1.0,
                    popup: Popup::for_school(school),
                }
            })
            .collect();

        RenderedMap {
            center: viewport.center,
            zoom: viewport.zoom,
            base: self.base,
            layer_control: !overlays.is_empty(),
            overlays,
            markers,
        }
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(&MapConfig::default())
    }
}
