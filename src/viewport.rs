//! Map center and zoom kept across interactions.

use crate::filter::RegionChoice;
use crate::geo::LatLon;
use tracing::debug;

/// Center of the Czech Republic
pub const NATIONAL_CENTER: LatLon = LatLon::new(49.8175, 15.4730);
/// Zoom showing the whole country
pub const NATIONAL_ZOOM: u8 = 7;
/// Zoom showing a single region
pub const REGION_ZOOM: u8 = 9;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Predefined centroid of each region
pub const REGION_CENTERS: [(&str, LatLon); 14] = [
    ("Hlavní město Praha", LatLon::new(50.06678964987252, 14.465998829962977)),
    ("Středočeský kraj", LatLon::new(50.003605191950115, 14.54954836371052)),
    ("Jihočeský kraj", LatLon::new(49.09310368241909, 14.432286603192251)),
    ("Plzeňský kraj", LatLon::new(49.59818612785983, 13.228010116617472)),
    ("Karlovarský kraj", LatLon::new(50.1740783270064, 12.753140604283816)),
    ("Ústecký kraj", LatLon::new(50.53040763516859, 13.84565561762281)),
    ("Liberecký kraj", LatLon::new(50.70495750261212, 14.99864445395474)),
    ("Královéhradecký kraj", LatLon::new(50.383626410733015, 15.866464780805817)),
    ("Pardubický kraj", LatLon::new(49.90127803525259, 16.191215444747982)),
    ("Kraj Vysočina", LatLon::new(49.41344724547589, 15.671506555415327)),
    ("Jihomoravský kraj", LatLon::new(49.08016770385136, 16.635192353088943)),
    ("Olomoucký kraj", LatLon::new(49.77734134610242, 17.19105583754125)),
    ("Moravskoslezský kraj", LatLon::new(49.82068318540236, 17.979370693046423)),
    ("Zlínský kraj", LatLon::new(49.22046625560532, 17.747374912706007)),
];

/// Centroid of a region, if one is predefined
pub fn region_center(region: &str) -> Option<LatLon> {
    REGION_CENTERS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, center)| *center)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewMode {
    Default,
    RegionFocused(String),
}

/// Session-scoped map view.
///
/// Center and zoom move only on a region change edge or on a map
/// interaction; filter changes never touch them.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub center: LatLon,
    pub zoom: u8,
    pub last_region: RegionChoice,
    pub mode: ViewMode,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            center: NATIONAL_CENTER,
            zoom: NATIONAL_ZOOM,
            last_region: RegionChoice::All,
            mode: ViewMode::Default,
        }
    }
}

impl ViewportState {
    /// React to the region selector. Returns true when the view was reset.
    ///
    /// Re-reporting the region already recorded is a no-op, so a pan made
    /// after picking a region survives later redraws.
    pub fn select_region(&mut self, region: &RegionChoice) -> bool {
        if *region == self.last_region {
            return false;
        }
        self.last_region = region.clone();

        match region {
            RegionChoice::Named(name) => match region_center(name) {
                Some(center) => {
                    self.center = center;
                    self.zoom = REGION_ZOOM;
                    self.mode = ViewMode::RegionFocused(name.clone());
                }
                None => self.reset_national(),
            },
            RegionChoice::All => self.reset_national(),
        }

        debug!(region = %region, zoom = self.zoom, "viewport moved for region");
        true
    }

    /// Take over the center and zoom reported by the map widget
    pub fn record_interaction(&mut self, center: LatLon, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn reset_national(&mut self) {
        self.center = NATIONAL_CENTER;
        self.zoom = NATIONAL_ZOOM;
        self.mode = ViewMode::Default;
    }
}
