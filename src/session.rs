//! Per-session interaction state.
//!
//! A [`Session`] is moved into [`Session::apply`] with one [`Interaction`] and
//! the updated session comes back out, so every state change goes through a
//! single handler.

use crate::data::SchoolRecord;
use crate::filter::{authority_options, FilterSelection, Picks, RegionChoice};
use crate::geo::LatLon;
use crate::viewport::ViewportState;
use tracing::debug;

/// A user action on one of the selectors or on the map
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    SelectRegion(RegionChoice),
    SetAuthorities(Picks),
    SetTypes(Picks),
    ToggleBoundaries(bool),
    /// The map widget was panned or zoomed
    MapMoved { center: LatLon, zoom: u8 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub selection: FilterSelection,
    pub viewport: ViewportState,
    pub show_boundaries: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one interaction and return the resulting session
    pub fn apply(mut self, interaction: Interaction, records: &[SchoolRecord]) -> Self {
        debug!(?interaction, "session interaction");

        match interaction {
            Interaction::SelectRegion(region) => {
                if region != self.selection.region {
                    let options = authority_options(records, &region);
                    self.selection.authorities.retain_options(&options);
                }
                self.viewport.select_region(&region);
                self.selection.region = region;
            }
            Interaction::SetAuthorities(picks) => self.selection.authorities = picks,
            Interaction::SetTypes(picks) => self.selection.types = picks,
            Interaction::ToggleBoundaries(show) => self.show_boundaries = show,
            Interaction::MapMoved { center, zoom } => {
                self.viewport.record_interaction(center, zoom)
            }
        }

        self
    }
}
