use crate::catalog::CategoryIndex;
use crate::config::AppConfig;
use crate::data::{load_boundaries, BoundarySet, Dataset, SchoolRecord};
use crate::filter::{authority_options, filter, Picks, RegionChoice};
use crate::map::{MapRenderer, RenderedMap, SpatialGrid, Viewport};
use crate::session::{Interaction, Session};
use crate::ui;
use ratatui::layout::Rect;
use std::path::PathBuf;
use tracing::{info, warn};

/// Marker picking tolerance in terminal cells
const PICK_RADIUS_CELLS: f64 = 2.0;

/// Sidebar panes and the map, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Boundaries,
    Regions,
    Authorities,
    Types,
    Map,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Boundaries,
        Focus::Regions,
        Focus::Authorities,
        Focus::Types,
        Focus::Map,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Cursor positions in the three selector lists (index 0 is "All")
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursors {
    pub region: usize,
    pub authority: usize,
    pub school_type: usize,
}

/// Application state
pub struct App {
    pub dataset: Dataset,
    pub catalog: CategoryIndex,
    pub renderer: MapRenderer,
    pub session: Session,
    /// Loaded on first use of the boundary overlay
    pub boundaries: Option<BoundarySet>,
    boundaries_path: PathBuf,
    /// Authority options for the selected region
    pub authority_options: Vec<String>,
    pub focus: Focus,
    pub cursors: Cursors,
    /// Record index whose popup is open
    pub popup: Option<usize>,
    /// Last error shown in the status bar
    pub status: Option<String>,
    /// Inner map area in terminal cells
    pub map_area: Rect,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    dragged: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(dataset: Dataset, config: &AppConfig, width: u16, height: u16) -> Self {
        let catalog = CategoryIndex::build(&dataset);
        let authority_options = authority_options(&dataset.records, &RegionChoice::All);
        info!(
            schools = dataset.records.len(),
            authorities = catalog.authority_colors().len(),
            types = catalog.type_values().len(),
            regions = catalog.regions().len(),
            "categories extracted"
        );

        Self {
            dataset,
            catalog,
            renderer: MapRenderer::new(&config.map),
            session: Session::new(),
            boundaries: None,
            boundaries_path: config.data.boundaries.clone(),
            authority_options,
            focus: Focus::Regions,
            cursors: Cursors::default(),
            popup: None,
            status: None,
            map_area: ui::map_area(Rect::new(0, 0, width, height)),
            last_mouse: None,
            dragged: false,
            should_quit: false,
        }
    }

    /// Update the map area when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.map_area = ui::map_area(Rect::new(0, 0, width, height));
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Run one interaction through the session
    pub fn apply(&mut self, interaction: Interaction) {
        let region_before = self.session.selection.region.clone();
        let boundaries_toggle = match interaction {
            Interaction::ToggleBoundaries(show) => Some(show),
            _ => None,
        };

        let session = std::mem::take(&mut self.session);
        self.session = session.apply(interaction, &self.dataset.records);

        let region = &self.session.selection.region;
        if *region != region_before {
            self.authority_options = authority_options(&self.dataset.records, region);
            self.cursors.authority = self.cursors.authority.min(self.authority_options.len());
        }
        match boundaries_toggle {
            Some(true) if self.boundaries.is_none() => self.load_boundaries(),
            // A load error only matters while the overlay is wanted
            Some(false) => self.status = None,
            _ => {}
        }
        if let Some(idx) = self.popup {
            let still_shown = self
                .dataset
                .records
                .get(idx)
                .is_some_and(|r| self.session.selection.matches(r));
            if !still_shown {
                self.popup = None;
            }
        }
    }

    fn load_boundaries(&mut self) {
        match load_boundaries(&self.boundaries_path) {
            Ok(set) => {
                self.boundaries = Some(set);
                self.status = None;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.boundaries_path.display(),
                    "boundary overlay unavailable"
                );
                self.status = Some(format!("Hranice krajů nelze načíst: {e}"));
            }
        }
    }

    /// Start a fresh session, keeping loaded data
    pub fn reset(&mut self) {
        self.session = Session::new();
        self.authority_options = authority_options(&self.dataset.records, &RegionChoice::All);
        self.cursors = Cursors::default();
        self.popup = None;
        self.status = None;
    }

    /// Schools passing the current filters
    pub fn visible_schools(&self) -> Vec<&SchoolRecord> {
        filter(&self.dataset.records, &self.session.selection)
    }

    /// Compose the map for the current session
    pub fn rendered_map(&self) -> RenderedMap<'_> {
        self.renderer.render(
            &self.visible_schools(),
            &self.catalog,
            &self.session.viewport,
            self.session.show_boundaries,
            self.boundaries.as_ref(),
        )
    }

    /// Projection of the session viewport onto the map area
    pub fn projection(&self) -> Viewport {
        Viewport::from_state(
            &self.session.viewport,
            self.map_area.width as usize * 2,
            self.map_area.height as usize * 4,
        )
    }

    // Region selector options: "All" then regions in first-seen order
    pub fn region_choice(&self, index: usize) -> Option<RegionChoice> {
        match index {
            0 => Some(RegionChoice::All),
            i => self.catalog.regions().get(i - 1).cloned().map(RegionChoice::Named),
        }
    }

    fn list_len(&self, focus: Focus) -> usize {
        match focus {
            Focus::Regions => self.catalog.regions().len() + 1,
            Focus::Authorities => self.authority_options.len() + 1,
            Focus::Types => self.catalog.type_values().len() + 1,
            Focus::Boundaries | Focus::Map => 0,
        }
    }

    fn cursor_mut(&mut self, focus: Focus) -> Option<&mut usize> {
        match focus {
            Focus::Regions => Some(&mut self.cursors.region),
            Focus::Authorities => Some(&mut self.cursors.authority),
            Focus::Types => Some(&mut self.cursors.school_type),
            Focus::Boundaries | Focus::Map => None,
        }
    }

    /// Move the cursor of the focused list
    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.list_len(self.focus);
        if let Some(cursor) = self.cursor_mut(self.focus) {
            let max = len.saturating_sub(1) as i64;
            *cursor = (*cursor as i64 + i64::from(delta)).clamp(0, max) as usize;
        }
    }

    /// Activate the item under the cursor of the focused pane
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Boundaries => {
                let show = !self.session.show_boundaries;
                self.apply(Interaction::ToggleBoundaries(show));
            }
            Focus::Regions => {
                if let Some(region) = self.region_choice(self.cursors.region) {
                    self.apply(Interaction::SelectRegion(region));
                }
            }
            Focus::Authorities => {
                let picks = toggled(
                    &self.session.selection.authorities,
                    &self.authority_options,
                    self.cursors.authority,
                );
                self.apply(Interaction::SetAuthorities(picks));
            }
            Focus::Types => {
                let picks = toggled(
                    &self.session.selection.types,
                    self.catalog.type_values(),
                    self.cursors.school_type,
                );
                self.apply(Interaction::SetTypes(picks));
            }
            Focus::Map => self.open_popup_at_center(),
        }
    }

    /// Pan the map by a dot delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let center = self.projection().panned(dx, dy);
        let zoom = self.session.viewport.zoom;
        self.apply(Interaction::MapMoved { center, zoom });
    }

    /// Zoom by `steps` levels around the map center
    pub fn zoom(&mut self, steps: i8) {
        let vp = self.projection();
        let (center, zoom) = vp.zoomed_at(vp.width as i32 / 2, vp.height as i32 / 2, steps);
        self.apply(Interaction::MapMoved { center, zoom });
    }

    /// Zoom by `steps` levels keeping the point under a terminal cell fixed
    pub fn zoom_at(&mut self, col: u16, row: u16, steps: i8) {
        if let Some((px, py)) = self.cell_to_dots(col, row) {
            let (center, zoom) = self.projection().zoomed_at(px, py, steps);
            self.apply(Interaction::MapMoved { center, zoom });
        }
    }

    /// Terminal cell to map dot coordinates, None outside the map
    fn cell_to_dots(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.map_area;
        let inside_x = col >= area.x && col < area.x + area.width;
        let inside_y = row >= area.y && row < area.y + area.height;
        (inside_x && inside_y)
            .then(|| (i32::from(col - area.x) * 2 + 1, i32::from(row - area.y) * 4 + 2))
    }

    /// Pan by a dot delta when the pointer is over the map
    pub fn pan_at(&mut self, col: u16, row: u16, dx: i32, dy: i32) {
        if self.cell_to_dots(col, row).is_some() {
            self.pan(dx, dy);
        }
    }

    /// Mouse button pressed; only presses on the map start a drag or click
    pub fn mouse_down(&mut self, col: u16, row: u16) {
        self.last_mouse = self.cell_to_dots(col, row).map(|_| (col, row));
        self.dragged = false;
    }

    /// Handle mouse drag
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        let Some((last_x, last_y)) = self.last_mouse else {
            return;
        };
        let dx = i32::from(last_x) - i32::from(col);
        let dy = i32::from(last_y) - i32::from(row);
        if dx != 0 || dy != 0 {
            self.dragged = true;
            self.pan(dx * 2, dy * 4);
        }
        self.last_mouse = Some((col, row));
    }

    /// Mouse button released: a click without drag opens a popup
    pub fn mouse_up(&mut self, col: u16, row: u16) {
        if !self.dragged && self.last_mouse.is_some() {
            self.open_popup_at(col, row);
        }
        self.last_mouse = None;
        self.dragged = false;
    }

    fn open_popup_at_center(&mut self) {
        let area = self.map_area;
        self.open_popup_at(area.x + area.width / 2, area.y + area.height / 2);
    }

    /// Open the popup of the visible school nearest a terminal cell
    pub fn open_popup_at(&mut self, col: u16, row: u16) {
        let Some((px, py)) = self.cell_to_dots(col, row) else {
            return;
        };
        let vp = self.projection();
        let target = vp.unproject(px, py);
        let max_km = PICK_RADIUS_CELLS * 2.0 / vp.dots_per_km();

        let selection = &self.session.selection;
        let grid = SpatialGrid::build(
            self.dataset
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| selection.matches(r))
                .map(|(i, r)| (r.coordinates, i)),
            0.05,
        );
        self.popup = grid.nearest(target, max_km).copied();
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn popup_school(&self) -> Option<&SchoolRecord> {
        self.popup.and_then(|idx| self.dataset.records.get(idx))
    }
}

/// Picks after toggling the option under `cursor` (0 is "All")
fn toggled(current: &Picks, options: &[String], cursor: usize) -> Picks {
    let mut picks = current.clone();
    match cursor {
        0 => picks.toggle_all(),
        i => {
            if let Some(value) = options.get(i - 1) {
                picks.toggle(value);
            }
        }
    }
    picks
}
