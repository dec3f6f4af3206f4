use crate::app::{App, Focus};
use crate::braille::BrailleCanvas;
use crate::catalog::Rgb;
use crate::data::SchoolRecord;
use crate::filter::Picks;
use crate::geo::LatLon;
use crate::map::{
    draw_circle, draw_linestring, Popup, RenderedMap, Viewport, BOUNDARY_LAYER_NAME,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Widget, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 36;

const KEY_HELP: &str =
    " | Tab:panel ↑↓:výběr Space:přepnout hjkl:posun +/-:zoom Enter:detail r:reset q:konec";

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Split the screen into sidebar, map and status bar
fn layout(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(rows[0]);
    (cols[0], cols[1], rows[1])
}

/// Inner map area (inside its border) for a given screen size
pub fn map_area(screen: Rect) -> Rect {
    let (_, map, _) = layout(screen);
    Block::default().borders(Borders::ALL).inner(map)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let (sidebar, map, status) = layout(frame.area());

    render_sidebar(frame, app, sidebar);
    render_map(frame, app, map);
    render_status_bar(frame, app, status);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        ))
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let legend = legend_lines(app.catalog.authority_colors(), area.width.saturating_sub(2));
    let legend_height = legend.len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Min(4),
            Constraint::Length(legend_height),
        ])
        .split(area);

    // Boundary checkbox
    let checked = app.session.show_boundaries;
    let checkbox = Paragraph::new(Line::from(vec![
        Span::styled(
            if checked { "[x] " } else { "[ ] " },
            Style::default().fg(if checked { Color::Green } else { Color::DarkGray }),
        ),
        Span::raw("Zobrazit hranice krajů"),
    ]))
    .block(pane_block("Vrstvy", app.focus == Focus::Boundaries));
    frame.render_widget(checkbox, chunks[0]);

    // Region single-select
    let selected_region = &app.session.selection.region;
    let regions: Vec<ListItem> = std::iter::once("All")
        .chain(app.catalog.regions().iter().map(String::as_str))
        .enumerate()
        .map(|(i, label)| {
            let on = app.region_choice(i).as_ref() == Some(selected_region);
            ListItem::new(format!("{} {label}", if on { "(•)" } else { "( )" }))
        })
        .collect();
    render_list(
        frame,
        chunks[1],
        "Vyber kraj",
        regions,
        app.cursors.region,
        app.focus == Focus::Regions,
    );

    // Authority multi-select, scoped to the region
    let authorities = multi_items(
        &app.session.selection.authorities,
        &app.authority_options,
        |name| app.catalog.color_of(name).map(color),
    );
    render_list(
        frame,
        chunks[2],
        "Vyber zřizovatele školy",
        authorities,
        app.cursors.authority,
        app.focus == Focus::Authorities,
    );

    // Type multi-select
    let types = multi_items(&app.session.selection.types, app.catalog.type_values(), |_| None);
    render_list(
        frame,
        chunks[3],
        "Vyber typ školy",
        types,
        app.cursors.school_type,
        app.focus == Focus::Types,
    );

    // Authority colors
    frame.render_widget(Paragraph::new(legend).block(pane_block("Legenda", false)), chunks[4]);
}

/// Every authority with its swatch, packed into rows of at most `width` cells
fn legend_lines(entries: &[(String, Rgb)], width: u16) -> Vec<Line<'_>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0;

    for (name, rgb) in entries {
        let entry_width = name.chars().count() + 3;
        if used > 0 && used + entry_width > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }
        spans.push(Span::styled("● ", Style::default().fg(color(*rgb))));
        spans.push(Span::raw(name.as_str()));
        spans.push(Span::raw(" "));
        used += entry_width;
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

fn multi_items<'a>(
    picks: &Picks,
    options: &'a [String],
    swatch: impl Fn(&str) -> Option<Color>,
) -> Vec<ListItem<'a>> {
    let all = ListItem::new(format!("{} All", if picks.all { "[x]" } else { "[ ]" }));
    std::iter::once(all)
        .chain(options.iter().map(|value| {
            let mark = if picks.values.contains(value) { "[x]" } else { "[ ]" };
            let mut spans = vec![Span::raw(format!("{mark} "))];
            if let Some(c) = swatch(value.as_str()) {
                spans.push(Span::styled("● ", Style::default().fg(c)));
            }
            spans.push(Span::raw(value.as_str()));
            ListItem::new(Line::from(spans))
        }))
        .collect()
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    cursor: usize,
    focused: bool,
) {
    let highlight = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(pane_block(title, focused))
        .highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = pane_block("Vizualizace informací z rejstříku škol", app.focus == Focus::Map);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let viewport = Viewport::new(
        app.session.viewport.center,
        app.session.viewport.zoom,
        inner.width as usize * 2,
        inner.height as usize * 4,
    );
    let map_widget = MapWidget {
        map: app.rendered_map(),
        viewport,
    };
    frame.render_widget(map_widget, inner);

    if let Some(school) = app.popup_school() {
        render_popup(frame, school, inner);
    }
}

/// Custom widget that rasterizes a [`RenderedMap`] into Braille layers
struct MapWidget<'a> {
    map: RenderedMap<'a>,
    viewport: Viewport,
}

impl MapWidget<'_> {
    fn canvas(&self, area: Rect) -> BrailleCanvas {
        BrailleCanvas::new(area.width as usize, area.height as usize)
    }

    /// Copy a canvas into the buffer with a specific color
    fn render_layer(&self, canvas: &BrailleCanvas, fg: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..canvas.height().min(area.height as usize) {
            for col in 0..canvas.width().min(area.width as usize) {
                if let Some(ch) = canvas.glyph(col, row) {
                    buf[(area.x + col as u16, area.y + row as u16)].set_char(ch).set_fg(fg);
                }
            }
        }
    }

    /// Lat/lon grid lines across the visible area
    fn graticule(&self, area: Rect) -> BrailleCanvas {
        let mut canvas = self.canvas(area);
        let step = self.map.base.graticule_step;
        let nw = self.viewport.unproject(0, 0);
        let se = self.viewport.unproject(self.viewport.width as i32, self.viewport.height as i32);

        let lines = ((se.lon - nw.lon) / step) + ((nw.lat - se.lat) / step);
        if !(0.0..=200.0).contains(&lines) {
            return canvas;
        }

        let mut lon = (nw.lon / step).ceil() * step;
        while lon <= se.lon {
            draw_linestring(&mut canvas, &vec![(lon, nw.lat), (lon, se.lat)], &self.viewport, 1);
            lon += step;
        }
        let mut lat = (se.lat / step).ceil() * step;
        while lat <= nw.lat {
            // Parallels are straight under Mercator
            draw_linestring(&mut canvas, &vec![(nw.lon, lat), (se.lon, lat)], &self.viewport, 1);
            lat += step;
        }
        canvas
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // 1. Base layer (back)
        let base = self.graticule(area);
        self.render_layer(&base, Color::Indexed(236), area, buf);

        // 2. Overlays
        for overlay in &self.map.overlays {
            let mut canvas = self.canvas(area);
            for ring in overlay.boundaries.rings() {
                draw_linestring(&mut canvas, ring, &self.viewport, overlay.style.weight);
            }
            self.render_layer(&canvas, color(overlay.style.color), area, buf);
        }

        // 3. Markers, one filled-circle canvas per color
        let mut layers: Vec<(Rgb, BrailleCanvas)> = Vec::new();
        for marker in &self.map.markers {
            let (px, py) = self.viewport.project(marker.position);
            if !self.viewport.is_visible(px, py) {
                continue;
            }
            let idx = match layers.iter().position(|(c, _)| *c == marker.fill_color) {
                Some(idx) => idx,
                None => {
                    layers.push((marker.fill_color, self.canvas(area)));
                    layers.len() - 1
                }
            };
            // A Braille dot is about four screen pixels wide
            let radius = (marker.radius as i32 / 4).max(1);
            draw_circle(&mut layers[idx].1, px, py, radius);
        }
        for (rgb, canvas) in &layers {
            self.render_layer(canvas, color(*rgb), area, buf);
        }

        // 4. Layer control
        if self.map.layer_control && area.width > 20 {
            let label = format!("▣ {BOUNDARY_LAYER_NAME}");
            let width = label.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width + 1);
            buf.set_string(x, area.y, label, Style::default().fg(Color::White).bg(Color::Blue));
        }
    }
}

fn render_popup(frame: &mut Frame, school: &SchoolRecord, map: Rect) {
    let popup = Popup::for_school(school);
    let mut lines = vec![
        Line::from(Span::styled(popup.title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("Zřizovatel: {}", popup.authority),
            Style::default().fg(Color::Yellow),
        )),
    ];
    lines.extend(popup.items.iter().map(|item| Line::from(format!("  • {item}"))));

    let width = map.width.min(50);
    let height = (lines.len() as u16 + 2).min(map.height);
    let area = Rect::new(
        map.x + 1,
        map.y + 1,
        width.saturating_sub(2),
        height.saturating_sub(1).max(1),
    );

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn coords_label(pos: LatLon) -> String {
    format!(
        "{:.3}°{}, {:.3}°{}",
        pos.lat.abs(),
        if pos.lat >= 0.0 { "N" } else { "S" },
        pos.lon.abs(),
        if pos.lon >= 0.0 { "E" } else { "W" }
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.visible_schools().len();
    let vp = &app.session.viewport;

    let mut spans = vec![
        Span::styled(" počet vybraných škol: ", Style::default().fg(Color::DarkGray)),
        Span::styled(count.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(coords_label(vp.center), Style::default().fg(Color::Cyan)),
        Span::styled(format!(" z{}", vp.zoom), Style::default().fg(Color::Magenta)),
    ];
    match &app.status {
        Some(message) => {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::Red)));
        }
        None => spans.push(Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray))),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
