use crate::braille::BrailleCanvas;
use crate::geo::LatLon;
use crate::map::projection::Viewport;
use crate::map::LineString;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a line `weight` dots wide
pub fn draw_weighted_line(
    canvas: &mut BrailleCanvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    weight: u8,
) {
    draw_line(canvas, x0, y0, x1, y1);
    for offset in 1..i32::from(weight) {
        draw_line(canvas, x0 + offset, y0, x1 + offset, y1);
        draw_line(canvas, x0, y0 + offset, x1, y1 + offset);
    }
}

/// Draw a lon/lat line string with viewport culling
pub fn draw_linestring(
    canvas: &mut BrailleCanvas,
    line: &LineString,
    viewport: &Viewport,
    weight: u8,
) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in line {
        let (px, py) = viewport.project(LatLon::new(lat, lon));

        if let Some((prev_x, prev_y)) = prev {
            if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_weighted_line(canvas, prev_x, prev_y, px, py, weight);
            }
        }

        prev = Some((px, py));
    }
}

/// Draw a filled circle
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_weight_thickens() {
        let mut thin = BrailleCanvas::new(5, 2);
        draw_weighted_line(&mut thin, 0, 0, 9, 0, 1);
        let mut thick = BrailleCanvas::new(5, 2);
        draw_weighted_line(&mut thick, 0, 0, 9, 0, 2);
        assert!(thick.dot_count() > thin.dot_count());
    }

    #[test]
    fn test_filled_circle() {
        let mut small = BrailleCanvas::new(4, 2);
        draw_circle(&mut small, 3, 3, 1);
        let mut large = BrailleCanvas::new(4, 2);
        draw_circle(&mut large, 3, 3, 2);
        // Radius 1 covers the center and its four neighbours
        assert_eq!(small.dot_count(), 5);
        assert!(large.dot_count() > small.dot_count());
    }

    #[test]
    fn test_linestring_offscreen_is_culled() {
        let viewport = Viewport::new(LatLon::new(50.0, 15.0), 7, 20, 20);
        let mut canvas = BrailleCanvas::new(10, 5);
        // Far east of the viewport
        draw_linestring(&mut canvas, &vec![(40.0, 50.0), (41.0, 50.0)], &viewport, 2);
        assert_eq!(canvas.dot_count(), 0);
    }
}
