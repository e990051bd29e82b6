/// Character-grid line rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wire3d_core::{Surface, Viewport};

/// Rows are drawn at half resolution: terminal cells are about twice as tall as wide
pub const ROW_SCALE: f64 = 2.0;

/// A [`Surface`] that rasterizes line paths into terminal cells
pub struct CharSurface {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    stroke: Color,
    background: Color,
    path: Vec<((f64, f64), (f64, f64))>,
    pen: Option<(f64, f64)>,
}

impl CharSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
            stroke: Color::Green,
            background: Color::Black,
            path: Vec::new(),
            pen: None,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        (column < self.width && row < self.height).then(|| self.char_buffer[row * self.width + column])
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.char_buffer[y * self.width + x] = glyph;
        }
    }

    /// Bresenham over cells, after clipping to the visible area
    fn rasterize(&mut self, start: (f64, f64), end: (f64, f64)) {
        let (sx, sy) = (start.0, start.1 / ROW_SCALE);
        let (ex, ey) = (end.0, end.1 / ROW_SCALE);
        let bounds = (self.width as f64 - 1.0, self.height as f64 - 1.0);
        let Some(((x0, y0), (x1, y1))) = clip_segment((sx, sy), (ex, ey), bounds) else {
            return;
        };

        let glyph = line_glyph(x1 - x0, y1 - y0);
        let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
        let (x1, y1) = (x1.round() as i64, y1.round() as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let step_x = if x < x1 { 1 } else { -1 };
        let step_y = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, glyph);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(self.background))?;
        writer.queue(SetForegroundColor(self.stroke))?;
        for y in 0..self.height {
            let row: String = self.char_buffer[y * self.width..(y + 1) * self.width]
                .iter()
                .collect();
            writer.queue(Print(row))?;
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for CharSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f64, self.height as f64 * ROW_SCALE)
    }

    fn clear(&mut self, color: &str) {
        self.background = parse_color(color).unwrap_or(Color::Black);
        self.char_buffer.fill(' ');
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.stroke = parse_color(color).unwrap_or(Color::Green);
    }

    /// Cells have a fixed width
    fn set_stroke_width(&mut self, _width: f64) {}

    fn begin_path(&mut self) {
        self.path.clear();
        self.pen = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.pen = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(start) = self.pen {
            self.path.push((start, (x, y)));
        }
        self.pen = Some((x, y));
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        for (start, end) in &path {
            self.rasterize(*start, *end);
        }
        self.path = path;
    }
}

/// Parse `#rrggbb` into a terminal colour
pub fn parse_color(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Pick a glyph that follows the segment's slope (y grows downward)
fn line_glyph(dx: f64, dy: f64) -> char {
    if dx == 0.0 && dy == 0.0 {
        return '*';
    }
    let angle = dy.atan2(dx).to_degrees().rem_euclid(180.0);
    match angle {
        a if !(22.5..157.5).contains(&a) => '-',
        a if a < 67.5 => '\\',
        a if a < 112.5 => '|',
        _ => '/',
    }
}

/// Liang-Barsky clip of a segment to `[0, max.0] x [0, max.1]`
fn clip_segment(
    start: (f64, f64),
    end: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if max.0 < 0.0 || max.1 < 0.0 {
        return None;
    }
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let checks = [
        (-dx, start.0),
        (dx, max.0 - start.0),
        (-dy, start.1),
        (dy, max.1 - start.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        (start.0 + t0 * dx, start.1 + t0 * dy),
        (start.0 + t1 * dx, start.1 + t1 * dy),
    ))
}
