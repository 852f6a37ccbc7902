//! Shape rasterization
//!
//! All shapes are filled with their solid color, pixels that fall outside
//! of the canvas are dropped by the canvas itself.
use crate::{Canvas, Circle, Command, RGB, Rectangle, Triangle};

/// Anything that can be rasterized onto a canvas
pub trait Draw {
    fn draw(&self, canvas: &mut Canvas);
}

impl Draw for Rectangle {
    fn draw(&self, canvas: &mut Canvas) {
        let x0 = self.x as i64;
        let x1 = x0 + self.width as i64;
        let y0 = (self.y as i64).max(0);
        let y1 = (self.y as i64 + self.height as i64).min(canvas.height() as i64);
        for row in y0..y1 {
            canvas.fill_span(row, x0, x1, self.color);
        }
    }
}

impl Draw for Circle {
    /// Filled with vertical strips `x ± dx` each spanning `y ± sqrt(r^2 - dx^2)`
    fn draw(&self, canvas: &mut Canvas) {
        if self.radius <= 0 {
            return;
        }
        let (x, radius) = (self.x as i64, self.radius as i64);
        let width = canvas.width() as i64;
        // only offsets that land inside the canvas columns
        let right = (-x).max(0)..(width - x).min(radius);
        let left = (x - width + 1).max(1)..(x + 1).min(radius);
        for dx in right {
            self.fill_strip(canvas, x + dx, dx);
        }
        for dx in left {
            self.fill_strip(canvas, x - dx, dx);
        }
    }
}

impl Circle {
    fn fill_strip(&self, canvas: &mut Canvas, col: i64, dx: i64) {
        let (y, radius) = (self.y as i64, self.radius as i64);
        let dy = (radius * radius - dx * dx).isqrt();
        let rows = (y - dy).max(0)..=(y + dy).min(canvas.height() as i64 - 1);
        for row in rows {
            canvas.write_pixel(col, row, self.color);
        }
    }
}

/// Triangle edge going down from `(x, y)` with `slope = dx/dy`
#[derive(Debug, Clone, Copy)]
struct Edge {
    x: f64,
    y: i64,
    slope: f64,
}

impl Edge {
    fn new((x0, y0): (i64, i64), (x1, y1): (i64, i64)) -> Self {
        // horizontal edges never need interpolation
        let slope = if y1 > y0 {
            (x1 - x0) as f64 / (y1 - y0) as f64
        } else {
            0.0
        };
        Self {
            x: x0 as f64,
            y: y0,
            slope,
        }
    }

    fn x_at(&self, row: i64) -> f64 {
        self.x + (row - self.y) as f64 * self.slope
    }
}

/// Fill rows `y0..=y1` between two edges
fn fill_between(canvas: &mut Canvas, y0: i64, y1: i64, e0: Edge, e1: Edge, color: RGB) {
    let y0 = y0.max(0);
    let y1 = y1.min(canvas.height() as i64 - 1);
    for row in y0..=y1 {
        let (x0, x1) = (e0.x_at(row), e1.x_at(row));
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        canvas.fill_span(row, x0 as i64, x1 as i64, color);
    }
}

impl Draw for Triangle {
    /// Scanline fill of the upper (top to mid) and lower (mid to bottom) halves
    fn draw(&self, canvas: &mut Canvas) {
        let mut vertices = self.vertices().map(|(x, y)| (x as i64, y as i64));
        // stable, so vertices on the same row keep their order
        vertices.sort_by_key(|(_, y)| *y);
        let [top, mid, bottom] = vertices;
        let top_mid = Edge::new(top, mid);
        let top_bottom = Edge::new(top, bottom);
        let mid_bottom = Edge::new(mid, bottom);
        fill_between(canvas, top.1, mid.1, top_mid, top_bottom, self.color);
        fill_between(canvas, mid.1, bottom.1, mid_bottom, top_bottom, self.color);
    }
}

impl Draw for Command {
    fn draw(&self, canvas: &mut Canvas) {
        match self {
            Command::Rectangle(rect) => rect.draw(canvas),
            Command::Circle(circle) => circle.draw(canvas),
            Command::Triangle(triangle) => triangle.draw(canvas),
        }
    }
}

/// Rasterize single command onto the canvas
pub fn draw_command(canvas: &mut Canvas, command: &Command) {
    tracing::trace!("[draw] {}", command);
    command.draw(canvas)
}
