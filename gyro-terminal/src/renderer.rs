/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use gyro_core::lighting::{luminance, shade};
use gyro_core::{Camera, DrawItem, LightSource, Mesh, Rgb, Triangle};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// How triangles are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// ASCII renderer that converts lit 3D meshes to coloured terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Glyph at a cell, `None` outside the buffer
    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.char_buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Number of cells something was drawn into
    pub fn covered(&self) -> usize {
        self.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    /// Rows of the character buffer without colour
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        item: &DrawItem,
        lights: &[LightSource],
        camera: &Camera,
        mode: PolygonMode,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, item, lights, camera, mode);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        item: &DrawItem,
        lights: &[LightSource],
        camera: &Camera,
        mode: PolygonMode,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            let eye = item.model_view.transform_point(&vertex.position);
            match camera.project(&eye, self.width as u32, self.height as u32) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Flat shading at the centroid, in eye space
        let centroid = item.model_view.transform_point(&triangle.centroid());
        let normal = item.model_view.transform_vector(&triangle.mean_normal());
        let color = shade(&item.material, &centroid, &normal, lights);
        let (character, color) = glyph(&color);

        match mode {
            PolygonMode::Fill => self.rasterize_triangle(&screen_coords, character, color),
            PolygonMode::Line => {
                for i in 0..3 {
                    self.draw_edge(screen_coords[i], screen_coords[(i + 1) % 3], character, color);
                }
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    /// Bresenham line with linearly interpolated depth
    fn draw_edge(&mut self, from: (f32, f32, f32), to: (f32, f32, f32), character: char, color: Color) {
        let (mut x0, mut y0) = (from.0.floor() as i32, from.1.floor() as i32);
        let (x1, y1) = (to.0.floor() as i32, to.1.floor() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0;
        loop {
            let depth = from.2 + (to.2 - from.2) * (step / steps).min(1.0);
            self.plot(x0, y0, depth, character, color);

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1.0;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        writer.queue(ResetColor)?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if color != current {
                    writer.queue(SetForegroundColor(color))?;
                    current = color;
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Ramp character and terminal colour for a shaded colour
fn glyph(color: &Rgb) -> (char, Color) {
    let brightness = luminance(color).max(0.0).sqrt();
    let top = LUMINOSITY_RAMP.len() - 1;
    // Lit surfaces never vanish into the background
    let index = ((brightness * top as f32).round() as usize).clamp(1, top);

    let channel = |c: f32| (c.clamp(0.0, 1.0).sqrt() * 255.0).round() as u8;
    let color = Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    };
    (LUMINOSITY_RAMP[index], color)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
