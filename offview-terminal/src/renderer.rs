/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use offview_core::RenderBuffers;
use std::io::Write;

use crate::camera::Camera;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// How triangle brightness is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Lambert term of the averaged vertex normals against a head-on light.
    Lit,
    /// Nearer surfaces are brighter.
    Depth,
}

/// ASCII renderer that converts render buffers to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn covered_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    pub fn render(
        &mut self,
        buffers: &RenderBuffers,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        shading: Shading,
    ) {
        let mvp = camera.view_projection() * model_matrix;
        let light_dir = Vector3::z();

        'triangles: for tri in buffers.indices.chunks_exact(3) {
            let corners = [
                &buffers.vertices[tri[0] as usize],
                &buffers.vertices[tri[1] as usize],
                &buffers.vertices[tri[2] as usize],
            ];

            let mut screen = [(0.0, 0.0, 0.0); 3];
            for (slot, vertex) in screen.iter_mut().zip(corners) {
                match Camera::project_to_screen(
                    &mvp,
                    &Point3::from(vertex.position),
                    self.width as u32,
                    self.height as u32,
                ) {
                    Some(projected) => *slot = projected,
                    // Triangles crossing the near or far plane are dropped whole.
                    None => continue 'triangles,
                }
            }

            let brightness = match shading {
                Shading::Lit => {
                    let normal: Vector3<f32> = corners
                        .iter()
                        .map(|v| Vector3::from(v.normal))
                        .sum();
                    let world = model_matrix.transform_vector(&normal);
                    match world.try_normalize(1e-6) {
                        Some(n) => n.dot(&light_dir).max(0.0),
                        None => 0.1,
                    }
                }
                Shading::Depth => {
                    let depth = (screen[0].2 + screen[1].2 + screen[2].2) / 3.0;
                    depth_brightness(depth)
                }
            };

            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            // Keep visible faces off the blank character.
            let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
            self.rasterize_triangle(&screen, LUMINOSITY_RAMP[char_index]);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
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

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.char_buffer.chunks(self.width.max(1)) {
            for &c in row {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map normalized device depth to `[0, 1]` brightness. The perspective
/// depth curve crowds the visible range near 1, so spread it back out.
fn depth_brightness(depth: f32) -> f32 {
    let linear = ((1.0 - depth) * 10.0).clamp(0.0, 1.0);
    linear.sqrt()
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
