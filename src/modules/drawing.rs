//! Drawing module - a grayscale canvas passed on as one image tensor

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;
use crate::tensor::Tensor;

/// Canvas edge length in cells
pub const CANVAS_SIZE: usize = 128;

const BRUSH_RADIUS: f32 = 5.0;

/// A `CANVAS_SIZE`² intensity grid painted with a soft round brush.
///
/// Each stroke deposits intensity that falls off with distance from the
/// brush center and accumulates up to 1.0 per cell. Passing emits the whole
/// grid as a single `[CANVAS_SIZE, CANVAS_SIZE, 1]` tensor, the shape an
/// image-input model expects.
pub struct DrawingPad {
    pub output: PortId,
    cells: Vec<f32>,
}

impl DrawingPad {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            output: graph.register("Output tensor", Vec2::new(250.0, 370.0)),
            cells: vec![0.0; CANVAS_SIZE * CANVAS_SIZE],
        }
    }

    /// Intensity of one cell, row `y` from the bottom
    pub fn cell(&self, x: usize, y: usize) -> Option<f32> {
        if x >= CANVAS_SIZE || y >= CANVAS_SIZE {
            return None;
        }
        Some(self.cells[y * CANVAS_SIZE + x])
    }

    fn paint_cell(&mut self, x: f32, y: f32, amount: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= CANVAS_SIZE || y >= CANVAS_SIZE {
            return;
        }
        let cell = &mut self.cells[y * CANVAS_SIZE + x];
        *cell = (*cell + amount).min(1.0);
    }

    /// Deposits one brush stamp centered at `at` (canvas cell coordinates)
    pub fn stroke(&mut self, at: Vec2) {
        let mut theta = 0.0f32;
        while theta < std::f32::consts::TAU {
            let mut r = 0.0f32;
            while r < BRUSH_RADIUS {
                let x = at.x + theta.cos() * r;
                let y = at.y + theta.sin() * r;
                self.paint_cell(x.floor(), y.floor(), BRUSH_RADIUS - r);
                r += 0.5;
            }
            theta += 0.1;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Emits the canvas as one image tensor
    pub fn pass(&self) -> Vec<Emission> {
        match Tensor::from_shape(&[CANVAS_SIZE, CANVAS_SIZE, 1], self.cells.clone()) {
            Ok(image) => vec![Emission::new(self.output, Payload::Tensors(vec![image]))],
            Err(_) => Vec::new(),
        }
    }
}

impl ModuleBehavior for DrawingPad {
    fn title(&self) -> &str {
        "Drawing"
    }

    fn ports(&self) -> Vec<PortId> {
        vec![self.output]
    }

    fn on_data_arrived(&mut self, _port: PortId, _payload: &Payload, _depth: u32) -> Vec<Emission> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_saturates_center() {
        let mut graph = Graph::new();
        let mut pad = DrawingPad::new(&mut graph);
        pad.stroke(Vec2::new(64.0, 64.0));

        assert_eq!(pad.cell(64, 64), Some(1.0));
        // far away cells stay untouched
        assert_eq!(pad.cell(0, 0), Some(0.0));
    }

    #[test]
    fn test_stroke_near_edge_stays_in_bounds() {
        let mut graph = Graph::new();
        let mut pad = DrawingPad::new(&mut graph);
        pad.stroke(Vec2::new(0.0, 0.0));
        pad.stroke(Vec2::new(127.9, 127.9));
        assert_eq!(pad.cell(0, 0), Some(1.0));
    }

    #[test]
    fn test_pass_emits_image_tensor() {
        let mut graph = Graph::new();
        let mut pad = DrawingPad::new(&mut graph);
        pad.stroke(Vec2::new(10.0, 20.0));

        let emissions = pad.pass();
        assert_eq!(emissions.len(), 1);
        let tensors = emissions[0].payload.as_tensors().unwrap();
        assert_eq!(tensors.len(), 1);
        assert_eq!(tensors[0].shape(), &[CANVAS_SIZE, CANVAS_SIZE, 1]);
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut graph = Graph::new();
        let mut pad = DrawingPad::new(&mut graph);
        pad.stroke(Vec2::new(64.0, 64.0));
        pad.clear();
        assert_eq!(pad.cell(64, 64), Some(0.0));
    }
}
