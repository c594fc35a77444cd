//! Range input module - mesh grids over a numeric range

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// Generates `range(start, end, step)` and, for dimension d, the full
/// d-dimensional grid over it, emitting one coordinate series per output
/// port. A 2D range with n steps emits two series of n*n values covering
/// every grid cell.
pub struct RangeInput {
    pub outputs: Vec<PortId>,
    pub start: f32,
    pub end: f32,
    pub step: f32,
    dimension: usize,
    title: String,
}

impl RangeInput {
    pub fn new(graph: &mut Graph, dimension: usize) -> Self {
        let outputs = (0..dimension)
            .map(|i| {
                graph.register(
                    format!("Output {}", i),
                    Vec2::new(200.0 + 100.0 * i as f32, 150.0),
                )
            })
            .collect();
        Self {
            outputs,
            start: 0.0,
            end: 80.0,
            step: 0.5,
            dimension,
            title: format!("Range {}D", dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The base series the grid is built from
    pub fn steps(&self) -> Vec<f32> {
        let mut values = Vec::new();
        let mut v = self.start;
        while v < self.end {
            values.push(v);
            v += self.step;
        }
        values
    }

    /// Emits the grid coordinate series, one per output port
    pub fn pass(&self) -> Vec<Emission> {
        let range = self.steps();
        let total = range.len().pow(self.dimension as u32);

        let mut series = vec![Vec::with_capacity(total); self.dimension];
        for i in 0..total {
            let mut index = i;
            for axis in 0..self.dimension {
                series[axis].push(range[index % range.len()]);
                index /= range.len();
            }
        }

        self.outputs
            .iter()
            .zip(series)
            .map(|(&port, values)| Emission::new(port, Payload::Scalars(values)))
            .collect()
    }
}

impl ModuleBehavior for RangeInput {
    fn title(&self) -> &str {
        &self.title
    }

    fn ports(&self) -> Vec<PortId> {
        self.outputs.clone()
    }

    fn on_data_arrived(&mut self, _port: PortId, _payload: &Payload, _depth: u32) -> Vec<Emission> {
        Vec::new()
    }
}
