//! Argmax module - reduces tensor samples to their winning index

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// Maps each arriving rank-1 tensor to the index of its largest value and
/// forwards the indices as a scalar series at the arrival depth. Samples
/// whose last-axis reduction is not a single number are skipped.
pub struct Argmax {
    pub input: PortId,
    pub output: PortId,
}

impl Argmax {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            input: graph.register("Input tensor", Vec2::new(0.0, 100.0)),
            output: graph.register("Output", Vec2::new(200.0, 100.0)),
        }
    }
}

impl ModuleBehavior for Argmax {
    fn title(&self) -> &str {
        "Argmax"
    }

    fn ports(&self) -> Vec<PortId> {
        vec![self.input, self.output]
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        if port != self.input {
            return Vec::new();
        }
        let Some(tensors) = payload.as_tensors() else {
            return Vec::new();
        };
        if tensors.is_empty() {
            return Vec::new();
        }

        let indices = tensors
            .iter()
            .filter_map(|t| t.argmax_last_axis())
            .map(|i| i as f32)
            .collect();
        vec![Emission::new(self.output, Payload::Scalars(indices))]
    }
}
