//! Pack module - combines per-axis scalar series into tensor samples

use std::collections::VecDeque;

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;
use crate::tensor::Tensor;

/// Buffers one scalar FIFO per input port and, once every port has data,
/// drains them in lock-step: each step pops one value per port and packs
/// the row into a rank-1 tensor. All rows completed by a single arrival are
/// emitted together as one tensor batch on the output port.
///
/// An axis that runs ahead simply keeps its surplus buffered until the
/// other axes catch up.
pub struct TensorPack {
    pub inputs: Vec<PortId>,
    pub output: PortId,
    buffers: Vec<VecDeque<f32>>,
    dimension: usize,
}

impl TensorPack {
    pub fn new(graph: &mut Graph, dimension: usize) -> Self {
        let inputs = (0..dimension)
            .map(|i| {
                graph.register(
                    format!("Input {}", i),
                    Vec2::new(0.0, 80.0 + 50.0 * i as f32),
                )
            })
            .collect();
        let height = dimension as f32 * 50.0 + 140.0;
        Self {
            inputs,
            output: graph.register("Output", Vec2::new(150.0, height / 2.0)),
            buffers: vec![VecDeque::new(); dimension],
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of values waiting on one input port
    pub fn buffered(&self, axis: usize) -> usize {
        self.buffers.get(axis).map_or(0, VecDeque::len)
    }

    /// Drops everything buffered so far
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }

    fn drain_lock_step(&mut self) -> Vec<Tensor> {
        let mut rows = Vec::new();
        while self.buffers.iter().all(|b| !b.is_empty()) {
            let row: Vec<f32> = self
                .buffers
                .iter_mut()
                .filter_map(VecDeque::pop_front)
                .collect();
            rows.push(Tensor::from_vec(row));
        }
        rows
    }
}

impl ModuleBehavior for TensorPack {
    fn title(&self) -> &str {
        "Pack"
    }

    fn ports(&self) -> Vec<PortId> {
        let mut ports = self.inputs.clone();
        ports.push(self.output);
        ports
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        let Some(axis) = self.inputs.iter().position(|&p| p == port) else {
            return Vec::new();
        };
        let Some(values) = payload.as_scalars() else {
            return Vec::new();
        };

        self.buffers[axis].extend(values);

        let rows = self.drain_lock_step();
        if rows.is_empty() {
            return Vec::new();
        }
        vec![Emission::new(self.output, Payload::Tensors(rows))]
    }
}
