//! Point output module - plots coordinate series arriving on separate ports

use std::collections::VecDeque;

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// Buffers per-axis scalar series and pairs them up into plottable points.
///
/// Arriving values queue per input port; [`PointOutput::drain`] moves
/// complete pairs (or triples with the depth channel) into the point list.
/// The host calls it on its own display tick, so plotting lags arrivals by
/// design rather than blocking the push that delivered them.
pub struct PointOutput {
    pub input_x: PortId,
    pub input_y: PortId,
    pub input_z: Option<PortId>,
    queue_x: VecDeque<f32>,
    queue_y: VecDeque<f32>,
    queue_z: VecDeque<f32>,
    points: Vec<Vec2>,
    depths: Vec<f32>,
}

impl PointOutput {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            input_x: graph.register("Input X", Vec2::new(250.0, 0.0)),
            input_y: graph.register("Input Y", Vec2::new(350.0, 0.0)),
            input_z: None,
            queue_x: VecDeque::new(),
            queue_y: VecDeque::new(),
            queue_z: VecDeque::new(),
            points: Vec::new(),
            depths: Vec::new(),
        }
    }

    /// Adds the depth channel and its input port
    pub fn with_depth_channel(mut self, graph: &mut Graph) -> Self {
        self.input_z = Some(graph.register("Input Z", Vec2::new(450.0, 0.0)));
        self
    }

    /// Points drained so far
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Depth value per drained point (empty without a depth channel)
    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    /// Number of complete samples waiting to be drained
    pub fn pending(&self) -> usize {
        let pairs = self.queue_x.len().min(self.queue_y.len());
        match self.input_z {
            Some(_) => pairs.min(self.queue_z.len()),
            None => pairs,
        }
    }

    /// Moves up to `max` complete samples from the queues into the point
    /// list, returning how many were moved
    pub fn drain(&mut self, max: usize) -> usize {
        let mut moved = 0;
        while moved < max && self.pending() > 0 {
            let (Some(x), Some(y)) = (self.queue_x.pop_front(), self.queue_y.pop_front()) else {
                break;
            };
            self.points.push(Vec2::new(x, y));
            if self.input_z.is_some() {
                if let Some(z) = self.queue_z.pop_front() {
                    self.depths.push(z.clamp(0.0, super::point_input::DEPTH_MAX));
                }
            }
            moved += 1;
        }
        moved
    }

    pub fn clear(&mut self) {
        self.queue_x.clear();
        self.queue_y.clear();
        self.queue_z.clear();
        self.points.clear();
        self.depths.clear();
    }
}

impl ModuleBehavior for PointOutput {
    fn title(&self) -> &str {
        if self.input_z.is_some() {
            "PointZ Output"
        } else {
            "Point Output"
        }
    }

    fn ports(&self) -> Vec<PortId> {
        let mut ports = vec![self.input_x, self.input_y];
        ports.extend(self.input_z);
        ports
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        let Some(values) = payload.as_scalars() else {
            return Vec::new();
        };
        if port == self.input_x {
            self.queue_x.extend(values);
        } else if port == self.input_y {
            self.queue_y.extend(values);
        } else if Some(port) == self.input_z {
            self.queue_z.extend(values);
        }
        Vec::new()
    }
}
