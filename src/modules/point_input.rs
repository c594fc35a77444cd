//! Point input module - click-collected 2D samples, optionally with depth

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// Largest depth value a point can carry
pub const DEPTH_MAX: f32 = 255.0;

/// Collects 2D points and passes their coordinate series out one port per
/// axis. With the depth channel enabled a third series of per-point depth
/// values is collected and passed alongside.
pub struct PointInput {
    pub output_x: PortId,
    pub output_y: PortId,
    pub output_z: Option<PortId>,
    points: Vec<Vec2>,
    depths: Vec<f32>,
}

impl PointInput {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            output_x: graph.register("Output X", Vec2::new(250.0, 500.0)),
            output_y: graph.register("Output Y", Vec2::new(350.0, 500.0)),
            output_z: None,
            points: Vec::new(),
            depths: Vec::new(),
        }
    }

    /// Adds the depth channel and its output port
    pub fn with_depth_channel(mut self, graph: &mut Graph) -> Self {
        self.output_z = Some(graph.register("Output Z", Vec2::new(450.0, 500.0)));
        self
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Adds a point; with the depth channel on it carries full intensity
    pub fn add_point(&mut self, point: Vec2) {
        self.add_point_with_depth(point, DEPTH_MAX);
    }

    /// Adds a point with an explicit depth, clamped to `[0, DEPTH_MAX]`.
    /// Without a depth channel the depth is ignored.
    pub fn add_point_with_depth(&mut self, point: Vec2, depth: f32) {
        self.points.push(point);
        if self.output_z.is_some() {
            self.depths.push(depth.clamp(0.0, DEPTH_MAX));
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.depths.clear();
    }

    /// Emits one coordinate series per output port
    pub fn pass(&self) -> Vec<Emission> {
        let xs = self.points.iter().map(|p| p.x).collect();
        let ys = self.points.iter().map(|p| p.y).collect();
        let mut emissions = vec![
            Emission::new(self.output_x, Payload::Scalars(xs)),
            Emission::new(self.output_y, Payload::Scalars(ys)),
        ];
        if let Some(output_z) = self.output_z {
            emissions.push(Emission::new(output_z, Payload::Scalars(self.depths.clone())));
        }
        emissions
    }
}

impl ModuleBehavior for PointInput {
    fn title(&self) -> &str {
        if self.output_z.is_some() {
            "PointZ Input"
        } else {
            "Point Input"
        }
    }

    fn ports(&self) -> Vec<PortId> {
        let mut ports = vec![self.output_x, self.output_y];
        ports.extend(self.output_z);
        ports
    }

    fn on_data_arrived(&mut self, _port: PortId, _payload: &Payload, _depth: u32) -> Vec<Emission> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_emits_axis_series() {
        let mut graph = Graph::new();
        let mut module = PointInput::new(&mut graph);
        module.add_point(Vec2::new(1.0, 10.0));
        module.add_point(Vec2::new(2.0, 20.0));

        let emissions = module.pass();
        assert_eq!(emissions.len(), 2);
        assert_eq!(
            emissions[0],
            Emission::new(module.output_x, Payload::Scalars(vec![1.0, 2.0]))
        );
        assert_eq!(
            emissions[1],
            Emission::new(module.output_y, Payload::Scalars(vec![10.0, 20.0]))
        );
    }

    #[test]
    fn test_depth_channel_clamps_and_emits() {
        let mut graph = Graph::new();
        let mut module = PointInput::new(&mut graph).with_depth_channel(&mut graph);
        module.add_point(Vec2::new(0.0, 0.0));
        module.add_point_with_depth(Vec2::new(1.0, 1.0), 400.0);
        module.add_point_with_depth(Vec2::new(2.0, 2.0), -3.0);

        let emissions = module.pass();
        assert_eq!(emissions.len(), 3);
        assert_eq!(
            emissions[2],
            Emission::new(
                module.output_z.unwrap(),
                Payload::Scalars(vec![DEPTH_MAX, DEPTH_MAX, 0.0])
            )
        );
    }

    #[test]
    fn test_clear_resets_all_channels() {
        let mut graph = Graph::new();
        let mut module = PointInput::new(&mut graph).with_depth_channel(&mut graph);
        module.add_point(Vec2::new(1.0, 1.0));
        module.clear();
        assert!(module.points().is_empty());
        assert_eq!(module.pass()[2].payload, Payload::Scalars(vec![]));
    }
}
