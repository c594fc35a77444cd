//! Relay module - passthrough for organizing long wire runs

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// Forwards whatever arrives on its input straight out its output, at the
/// arrival depth. Disabling it turns the relay into a dead end.
pub struct Relay {
    pub input: PortId,
    pub output: PortId,
    pub enabled: bool,
    passes: u64,
}

impl Relay {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            input: graph.register("Input", Vec2::new(0.0, 30.0)),
            output: graph.register("Output", Vec2::new(60.0, 30.0)),
            enabled: true,
            passes: 0,
        }
    }

    /// How many payloads have been forwarded so far
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl ModuleBehavior for Relay {
    fn title(&self) -> &str {
        "Relay"
    }

    fn ports(&self) -> Vec<PortId> {
        vec![self.input, self.output]
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        if port != self.input || !self.enabled {
            return Vec::new();
        }
        self.passes += 1;
        vec![Emission::new(self.output, payload.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_input_to_output() {
        let mut graph = Graph::new();
        let mut relay = Relay::new(&mut graph);
        let input = relay.input;

        let payload = Payload::Scalars(vec![1.0]);
        let emissions = relay.on_data_arrived(input, &payload, 0);
        assert_eq!(emissions, vec![Emission::new(relay.output, payload)]);
        assert_eq!(relay.passes(), 1);
    }

    #[test]
    fn test_disabled_relay_drops() {
        let mut graph = Graph::new();
        let mut relay = Relay::new(&mut graph);
        relay.enabled = false;
        let input = relay.input;

        assert!(relay
            .on_data_arrived(input, &Payload::Scalars(vec![1.0]), 0)
            .is_empty());
        assert_eq!(relay.passes(), 0);
    }

    #[test]
    fn test_output_arrivals_do_not_bounce() {
        let mut graph = Graph::new();
        let mut relay = Relay::new(&mut graph);
        let output = relay.output;

        assert!(relay
            .on_data_arrived(output, &Payload::Scalars(vec![1.0]), 0)
            .is_empty());
    }
}
