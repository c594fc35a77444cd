//! Debug module - records what arrives for inspection

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// One recorded arrival
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub depth: u32,
    pub payload: Payload,
}

/// Keeps a bounded history of every payload reaching its input, together
/// with the hop count it arrived at. Forwards nothing.
pub struct DebugSink {
    pub input: PortId,
    history: Vec<Arrival>,
    max_history: usize,
}

impl DebugSink {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            input: graph.register("Input", Vec2::new(0.0, 30.0)),
            history: Vec::new(),
            max_history: 100,
        }
    }

    pub fn arrivals(&self) -> &[Arrival] {
        &self.history
    }

    pub fn last(&self) -> Option<&Arrival> {
        self.history.last()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl ModuleBehavior for DebugSink {
    fn title(&self) -> &str {
        "Debug"
    }

    fn ports(&self) -> Vec<PortId> {
        vec![self.input]
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, depth: u32) -> Vec<Emission> {
        if port == self.input {
            if self.history.len() == self.max_history {
                self.history.remove(0);
            }
            self.history.push(Arrival {
                depth,
                payload: payload.clone(),
            });
        }
        Vec::new()
    }
}
