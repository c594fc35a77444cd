//! Print module - shows the most recent value it received

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;

/// Displays the last scalar of an arriving series, or arriving text
/// verbatim. Anything else leaves the display untouched.
pub struct PrintSink {
    pub input: PortId,
    display: String,
}

impl PrintSink {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            input: graph.register("Input", Vec2::new(180.0, 0.0)),
            display: String::new(),
        }
    }

    /// The string currently shown
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl ModuleBehavior for PrintSink {
    fn title(&self) -> &str {
        "Print"
    }

    fn ports(&self) -> Vec<PortId> {
        vec![self.input]
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        if port != self.input {
            return Vec::new();
        }
        match payload {
            Payload::Scalars(values) => {
                if let Some(last) = values.last() {
                    self.display = format!("{}", last);
                }
            }
            Payload::Text(text) => {
                self.display = text.clone();
            }
            Payload::Tensors(_) => {}
        }
        Vec::new()
    }
}
