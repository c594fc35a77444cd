//! Number select module - a digit chooser emitting one-hot tensors

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;
use crate::tensor::Tensor;

const DIGITS: usize = 10;

/// Single-selection over the digits 0-9. Passing emits the chosen digit as
/// a one-hot rank-1 tensor of length 10; with nothing chosen it emits
/// nothing.
pub struct NumberSelect {
    pub output: PortId,
    chosen: Option<u8>,
}

impl NumberSelect {
    pub fn new(graph: &mut Graph) -> Self {
        Self {
            output: graph.register("Output tensor", Vec2::new(165.0, 200.0)),
            chosen: None,
        }
    }

    pub fn chosen(&self) -> Option<u8> {
        self.chosen
    }

    /// Chooses a digit, replacing any previous choice; out-of-range values
    /// are ignored
    pub fn choose(&mut self, digit: u8) {
        if (digit as usize) < DIGITS {
            self.chosen = Some(digit);
        }
    }

    pub fn pass(&self) -> Vec<Emission> {
        let Some(digit) = self.chosen else {
            return Vec::new();
        };
        let mut one_hot = vec![0.0; DIGITS];
        one_hot[digit as usize] = 1.0;
        vec![Emission::new(
            self.output,
            Payload::Tensors(vec![Tensor::from_vec(one_hot)]),
        )]
    }
}

impl ModuleBehavior for NumberSelect {
    fn title(&self) -> &str {
        "Select"
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
    fn test_nothing_chosen_means_no_emission() {
        let mut graph = Graph::new();
        let module = NumberSelect::new(&mut graph);
        assert!(module.pass().is_empty());
    }

    #[test]
    fn test_pass_emits_one_hot() {
        let mut graph = Graph::new();
        let mut module = NumberSelect::new(&mut graph);
        module.choose(3);

        let emissions = module.pass();
        assert_eq!(emissions.len(), 1);
        let tensors = emissions[0].payload.as_tensors().unwrap();
        assert_eq!(
            tensors[0].values(),
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_choose_replaces_and_guards_range() {
        let mut graph = Graph::new();
        let mut module = NumberSelect::new(&mut graph);
        module.choose(3);
        module.choose(7);
        assert_eq!(module.chosen(), Some(7));
        module.choose(10);
        assert_eq!(module.chosen(), Some(7));
    }
}
