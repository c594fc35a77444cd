//! Unpack module - splits tensor samples back into per-axis scalar series

use egui::Vec2;

use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;
use crate::tensor::Tensor;

/// Inverse of [`TensorPack`](crate::modules::TensorPack): a batch of rank-1
/// tensors of length d arriving on the input port is transposed into d
/// scalar series, pushed out the matching output ports in the same call.
pub struct TensorUnpack {
    pub input: PortId,
    pub outputs: Vec<PortId>,
    dimension: usize,
}

impl TensorUnpack {
    pub fn new(graph: &mut Graph, dimension: usize) -> Self {
        let outputs = (0..dimension)
            .map(|i| {
                graph.register(
                    format!("Output {}", i),
                    Vec2::new(150.0, 80.0 + 50.0 * i as f32),
                )
            })
            .collect();
        let height = dimension as f32 * 50.0 + 140.0;
        Self {
            input: graph.register("Input", Vec2::new(0.0, height / 2.0)),
            outputs,
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn accepts(&self, tensors: &[Tensor]) -> bool {
        !tensors.is_empty()
            && tensors
                .iter()
                .all(|t| t.ndim() == 1 && t.shape()[0] == self.dimension)
    }
}

impl ModuleBehavior for TensorUnpack {
    fn title(&self) -> &str {
        "Unpack"
    }

    fn ports(&self) -> Vec<PortId> {
        let mut ports = vec![self.input];
        ports.extend(&self.outputs);
        ports
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        if port != self.input {
            return Vec::new();
        }
        let Some(tensors) = payload.as_tensors() else {
            return Vec::new();
        };
        if !self.accepts(tensors) {
            return Vec::new();
        }

        self.outputs
            .iter()
            .enumerate()
            .map(|(axis, &port)| {
                let series = tensors
                    .iter()
                    .filter_map(|t| t.component(axis))
                    .collect::<Vec<_>>();
                Emission::new(port, Payload::Scalars(series))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_in_one_call() {
        let mut graph = Graph::new();
        let mut unpack = TensorUnpack::new(&mut graph, 2);
        let input = unpack.input;

        let payload = Payload::Tensors(vec![Tensor::from_vec(vec![5.0, 7.0])]);
        let emissions = unpack.on_data_arrived(input, &payload, 0);

        assert_eq!(emissions.len(), 2);
        assert_eq!(
            emissions[0],
            Emission::new(unpack.outputs[0], Payload::Scalars(vec![5.0]))
        );
        assert_eq!(
            emissions[1],
            Emission::new(unpack.outputs[1], Payload::Scalars(vec![7.0]))
        );
    }

    #[test]
    fn test_batch_transposes() {
        let mut graph = Graph::new();
        let mut unpack = TensorUnpack::new(&mut graph, 2);
        let input = unpack.input;

        let payload = Payload::Tensors(vec![
            Tensor::from_vec(vec![1.0, 10.0]),
            Tensor::from_vec(vec![2.0, 20.0]),
        ]);
        let emissions = unpack.on_data_arrived(input, &payload, 0);
        assert_eq!(emissions[0].payload, Payload::Scalars(vec![1.0, 2.0]));
        assert_eq!(emissions[1].payload, Payload::Scalars(vec![10.0, 20.0]));
    }

    #[test]
    fn test_mismatched_tensors_are_dropped() {
        let mut graph = Graph::new();
        let mut unpack = TensorUnpack::new(&mut graph, 2);
        let input = unpack.input;

        // wrong length
        let payload = Payload::Tensors(vec![Tensor::from_vec(vec![1.0])]);
        assert!(unpack.on_data_arrived(input, &payload, 0).is_empty());

        // empty batch
        assert!(unpack
            .on_data_arrived(input, &Payload::Tensors(vec![]), 0)
            .is_empty());

        // wrong rank
        let matrix = Tensor::from_shape(&[2, 1], vec![1.0, 2.0]).unwrap();
        let payload = Payload::Tensors(vec![matrix]);
        assert!(unpack.on_data_arrived(input, &payload, 0).is_empty());
    }
}
