//! Minimal dense tensor used as the payload currency between modules

use ndarray::{Array, ArrayD, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("tensor batch is empty")]
    EmptyBatch,
    #[error("tensors in a batch must share one shape")]
    MismatchedShapes,
    #[error("{len} values do not fit shape {shape:?}")]
    IncompatibleShape { shape: Vec<usize>, len: usize },
}

/// An n-dimensional array of `f32` values.
///
/// Rank-1 tensors are the common case: every sample flowing between modules
/// is one of them. Batches are built with [`Tensor::stack`] and taken apart
/// again with [`Tensor::rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// Creates a rank-1 tensor from a list of values
    pub fn from_vec(values: Vec<f32>) -> Self {
        Self {
            data: Array::from_vec(values).into_dyn(),
        }
    }

    /// Creates a tensor of the given shape from row-major values
    pub fn from_shape(shape: &[usize], values: Vec<f32>) -> Result<Self, TensorError> {
        let len = values.len();
        Array::from_shape_vec(IxDyn(shape), values)
            .map(|data| Self { data })
            .map_err(|_| TensorError::IncompatibleShape {
                shape: shape.to_vec(),
                len,
            })
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// The i-th value of a rank-1 tensor
    pub fn component(&self, i: usize) -> Option<f32> {
        if self.data.ndim() != 1 {
            return None;
        }
        self.data.iter().nth(i).copied()
    }

    /// All values in row-major order
    pub fn values(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// Stacks same-shaped tensors into one tensor with a new leading axis
    pub fn stack(tensors: &[Tensor]) -> Result<Tensor, TensorError> {
        if tensors.is_empty() {
            return Err(TensorError::EmptyBatch);
        }
        let views: Vec<_> = tensors.iter().map(|t| t.data.view()).collect();
        ndarray::stack(Axis(0), &views)
            .map(|data| Tensor { data })
            .map_err(|_| TensorError::MismatchedShapes)
    }

    /// Splits a stacked tensor back into its leading-axis rows
    pub fn rows(&self) -> Vec<Tensor> {
        if self.data.ndim() == 0 {
            return Vec::new();
        }
        self.data
            .axis_iter(Axis(0))
            .map(|row| Tensor {
                data: row.to_owned(),
            })
            .collect()
    }

    /// Index of the largest value along the last axis.
    ///
    /// Only defined where the reduction yields a single number, i.e. for
    /// non-empty rank-1 tensors; anything else returns `None`.
    pub fn argmax_last_axis(&self) -> Option<usize> {
        if self.data.ndim() != 1 {
            return None;
        }
        let mut best: Option<(usize, f32)> = None;
        for (i, &value) in self.data.iter().enumerate() {
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((i, value)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stack_and_rows_roundtrip() {
        let batch = Tensor::stack(&[
            Tensor::from_vec(vec![1.0, 2.0]),
            Tensor::from_vec(vec![3.0, 4.0]),
        ])
        .unwrap();
        assert_eq!(batch.shape(), &[2, 2]);

        let rows = batch.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].values(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_stack_rejects_bad_batches() {
        assert_eq!(Tensor::stack(&[]), Err(TensorError::EmptyBatch));
        let result = Tensor::stack(&[
            Tensor::from_vec(vec![1.0]),
            Tensor::from_vec(vec![1.0, 2.0]),
        ]);
        assert_eq!(result, Err(TensorError::MismatchedShapes));
    }

    #[test]
    fn test_from_shape_checks_length() {
        let grid = Tensor::from_shape(&[2, 2, 1], vec![0.0; 4]).unwrap();
        assert_eq!(grid.shape(), &[2, 2, 1]);

        let bad = Tensor::from_shape(&[2, 2], vec![0.0; 3]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_component_is_rank1_only() {
        let vector = Tensor::from_vec(vec![5.0, 7.0]);
        assert_relative_eq!(vector.component(1).unwrap(), 7.0);
        assert_eq!(vector.component(2), None);

        let matrix = Tensor::from_shape(&[1, 2], vec![5.0, 7.0]).unwrap();
        assert_eq!(matrix.component(0), None);
    }

    #[test]
    fn test_argmax_last_axis() {
        let vector = Tensor::from_vec(vec![0.1, 0.9, 0.3]);
        assert_eq!(vector.argmax_last_axis(), Some(1));

        assert_eq!(Tensor::from_vec(vec![]).argmax_last_axis(), None);
        let matrix = Tensor::from_shape(&[2, 2], vec![0.0; 4]).unwrap();
        assert_eq!(matrix.argmax_last_axis(), None);
    }
}
