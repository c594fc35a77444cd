//! Boundary to the trainable model collaborator
//!
//! The runtime never implements machine learning itself; it drives whatever
//! sits behind the [`Model`] trait. [`IdentityModel`] is a trivial stand-in
//! so graphs can be wired and exercised without a real model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tensor::{Tensor, TensorError};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("model has not been trained")]
    NotTrained,
    #[error("expected input shape {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

/// Knobs for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub epochs: usize,
    pub batch_size: usize,
    pub validation_split: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            epochs: 500,
            batch_size: 24,
            validation_split: 0.2,
        }
    }
}

/// Per-epoch progress reported during [`Model::fit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitProgress {
    pub epoch: usize,
    pub loss: Option<f32>,
}

/// Outcome of a completed training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    pub epochs_run: usize,
    pub final_loss: Option<f32>,
}

/// A trainable model with batched synchronous inference.
///
/// `predict` takes a stacked batch (leading axis = samples) and returns a
/// stacked batch of the same length. `fit` blocks until training completes,
/// reporting progress through the callback once per epoch.
pub trait Model {
    /// Shape of a single input sample
    fn input_shape(&self) -> &[usize];

    /// Length of a single rank-1 output sample
    fn output_arity(&self) -> usize;

    fn predict(&self, batch: &Tensor) -> Result<Tensor, ModelError>;

    fn fit(
        &mut self,
        xs: &Tensor,
        ys: &Tensor,
        options: &FitOptions,
        on_epoch: &mut dyn FnMut(&FitProgress),
    ) -> Result<FitReport, ModelError>;
}

/// Stand-in model that predicts every sample as itself.
///
/// Training only validates shapes and reports the mean squared error
/// between inputs and targets as a constant per-epoch loss.
#[derive(Debug, Clone)]
pub struct IdentityModel {
    input_shape: Vec<usize>,
    output_arity: usize,
}

impl IdentityModel {
    pub fn new(input_shape: Vec<usize>, output_arity: usize) -> Self {
        Self {
            input_shape,
            output_arity,
        }
    }

    fn check_batch(&self, batch: &Tensor) -> Result<(), ModelError> {
        if batch.shape().len() < 2 || batch.shape()[1..] != self.input_shape[..] {
            return Err(ModelError::ShapeMismatch {
                expected: self.input_shape.clone(),
                got: batch.shape().to_vec(),
            });
        }
        Ok(())
    }
}

impl Model for IdentityModel {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_arity(&self) -> usize {
        self.output_arity
    }

    fn predict(&self, batch: &Tensor) -> Result<Tensor, ModelError> {
        self.check_batch(batch)?;
        Ok(batch.clone())
    }

    fn fit(
        &mut self,
        xs: &Tensor,
        ys: &Tensor,
        options: &FitOptions,
        on_epoch: &mut dyn FnMut(&FitProgress),
    ) -> Result<FitReport, ModelError> {
        self.check_batch(xs)?;

        let loss = if xs.shape() == ys.shape() {
            let n = xs.len().max(1) as f32;
            let sum: f32 = xs
                .data()
                .iter()
                .zip(ys.data().iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum();
            Some(sum / n)
        } else {
            None
        };

        for epoch in 0..options.epochs {
            on_epoch(&FitProgress { epoch, loss });
        }

        Ok(FitReport {
            epochs_run: options.epochs,
            final_loss: loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_predict_echoes_batch() {
        let model = IdentityModel::new(vec![2], 2);
        let batch = Tensor::stack(&[
            Tensor::from_vec(vec![1.0, 2.0]),
            Tensor::from_vec(vec![3.0, 4.0]),
        ])
        .unwrap();
        let out = model.predict(&batch).unwrap();
        assert_eq!(out, batch);
    }

    #[test]
    fn test_identity_predict_rejects_wrong_shape() {
        let model = IdentityModel::new(vec![2], 2);
        let batch = Tensor::stack(&[Tensor::from_vec(vec![1.0, 2.0, 3.0])]).unwrap();
        assert!(matches!(
            model.predict(&batch),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_identity_fit_reports_every_epoch() {
        let mut model = IdentityModel::new(vec![1], 1);
        let xs = Tensor::stack(&[Tensor::from_vec(vec![1.0]), Tensor::from_vec(vec![2.0])])
            .unwrap();
        let ys = Tensor::stack(&[Tensor::from_vec(vec![1.0]), Tensor::from_vec(vec![4.0])])
            .unwrap();

        let mut epochs = Vec::new();
        let options = FitOptions {
            epochs: 3,
            ..FitOptions::default()
        };
        let report = model
            .fit(&xs, &ys, &options, &mut |p| epochs.push(p.epoch))
            .unwrap();

        assert_eq!(epochs, vec![0, 1, 2]);
        assert_eq!(report.epochs_run, 3);
        // mse of (1,1) and (2,4) is 4/2
        assert_relative_eq!(report.final_loss.unwrap(), 2.0);
    }
}
