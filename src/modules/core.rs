//! Core module - the one place the graph touches the trainable model

use egui::Vec2;
use log::{debug, info, warn};

use crate::graph::Graph;
use crate::model::{FitOptions, FitProgress, FitReport, Model, ModelError};
use crate::modules::{Emission, ModuleBehavior};
use crate::payload::Payload;
use crate::port::PortId;
use crate::tensor::Tensor;

/// Hosts the model and switches between collecting training samples and
/// running inference.
///
/// In train mode, tensors arriving at `input` are buffered as training
/// inputs and tensors arriving at `output` as training targets. Out of
/// train mode, a trained model predicts on arriving inputs: the raw payload
/// is forwarded out `input_copy` and the per-sample predictions out
/// `output`.
pub struct CoreModule {
    pub input: PortId,
    pub input_copy: PortId,
    pub output: PortId,
    model: Box<dyn Model>,
    train_mode: bool,
    train_completed: bool,
    xs: Vec<Tensor>,
    ys: Vec<Tensor>,
    fit: FitOptions,
}

impl CoreModule {
    pub fn new(graph: &mut Graph, model: Box<dyn Model>) -> Self {
        Self {
            input: graph.register("Input", Vec2::new(0.0, 100.0)),
            input_copy: graph.register("Input Copy", Vec2::new(200.0, 50.0)),
            output: graph.register("Output", Vec2::new(200.0, 100.0)),
            model,
            train_mode: false,
            train_completed: false,
            xs: Vec::new(),
            ys: Vec::new(),
            fit: FitOptions::default(),
        }
    }

    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    /// Swaps in a freshly compiled model and resets all training state
    pub fn install_model(&mut self, model: Box<dyn Model>, epochs: usize) {
        self.model = model;
        self.fit.epochs = epochs;
        self.train_completed = false;
        self.xs.clear();
        self.ys.clear();
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn train_mode(&self) -> bool {
        self.train_mode
    }

    pub fn set_train_mode(&mut self, on: bool) {
        self.train_mode = on;
    }

    pub fn train_completed(&self) -> bool {
        self.train_completed
    }

    /// Number of buffered (input, target) samples
    pub fn sample_counts(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    /// Runs a training pass over the buffered samples, logging per-epoch
    /// progress. Triggered by an explicit user action, never by a push.
    pub fn start_training(&mut self) -> Result<FitReport, ModelError> {
        self.start_training_with(&mut |progress: &FitProgress| match progress.loss {
            Some(loss) => info!("epoch {}: loss={}", progress.epoch, loss),
            None => info!("epoch {}", progress.epoch),
        })
    }

    /// Same as [`CoreModule::start_training`] with a caller-supplied
    /// progress callback
    pub fn start_training_with(
        &mut self,
        on_epoch: &mut dyn FnMut(&FitProgress),
    ) -> Result<FitReport, ModelError> {
        if self.xs.is_empty() || self.ys.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let xs = Tensor::stack(&self.xs)?;
        let ys = Tensor::stack(&self.ys)?;
        let report = self.model.fit(&xs, &ys, &self.fit, on_epoch)?;
        self.train_completed = true;
        info!(
            "training finished after {} epochs on {} samples",
            report.epochs_run,
            self.xs.len()
        );
        Ok(report)
    }

    fn matches_input_shape(&self, tensors: &[Tensor]) -> bool {
        !tensors.is_empty()
            && tensors
                .iter()
                .all(|t| t.shape() == self.model.input_shape())
    }

    fn matches_output_shape(&self, tensors: &[Tensor]) -> bool {
        !tensors.is_empty()
            && tensors
                .iter()
                .all(|t| t.shape() == [self.model.output_arity()])
    }
}

impl ModuleBehavior for CoreModule {
    fn title(&self) -> &str {
        "Core"
    }

    fn ports(&self) -> Vec<PortId> {
        vec![self.input, self.input_copy, self.output]
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, _depth: u32) -> Vec<Emission> {
        if port == self.input {
            let Some(tensors) = payload.as_tensors() else {
                return Vec::new();
            };
            if !self.matches_input_shape(tensors) {
                return Vec::new();
            }

            if self.train_mode {
                self.xs.extend_from_slice(tensors);
                debug!("buffered {} training inputs", self.xs.len());
                return Vec::new();
            }

            if !self.train_completed {
                return Vec::new();
            }

            let mut emissions = vec![Emission::new(self.input_copy, payload.clone())];
            match Tensor::stack(tensors)
                .map_err(ModelError::from)
                .and_then(|batch| self.model.predict(&batch))
            {
                Ok(predictions) => {
                    emissions.push(Emission::new(
                        self.output,
                        Payload::Tensors(predictions.rows()),
                    ));
                }
                Err(err) => warn!("prediction skipped: {}", err),
            }
            emissions
        } else if port == self.output {
            if !self.train_mode {
                return Vec::new();
            }
            let Some(tensors) = payload.as_tensors() else {
                return Vec::new();
            };
            if self.matches_output_shape(tensors) {
                self.ys.extend_from_slice(tensors);
                debug!("buffered {} training targets", self.ys.len());
            }
            Vec::new()
        } else {
            Vec::new()
        }
    }
}
