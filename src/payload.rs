//! Payload types that flow between ports

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

/// Everything a port can carry.
///
/// Handlers are expected to type-guard on the variant they understand and
/// silently drop anything else; a payload of the wrong kind is never an
/// error, it just goes nowhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// Plain numeric series, one value per sample
    Scalars(Vec<f32>),
    /// Batch of tensor samples
    Tensors(Vec<Tensor>),
    /// Free-form text
    Text(String),
}

impl Payload {
    pub fn as_scalars(&self) -> Option<&[f32]> {
        match self {
            Payload::Scalars(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_tensors(&self) -> Option<&[Tensor]> {
        match self {
            Payload::Tensors(tensors) => Some(tensors),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short description used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Scalars(_) => "scalars",
            Payload::Tensors(_) => "tensors",
            Payload::Text(_) => "text",
        }
    }
}
