//! Wirelab - a node graph runtime for interactive neural network experiments
//!
//! Data sources, a trainable core and data sinks are wired together through
//! typed ports. Payloads pushed into a port propagate synchronously along
//! its link and through module handlers until they reach a sink, with a hop
//! counter guarding against wiring cycles.

pub mod config;
pub mod engine;
pub mod graph;
pub mod model;
pub mod modules;
pub mod payload;
pub mod port;
pub mod tensor;

pub use config::EngineConfig;
pub use engine::GraphEngine;
pub use graph::{Graph, Wire};
pub use model::{FitOptions, FitProgress, FitReport, IdentityModel, Model, ModelError};
pub use modules::{Emission, ModuleBehavior, ModuleId, ModuleKind};
pub use payload::Payload;
pub use port::{Port, PortId};
pub use tensor::{Tensor, TensorError};

// Re-export commonly used egui types
pub use egui::{PointerButton, Pos2, Vec2};
