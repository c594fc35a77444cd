//! Module system - the units a user drags around and wires together
//!
//! Every module kind bundles a handful of ports with the behavior that runs
//! when data arrives at them. The set of kinds is closed: the engine
//! dispatches over [`ModuleKind`] rather than trait objects, so per-kind
//! state lives in plain structs.

pub mod argmax;
pub mod core;
pub mod debug;
pub mod drawing;
pub mod pack;
pub mod point_input;
pub mod point_output;
pub mod print;
pub mod range;
pub mod relay;
pub mod select;
pub mod unpack;

pub use argmax::Argmax;
pub use self::core::CoreModule;
pub use debug::DebugSink;
pub use drawing::DrawingPad;
pub use pack::TensorPack;
pub use point_input::PointInput;
pub use point_output::PointOutput;
pub use print::PrintSink;
pub use range::RangeInput;
pub use relay::Relay;
pub use select::NumberSelect;
pub use unpack::TensorUnpack;

use crate::payload::Payload;
use crate::port::PortId;

/// Unique identifier for a module
pub type ModuleId = usize;

/// A payload a handler wants pushed onward from one of its own ports
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub port: PortId,
    pub payload: Payload,
}

impl Emission {
    pub fn new(port: PortId, payload: Payload) -> Self {
        Self { port, payload }
    }
}

/// Behavior shared by every module kind.
///
/// `on_data_arrived` must never panic and never report errors: payloads a
/// module does not understand are silently dropped. Returned emissions are
/// re-injected by the engine at the arrival depth, so data crossing a module
/// keeps its hop count.
pub trait ModuleBehavior {
    /// Display title shown by the host UI
    fn title(&self) -> &str;

    /// Every port owned by this module, in layout order
    fn ports(&self) -> Vec<PortId>;

    /// Called when a payload reaches one of this module's ports
    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, depth: u32) -> Vec<Emission>;
}

/// Closed set of module kinds known to the engine
pub enum ModuleKind {
    Core(CoreModule),
    PointInput(PointInput),
    PointOutput(PointOutput),
    Range(RangeInput),
    Pack(TensorPack),
    Unpack(TensorUnpack),
    Drawing(DrawingPad),
    Select(NumberSelect),
    Argmax(Argmax),
    Print(PrintSink),
    Relay(Relay),
    Debug(DebugSink),
}

impl ModuleBehavior for ModuleKind {
    fn title(&self) -> &str {
        match self {
            ModuleKind::Core(m) => m.title(),
            ModuleKind::PointInput(m) => m.title(),
            ModuleKind::PointOutput(m) => m.title(),
            ModuleKind::Range(m) => m.title(),
            ModuleKind::Pack(m) => m.title(),
            ModuleKind::Unpack(m) => m.title(),
            ModuleKind::Drawing(m) => m.title(),
            ModuleKind::Select(m) => m.title(),
            ModuleKind::Argmax(m) => m.title(),
            ModuleKind::Print(m) => m.title(),
            ModuleKind::Relay(m) => m.title(),
            ModuleKind::Debug(m) => m.title(),
        }
    }

    fn ports(&self) -> Vec<PortId> {
        match self {
            ModuleKind::Core(m) => m.ports(),
            ModuleKind::PointInput(m) => m.ports(),
            ModuleKind::PointOutput(m) => m.ports(),
            ModuleKind::Range(m) => m.ports(),
            ModuleKind::Pack(m) => m.ports(),
            ModuleKind::Unpack(m) => m.ports(),
            ModuleKind::Drawing(m) => m.ports(),
            ModuleKind::Select(m) => m.ports(),
            ModuleKind::Argmax(m) => m.ports(),
            ModuleKind::Print(m) => m.ports(),
            ModuleKind::Relay(m) => m.ports(),
            ModuleKind::Debug(m) => m.ports(),
        }
    }

    fn on_data_arrived(&mut self, port: PortId, payload: &Payload, depth: u32) -> Vec<Emission> {
        match self {
            ModuleKind::Core(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::PointInput(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::PointOutput(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Range(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Pack(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Unpack(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Drawing(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Select(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Argmax(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Print(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Relay(m) => m.on_data_arrived(port, payload, depth),
            ModuleKind::Debug(m) => m.on_data_arrived(port, payload, depth),
        }
    }
}

macro_rules! impl_from_module {
    ($($variant:ident($module:ty)),* $(,)?) => {
        $(impl From<$module> for ModuleKind {
            fn from(module: $module) -> Self {
                ModuleKind::$variant(module)
            }
        })*
    };
}

impl_from_module!(
    Core(CoreModule),
    PointInput(PointInput),
    PointOutput(PointOutput),
    Range(RangeInput),
    Pack(TensorPack),
    Unpack(TensorUnpack),
    Drawing(DrawingPad),
    Select(NumberSelect),
    Argmax(Argmax),
    Print(PrintSink),
    Relay(Relay),
    Debug(DebugSink),
);
