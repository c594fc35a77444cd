//! Graph engine - owns the modules and drives payload propagation

use egui::Pos2;
use log::{debug, warn};

use crate::config::EngineConfig;
use crate::graph::Graph;
use crate::modules::{Emission, ModuleBehavior, ModuleId, ModuleKind};
use crate::payload::Payload;
use crate::port::PortId;

/// Owns the port graph and every module wired into it.
///
/// Pushing a payload into a port is fully synchronous: the port's handler
/// runs, then the linked partner's handler runs one hop later, and handler
/// emissions recurse the same way. The whole downstream call tree completes
/// before [`GraphEngine::push`] returns. A hop counter bounds the damage of
/// accidental wiring cycles: propagation past `max_hops` is logged and
/// dropped, never surfaced as an error.
pub struct GraphEngine {
    pub graph: Graph,
    modules: Vec<ModuleKind>,
    config: EngineConfig,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            graph: Graph::new(),
            modules: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds a module against this engine's graph and takes ownership of
    /// it, binding its ports so arrivals reach its handler
    pub fn add_module<F>(&mut self, build: F) -> ModuleId
    where
        F: FnOnce(&mut Graph) -> ModuleKind,
    {
        let module = build(&mut self.graph);
        let id = self.modules.len();
        for port in module.ports() {
            self.graph.set_owner(port, id);
        }
        self.modules.push(module);
        id
    }

    pub fn module(&self, id: ModuleId) -> Option<&ModuleKind> {
        self.modules.get(id)
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut ModuleKind> {
        self.modules.get_mut(id)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Re-anchors every port of a module to a new origin and refreshes the
    /// wire list
    pub fn move_module(&mut self, id: ModuleId, origin: Pos2) {
        let Some(module) = self.modules.get(id) else {
            return;
        };
        for port in module.ports() {
            if let Some(offset) = self.graph.port(port).map(|p| p.offset) {
                self.graph.set_anchor(port, origin + offset);
            }
        }
        self.graph.update();
    }

    /// Pushes a payload into a port, running the synchronous propagation
    /// chain to completion
    pub fn push(&mut self, port: PortId, payload: Payload) {
        self.push_at(port, payload, 0);
    }

    /// Triggers a source module's pass action, pushing whatever it emits.
    /// Returns false for modules without one.
    pub fn pass(&mut self, id: ModuleId) -> bool {
        let emissions = match self.modules.get(id) {
            Some(ModuleKind::PointInput(m)) => m.pass(),
            Some(ModuleKind::Range(m)) => m.pass(),
            Some(ModuleKind::Drawing(m)) => m.pass(),
            Some(ModuleKind::Select(m)) => m.pass(),
            _ => return false,
        };
        self.inject(emissions);
        true
    }

    /// Pushes a batch of emissions as fresh top-level passes
    pub fn inject(&mut self, emissions: Vec<Emission>) {
        for emission in emissions {
            self.push_at(emission.port, emission.payload, 0);
        }
    }

    fn push_at(&mut self, port: PortId, payload: Payload, depth: u32) {
        if depth > self.config.max_hops {
            warn!(
                "dropping {} at port {}: exceeded {} hops",
                payload.kind(),
                port,
                self.config.max_hops
            );
            return;
        }

        let partner = self.graph.link_of(port);
        self.deliver(port, &payload, depth);
        if let Some(partner) = partner {
            self.deliver(partner, &payload, depth + 1);
        }
    }

    fn deliver(&mut self, port: PortId, payload: &Payload, depth: u32) {
        let Some(owner) = self.graph.owner_of(port) else {
            return;
        };
        let emissions = match self.modules.get_mut(owner) {
            Some(module) => module.on_data_arrived(port, payload, depth),
            None => return,
        };
        if !emissions.is_empty() {
            debug!(
                "module {} re-emitted {} payload(s) at depth {}",
                owner,
                emissions.len(),
                depth
            );
        }
        for emission in emissions {
            self.push_at(emission.port, emission.payload, depth);
        }
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new()
    }
}
