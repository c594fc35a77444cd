//! Port registry, topology mutation and the two-click connect protocol

use std::collections::BTreeSet;

use egui::{PointerButton, Pos2, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::modules::ModuleId;
use crate::port::{pos2_serde, Port, PortId};

/// A renderable wire between two linked ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub a: PortId,
    pub b: PortId,
    #[serde(with = "pos2_serde")]
    pub from: Pos2,
    #[serde(with = "pos2_serde")]
    pub to: Pos2,
}

/// Registry of every port in the session plus the derived wiring state.
///
/// Ports are appended once at module construction and never removed. Each
/// port holds at most one link; connecting a port that is already linked
/// silently evicts the previous partner, so the most recent connect request
/// always wins. `active_links` caches the smaller index of each linked pair
/// and is refreshed by [`Graph::update`], which also prunes entries whose
/// link has since been broken.
#[derive(Debug, Default)]
pub struct Graph {
    ports: Vec<Port>,
    active_links: BTreeSet<PortId>,
    wires: Vec<Wire>,
    selected: Option<PortId>,
}

impl Graph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new port and returns its handle
    pub fn register(&mut self, label: impl Into<String>, offset: Vec2) -> PortId {
        let id = self.ports.len();
        self.ports.push(Port::new(label, offset));
        id
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id)
    }

    /// Iterates over every registered port in insertion order
    pub fn ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// The partner a port is currently linked to, if any
    pub fn link_of(&self, id: PortId) -> Option<PortId> {
        self.ports.get(id).and_then(|p| p.link)
    }

    /// The module that handles payloads arriving at a port
    pub fn owner_of(&self, id: PortId) -> Option<ModuleId> {
        self.ports.get(id).and_then(|p| p.owner)
    }

    pub(crate) fn set_owner(&mut self, id: PortId, owner: ModuleId) {
        if let Some(port) = self.ports.get_mut(id) {
            port.owner = Some(owner);
        }
    }

    /// Moves a port's world anchor, used when its module is dragged
    pub fn set_anchor(&mut self, id: PortId, anchor: Pos2) {
        if let Some(port) = self.ports.get_mut(id) {
            port.anchor = anchor;
        }
    }

    // The only two places allowed to touch `Port::link`, keeping the pair
    // symmetric at all times.
    fn set_link(&mut self, a: PortId, b: PortId) {
        self.ports[a].link = Some(b);
        self.ports[b].link = Some(a);
    }

    fn clear_link(&mut self, id: PortId) -> Option<PortId> {
        let partner = self.ports[id].link.take()?;
        self.ports[partner].link = None;
        Some(partner)
    }

    /// Links two ports, evicting any previous partner on either side.
    ///
    /// Unknown ports and self-connections are silent no-ops. The evicted
    /// pairs' `active_links` entries are removed before the new entry is
    /// recorded, so the cache never accumulates dead pairs from rewiring.
    pub fn connect(&mut self, a: PortId, b: PortId) {
        if a >= self.ports.len() || b >= self.ports.len() || a == b {
            return;
        }

        if let Some(old) = self.clear_link(a) {
            self.active_links.remove(&a.min(old));
        }
        if let Some(old) = self.clear_link(b) {
            self.active_links.remove(&b.min(old));
        }

        self.set_link(a, b);
        self.active_links.insert(a.min(b));
        debug!("connected port {} to port {}", a, b);
    }

    /// Breaks a port's link on both sides; no-op when unlinked.
    ///
    /// The stale `active_links` entry stays behind until the next
    /// [`Graph::update`] call prunes it.
    pub fn disconnect(&mut self, id: PortId) {
        if id >= self.ports.len() {
            return;
        }
        if let Some(partner) = self.clear_link(id) {
            debug!("disconnected port {} from port {}", id, partner);
        }
    }

    /// Recomputes the renderable wire list from `active_links`, dropping
    /// entries whose link no longer exists
    pub fn update(&mut self) {
        self.wires.clear();

        let recorded: Vec<PortId> = self.active_links.iter().copied().collect();
        for id in recorded {
            match self.ports[id].link {
                None => {
                    self.active_links.remove(&id);
                }
                Some(partner) => {
                    self.wires.push(Wire {
                        a: id,
                        b: partner,
                        from: self.ports[id].anchor,
                        to: self.ports[partner].anchor,
                    });
                }
            }
        }
    }

    /// The wire segments computed by the last [`Graph::update`] call
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Smaller endpoint index of every recorded link. May contain entries
    /// for links broken since the last [`Graph::update`] call.
    pub fn active_links(&self) -> impl Iterator<Item = PortId> + '_ {
        self.active_links.iter().copied()
    }

    /// The port currently awaiting a second click, if any
    pub fn selected_port(&self) -> Option<PortId> {
        self.selected
    }

    /// Whether a port should be drawn in its selected state
    pub fn is_selected(&self, id: PortId) -> bool {
        self.selected == Some(id)
    }

    /// Pointer-down on a port.
    ///
    /// Primary button drives the two-click connect protocol: the first click
    /// marks the port as pending, a second click on a different port links
    /// the two and clears the pending state. Clicking the pending port again
    /// leaves it pending. Secondary button disconnects the port directly,
    /// bypassing the protocol.
    pub fn pointer_down_on_port(&mut self, id: PortId, button: PointerButton) {
        if id >= self.ports.len() {
            return;
        }
        match button {
            PointerButton::Primary => match self.selected {
                Some(pending) if pending != id => {
                    self.connect(id, pending);
                    self.selected = None;
                    self.update();
                }
                _ => {
                    self.selected = Some(id);
                }
            },
            PointerButton::Secondary => {
                if self.ports[id].link.is_some() {
                    self.disconnect(id);
                    self.update();
                }
            }
            _ => {}
        }
    }

    /// Pointer-down anywhere outside a port clears the pending selection
    pub fn pointer_down_on_canvas(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_ports(n: usize) -> Graph {
        let mut graph = Graph::new();
        for i in 0..n {
            graph.register(format!("Port {}", i), Vec2::ZERO);
        }
        graph
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut graph = graph_with_ports(2);
        graph.connect(0, 1);
        assert_eq!(graph.link_of(0), Some(1));
        assert_eq!(graph.link_of(1), Some(0));
    }

    #[test]
    fn test_connect_evicts_previous_partner() {
        let mut graph = graph_with_ports(3);
        graph.connect(0, 1);
        graph.connect(0, 2);
        assert_eq!(graph.link_of(1), None);
        assert_eq!(graph.link_of(0), Some(2));
        assert_eq!(graph.link_of(2), Some(0));
    }

    #[test]
    fn test_connect_unknown_or_self_is_noop() {
        let mut graph = graph_with_ports(2);
        graph.connect(0, 7);
        graph.connect(7, 0);
        graph.connect(1, 1);
        assert_eq!(graph.link_of(0), None);
        assert_eq!(graph.link_of(1), None);
    }

    #[test]
    fn test_disconnect_clears_both_sides() {
        let mut graph = graph_with_ports(2);
        graph.connect(0, 1);
        graph.disconnect(0);
        assert_eq!(graph.link_of(0), None);
        assert_eq!(graph.link_of(1), None);
        // repeated disconnect stays a no-op
        graph.disconnect(0);
        assert_eq!(graph.link_of(0), None);
    }

    #[test]
    fn test_update_builds_wires_from_anchors() {
        let mut graph = graph_with_ports(2);
        graph.set_anchor(0, Pos2::new(10.0, 20.0));
        graph.set_anchor(1, Pos2::new(30.0, 40.0));
        graph.connect(0, 1);
        graph.update();

        let wires = graph.wires();
        assert_eq!(wires.len(), 1);
        assert_eq!(wires[0].a, 0);
        assert_eq!(wires[0].b, 1);
        assert_eq!(wires[0].from, Pos2::new(10.0, 20.0));
        assert_eq!(wires[0].to, Pos2::new(30.0, 40.0));
    }

    #[test]
    fn test_update_prunes_stale_entries() {
        let mut graph = graph_with_ports(4);
        graph.connect(0, 1);
        graph.connect(2, 3);
        graph.update();
        assert_eq!(graph.wires().len(), 2);

        graph.disconnect(1);
        // the stale entry lingers until update() prunes it
        assert_eq!(graph.active_links().collect::<Vec<_>>(), vec![0, 2]);
        graph.update();
        assert_eq!(graph.wires().len(), 1);
        assert_eq!(graph.wires()[0].a, 2);
        assert_eq!(graph.active_links().collect::<Vec<_>>(), vec![2]);

        // a second update stays stable once pruned
        graph.update();
        assert_eq!(graph.wires().len(), 1);
    }

    #[test]
    fn test_rewire_keeps_wire_list_consistent() {
        let mut graph = graph_with_ports(3);
        graph.connect(0, 1);
        graph.connect(0, 2);
        graph.update();
        let wires = graph.wires();
        assert_eq!(wires.len(), 1);
        assert_eq!((wires[0].a, wires[0].b), (0, 2));
    }

    #[test]
    fn test_two_click_protocol_connects() {
        let mut graph = graph_with_ports(2);
        graph.pointer_down_on_port(0, PointerButton::Primary);
        assert!(graph.is_selected(0));

        graph.pointer_down_on_port(1, PointerButton::Primary);
        assert_eq!(graph.selected_port(), None);
        assert_eq!(graph.link_of(0), Some(1));
        assert_eq!(graph.wires().len(), 1);
    }

    #[test]
    fn test_reclicking_pending_port_keeps_it_pending() {
        let mut graph = graph_with_ports(2);
        graph.pointer_down_on_port(0, PointerButton::Primary);
        graph.pointer_down_on_port(0, PointerButton::Primary);
        assert!(graph.is_selected(0));
        assert_eq!(graph.link_of(0), None);
    }

    #[test]
    fn test_canvas_click_cancels_selection() {
        let mut graph = graph_with_ports(2);
        graph.pointer_down_on_port(0, PointerButton::Primary);
        graph.pointer_down_on_canvas();
        assert_eq!(graph.selected_port(), None);

        graph.pointer_down_on_port(1, PointerButton::Primary);
        assert_eq!(graph.link_of(0), None);
        assert!(graph.is_selected(1));
    }

    #[test]
    fn test_secondary_click_disconnects() {
        let mut graph = graph_with_ports(2);
        graph.connect(0, 1);
        graph.update();
        graph.pointer_down_on_port(1, PointerButton::Secondary);
        assert_eq!(graph.link_of(0), None);
        assert_eq!(graph.link_of(1), None);
        assert!(graph.wires().is_empty());
    }
}
