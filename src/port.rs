//! Port types and functionality for module connections

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::modules::ModuleId;

/// Unique identifier for a port
pub type PortId = usize;

/// A single connection point registered in the [`Graph`](crate::graph::Graph).
///
/// A port belongs to exactly one module and holds at most one link to a
/// partner port. Links are always made and broken pairwise; the graph is the
/// only place allowed to mutate them, so a one-sided link cannot exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Display label, e.g. "Input 0" or "Output tensor"
    pub label: String,
    /// Layout position relative to the owning module's origin
    #[serde(with = "vec2_serde")]
    pub offset: Vec2,
    /// Resolved world position, used only to draw wires
    #[serde(with = "pos2_serde")]
    pub anchor: Pos2,
    pub(crate) link: Option<PortId>,
    pub(crate) owner: Option<ModuleId>,
}

impl Port {
    pub(crate) fn new(label: impl Into<String>, offset: Vec2) -> Self {
        Self {
            label: label.into(),
            offset,
            anchor: Pos2::ZERO,
            link: None,
            owner: None,
        }
    }

    /// The partner port this port is currently linked to, if any
    pub fn link(&self) -> Option<PortId> {
        self.link
    }

    /// The module whose handler receives payloads arriving at this port
    pub fn owner(&self) -> Option<ModuleId> {
        self.owner
    }
}

// Serde helper modules for egui types
pub(crate) mod pos2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(pos: &Pos2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [pos.x, pos.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pos2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Pos2::new(x, y))
    }
}

pub(crate) mod vec2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(vec: &Vec2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [vec.x, vec.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Vec2::new(x, y))
    }
}
