// ── Attachment relations ──
//
// Derived, never declared: the deriver infers them from interface
// configuration and the reconciler diffs them against the controller.

use std::fmt;

use serde::Serialize;

use super::EntityKind;

/// Where on the switch the entity is bound.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AttachPoint {
    /// Whole-switch VRF attachment carrying the VRF's VLAN.
    Vlan(u16),
    /// Network attachment on one interface.
    Interface { name: String, vlan: u16 },
}

/// `(entityType, entityName, switchSerial, interface|vlan, deployment)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttachmentRelation {
    pub kind: EntityKind,
    pub entity: String,
    pub switch_serial: String,
    pub point: AttachPoint,
    pub deployment: bool,
}

impl AttachmentRelation {
    pub fn vrf(entity: impl Into<String>, serial: impl Into<String>, vlan: u16) -> Self {
        Self {
            kind: EntityKind::Vrf,
            entity: entity.into(),
            switch_serial: serial.into(),
            point: AttachPoint::Vlan(vlan),
            deployment: true,
        }
    }

    pub fn network(
        entity: impl Into<String>,
        serial: impl Into<String>,
        interface: impl Into<String>,
        vlan: u16,
    ) -> Self {
        Self {
            kind: EntityKind::Network,
            entity: entity.into(),
            switch_serial: serial.into(),
            point: AttachPoint::Interface {
                name: interface.into(),
                vlan,
            },
            deployment: true,
        }
    }

    pub fn vlan(&self) -> u16 {
        match &self.point {
            AttachPoint::Vlan(vlan) | AttachPoint::Interface { vlan, .. } => *vlan,
        }
    }

    pub fn interface(&self) -> Option<&str> {
        match &self.point {
            AttachPoint::Interface { name, .. } => Some(name),
            AttachPoint::Vlan(_) => None,
        }
    }

    /// Identity used for diffing. The VLAN is an attribute, not part of
    /// identity, so a VLAN change is an update (re-attach).
    pub fn key(&self) -> String {
        match self.interface() {
            Some(intf) => format!("{}@{}:{}", self.entity, self.switch_serial, intf),
            None => format!("{}@{}", self.entity, self.switch_serial),
        }
    }
}

impl fmt::Display for AttachmentRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (vlan {})", self.kind, self.key(), self.vlan())
    }
}
