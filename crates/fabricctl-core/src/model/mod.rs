// ── Canonical domain model ──
//
// Every type here is the validated, strongly-typed form of one YAML
// declaration. The loader produces them; payload builders, the deriver
// and the reconciler consume them. Nothing in this module does I/O.

pub mod attachment;
pub mod fabric;
pub mod interface;
pub mod network;
pub mod scalar;
pub mod switch;
pub mod vpc;
pub mod vrf;

use serde::Serialize;
use strum::{Display, EnumString};

pub use attachment::{AttachPoint, AttachmentRelation};
pub use fabric::{FabricFreeform, FabricRecord, FabricType};
pub use interface::{AllowedVlans, InterfacePolicy, InterfaceRecord};
pub use network::{L2_ONLY_VRF, NetworkRecord};
pub use scalar::Scalar;
pub use switch::{SwitchRecord, SwitchRole};
pub use vpc::{VpcPairRecord, VpcPolicyConfig};
pub use vrf::VrfRecord;

/// Entity kinds that appear in reports and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Fabric,
    Vrf,
    Network,
    Switch,
    Interface,
    Vpc,
    Policy,
    VrfAttachment,
    NetworkAttachment,
}
