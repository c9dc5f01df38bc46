// ── Entity managers ──
//
// Thin orchestration per entity kind: load config, derive or reconcile
// where it applies, build the payload, call the controller. Managers
// borrow the loader and the controller and hold no state of their own,
// so every call is independently retryable.

mod fabric;
mod interface;
mod network;
mod policy;
mod switch;
mod vpc;
mod vrf;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fake;

pub use fabric::{FabricManager, FabricStage, build_payload};
pub use interface::{InterfaceManager, InterfaceUpdate};
pub use network::NetworkManager;
pub use policy::PolicyManager;
pub use switch::SwitchManager;
pub use vpc::VpcManager;
pub use vrf::VrfManager;

use tracing::info;

use crate::error::CoreError;
use crate::loader::ConfigLoader;

/// VRF and network attachments are meaningless on an inter-site network.
fn attachments_apply(loader: &ConfigLoader, fabric: &str) -> Result<bool, CoreError> {
    let fabric_type = loader.fabric_type_of(fabric)?;
    if !fabric_type.carries_attachments() {
        info!(fabric, %fabric_type, "fabric carries no attachments, skipping");
        return Ok(false);
    }
    Ok(true)
}
