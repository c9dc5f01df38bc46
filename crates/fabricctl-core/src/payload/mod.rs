// ── Payload builder ──
//
// Pure functions from canonical records (plus reference tables) to the
// controller's wire types. Nothing here performs I/O; freeform text has
// already been read by the loader.

mod attachment;
mod fabric;
mod interface;
mod network;
mod policy;
mod switch;
mod vpc;
mod vrf;

pub use attachment::{network_attach_request, vrf_attach_request};
pub use fabric::{FABRIC_DENY_LIST, FabricPayload, fabric_payload};
pub use interface::{
    admin_status_requests, default_closed_interfaces, interface_requests, shut_request,
};
pub use network::network_payload;
pub use policy::{FREEFORM_TEMPLATE, HOSTNAME_TEMPLATE, random_policy_number, switch_freeform_policy};
pub use switch::{discovery_request, role_assignments};
pub use vpc::{vpc_interface_ref, vpc_interface_request, vpc_pair_request};
pub use vrf::vrf_payload;

use crate::error::CoreError;

pub(crate) fn build_err(field: &str, reason: impl Into<String>) -> CoreError {
    CoreError::PayloadBuild {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Controller boolean string.
pub(crate) fn flag(value: bool) -> String {
    if value { "true" } else { "false" }.to_owned()
}
