//! VRF and network command handlers.
//!
//! Both kinds share one command tree; only the manager and the list row
//! differ.

use tabled::Tabled;

use fabricctl_api::types::{NetworkPayload, VrfPayload};
use fabricctl_core::{NetworkManager, VrfManager};

use crate::cli::{SegmentArgs, SegmentCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Vrf,
    Network,
}

impl Segment {
    fn noun(self) -> &'static str {
        match self {
            Self::Vrf => "vrf",
            Self::Network => "network",
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct VrfRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "VNI")]
    vni: u32,
    #[tabled(rename = "Template")]
    template: String,
}

impl From<&VrfPayload> for VrfRow {
    fn from(v: &VrfPayload) -> Self {
        Self {
            name: v.vrf_name.clone(),
            vni: v.vrf_id,
            template: v.vrf_template.clone(),
        }
    }
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "VNI")]
    vni: u32,
    #[tabled(rename = "VRF")]
    vrf: String,
    #[tabled(rename = "Template")]
    template: String,
}

impl From<&NetworkPayload> for NetworkRow {
    fn from(n: &NetworkPayload) -> Self {
        Self {
            name: n.network_name.clone(),
            vni: n.network_id,
            vrf: n.vrf.clone(),
            template: n.network_template.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

/// Both managers answer the same commands; only the list row differs.
macro_rules! segment_arms {
    ($ctx:expr, $mgr:expr, $kind:expr, $cmd:expr, $row:expr, $id:expr) => {{
        let p = &$ctx.printer;
        match $cmd {
            SegmentCommand::List { fabric } => {
                let list = $mgr.list(&fabric).await?;
                p.list(&list, $row, $id)
            }
            SegmentCommand::Create { fabric, name } => {
                $mgr.create(&fabric, &name).await?;
                p.done(&format!("{} '{name}' created in {fabric}", $kind.noun()));
                Ok(())
            }
            SegmentCommand::Update { fabric, name } => {
                $mgr.update(&fabric, &name).await?;
                p.done(&format!("{} '{name}' updated in {fabric}", $kind.noun()));
                Ok(())
            }
            SegmentCommand::Delete { fabric, name } => {
                let prompt = format!(
                    "Detach {} '{name}' from every switch in {fabric} and delete it?",
                    $kind.noun()
                );
                let action = format!("{} delete", $kind.noun());
                if !util::confirm(&action, &prompt, $ctx.assume_yes)? {
                    return Ok(());
                }
                $mgr.delete(&fabric, &name).await?;
                p.done(&format!("{} '{name}' deleted from {fabric}", $kind.noun()));
                Ok(())
            }
            SegmentCommand::Plan { fabric } => p.plan(&$mgr.plan(&fabric).await?),
            SegmentCommand::Sync { fabric } => p.report(&$mgr.sync(&fabric).await?),
            SegmentCommand::Attach(t) => p.report(&$mgr.attach(&t.fabric, &t.role, &t.switch).await?),
            SegmentCommand::Detach(t) => p.report(&$mgr.detach(&t.fabric, &t.role, &t.switch).await?),
            SegmentCommand::SyncAttachments(t) => {
                p.report(&$mgr.sync_attachments(&t.fabric, &t.role, &t.switch).await?)
            }
        }
    }};
}

pub async fn handle(ctx: &Context, kind: Segment, args: SegmentArgs) -> Result<(), CliError> {
    let client = ctx.client().await?;

    match kind {
        Segment::Vrf => {
            let vrfs = VrfManager::new(&ctx.loader, &client);
            segment_arms!(
                ctx,
                vrfs,
                kind,
                args.command,
                |v: &VrfPayload| VrfRow::from(v),
                |v: &VrfPayload| v.vrf_name.clone()
            )
        }
        Segment::Network => {
            let networks = NetworkManager::new(&ctx.loader, &client);
            segment_arms!(
                ctx,
                networks,
                kind,
                args.command,
                |n: &NetworkPayload| NetworkRow::from(n),
                |n: &NetworkPayload| n.network_name.clone()
            )
        }
    }
}
