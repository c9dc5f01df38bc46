//! vPC pair command handlers.

use tabled::Tabled;

use fabricctl_core::VpcManager;
use fabricctl_core::model::VpcPairRecord;

use crate::cli::{VpcArgs, VpcCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VpcRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Peer 1")]
    peer1: String,
    #[tabled(rename = "Peer 2")]
    peer2: String,
    #[tabled(rename = "Policy")]
    policy: String,
    #[tabled(rename = "Port-channel")]
    pcid: String,
}

impl From<&VpcPairRecord> for VpcRow {
    fn from(v: &VpcPairRecord) -> Self {
        Self {
            name: v.name.clone(),
            peer1: v.peer1_serial.clone(),
            peer2: v.peer2_serial.clone(),
            policy: v
                .policy
                .as_ref()
                .map_or_else(|| "-".into(), |p| p.template.clone()),
            pcid: v
                .policy
                .as_ref()
                .map_or_else(|| "-".into(), |p| format!("{}/{}", p.peer1_pcid, p.peer2_pcid)),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: VpcArgs) -> Result<(), CliError> {
    let p = &ctx.printer;

    match args.command {
        // Listing reads the YAML only.
        VpcCommand::List { fabric } => {
            let pairs = ctx.loader.vpc_pairs(&fabric)?;
            p.list(&pairs, |x| VpcRow::from(x), |v| v.name.clone())
        }

        VpcCommand::Create { fabric, stem } => {
            let client = ctx.client().await?;
            VpcManager::new(&ctx.loader, &client)
                .create(&fabric, &stem)
                .await?;
            p.done(&format!("vPC pair '{stem}' created in {fabric}"));
            Ok(())
        }

        VpcCommand::Delete { fabric, stem } => {
            let prompt = format!("Remove vPC pair '{stem}' from {fabric}?");
            if !util::confirm("vpc delete", &prompt, ctx.assume_yes)? {
                return Ok(());
            }
            let client = ctx.client().await?;
            VpcManager::new(&ctx.loader, &client)
                .delete(&fabric, &stem)
                .await?;
            p.done(&format!("vPC pair '{stem}' removed from {fabric}"));
            Ok(())
        }
    }
}
