//! Interface command handlers.

use serde::Serialize;
use tabled::Tabled;

use fabricctl_api::types::InterfaceGroup;
use fabricctl_core::{InterfaceManager, InterfaceUpdate};

use crate::cli::{InterfaceArgs, InterfaceCommand};
use crate::config::Context;
use crate::error::CliError;

// ── Table row ───────────────────────────────────────────────────────

/// One row per interface; the controller groups them by policy.
#[derive(Serialize)]
struct InterfaceEntry {
    name: String,
    policy: String,
    admin_state: String,
}

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Policy")]
    policy: String,
    #[tabled(rename = "Admin")]
    admin_state: String,
}

impl From<&InterfaceEntry> for InterfaceRow {
    fn from(e: &InterfaceEntry) -> Self {
        Self {
            name: e.name.clone(),
            policy: e.policy.clone(),
            admin_state: e.admin_state.clone(),
        }
    }
}

fn flatten(groups: &[InterfaceGroup]) -> Vec<InterfaceEntry> {
    groups
        .iter()
        .flat_map(|g| {
            g.interfaces.iter().map(|i| InterfaceEntry {
                name: i.if_name.clone(),
                policy: g.policy.clone(),
                admin_state: i
                    .nv_pairs
                    .get("ADMIN_STATE")
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
                    .unwrap_or_else(|| "-".into()),
            })
        })
        .collect()
}

fn update_detail(u: &InterfaceUpdate) -> String {
    let mut lines = vec![
        format!("Policy requests: {}", u.policy_requests),
        format!("Admin requests:  {}", u.admin_requests),
    ];
    if u.closed.is_empty() {
        lines.push("Closed:          -".into());
    } else {
        lines.push(format!("Closed:          {}", u.closed.join(", ")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: InterfaceArgs) -> Result<(), CliError> {
    let client = ctx.client().await?;
    let interfaces = InterfaceManager::new(&ctx.loader, &client);
    let p = &ctx.printer;

    match args.command {
        InterfaceCommand::Update(t) => {
            let update = interfaces.update(&t.fabric, &t.role, &t.switch).await?;
            p.single(&update, update_detail)
        }

        InterfaceCommand::UpdateAll { fabric } => p.report(&interfaces.update_all(&fabric).await?),

        InterfaceCommand::List { serial } => {
            let entries = flatten(&interfaces.list(&serial).await?);
            p.list(&entries, |x| InterfaceRow::from(x), |e| e.name.clone())
        }
    }
}
