//! Fabric command handlers.

use serde::Serialize;
use tabled::Tabled;

use fabricctl_api::types::FabricSummary;
use fabricctl_core::manager::build_payload;
use fabricctl_core::{FabricManager, FabricStage};

use crate::cli::{FabricArgs, FabricCommand, MsdCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FabricRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    fabric_type: String,
    #[tabled(rename = "Template")]
    template: String,
    #[tabled(rename = "Technology")]
    technology: String,
}

impl From<&FabricSummary> for FabricRow {
    fn from(f: &FabricSummary) -> Self {
        Self {
            name: f.fabric_name.clone(),
            fabric_type: f.fabric_type.clone().unwrap_or_default(),
            template: f.template_name.clone().unwrap_or_default(),
            technology: f.fabric_technology.clone().unwrap_or_default(),
        }
    }
}

/// Rendered create/update body.
#[derive(Serialize)]
struct PayloadView<'a> {
    fabric: &'a str,
    template: &'a str,
    body: serde_json::Value,
}

#[derive(Serialize)]
struct PendingView {
    fabric: String,
    path: String,
    lines: usize,
}

#[derive(Serialize)]
struct StageView<'a> {
    fabric: &'a str,
    stage: FabricStage,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: FabricArgs) -> Result<(), CliError> {
    let p = &ctx.printer;

    // Rendering the payload never needs the controller.
    if let FabricCommand::Payload { name } = &args.command {
        let payload = build_payload(&ctx.loader, name)?;
        let view = PayloadView {
            fabric: &payload.name,
            template: payload.template,
            body: payload.body(),
        };
        return p.single(&view, |v| {
            let mut lines = vec![format!("{} ({})", v.fabric, v.template)];
            if let serde_json::Value::Object(map) = &v.body {
                let width = map.keys().map(String::len).max().unwrap_or(0);
                for (key, value) in map {
                    let text = value.as_str().map_or_else(|| value.to_string(), str::to_owned);
                    lines.push(format!("  {key:<width$}  {text}"));
                }
            }
            lines.join("\n")
        });
    }

    let client = ctx.client().await?;
    let fabrics = FabricManager::new(&ctx.loader, &client);

    match args.command {
        FabricCommand::List => {
            let list = fabrics.list().await?;
            p.list(&list, |x| FabricRow::from(x), |f| f.fabric_name.clone())
        }

        FabricCommand::Create { name } => {
            let stage = fabrics.create(&name).await?;
            stage_done(ctx, &name, stage)
        }

        FabricCommand::Update { name } => {
            fabrics.update(&name).await?;
            p.done(&format!("fabric '{name}' updated"));
            Ok(())
        }

        FabricCommand::Delete { name } => {
            if !util::confirm("fabric delete", &format!("Delete fabric '{name}'?"), ctx.assume_yes)? {
                return Ok(());
            }
            let stage = fabrics.delete(&name).await?;
            stage_done(ctx, &name, stage)
        }

        FabricCommand::Recalculate { name } => {
            let stage = fabrics.recalculate(&name).await?;
            stage_done(ctx, &name, stage)
        }

        FabricCommand::Pending { name } => {
            let (path, lines) = fabrics.write_pending(&name).await?;
            let view = PendingView {
                fabric: name,
                path: path.display().to_string(),
                lines,
            };
            p.single(&view, |v| format!("{} pending line(s) written to {}", v.lines, v.path))
        }

        FabricCommand::Deploy { name } => {
            if !util::confirm("fabric deploy", &format!("Deploy pending config to '{name}'?"), ctx.assume_yes)? {
                return Ok(());
            }
            let stage = fabrics.deploy(&name).await?;
            stage_done(ctx, &name, stage)
        }

        FabricCommand::DeployWorkflow { name } => {
            // The prompt runs inside the workflow, after pending.txt exists.
            let mut prompt_error = None;
            let stage = fabrics
                .deploy_workflow(&name, |path, lines| {
                    let message = format!(
                        "{lines} pending line(s) written to {}. Deploy '{name}'?",
                        path.display()
                    );
                    match util::confirm("fabric deploy-workflow", &message, ctx.assume_yes) {
                        Ok(answer) => answer,
                        Err(e) => {
                            prompt_error = Some(e);
                            false
                        }
                    }
                })
                .await?;
            if let Some(e) = prompt_error {
                return Err(e);
            }
            stage_done(ctx, &name, stage)
        }

        FabricCommand::Msd(msd) => match msd.command {
            MsdCommand::Add { msd, child } => {
                fabrics.msd_add(&msd, &child).await?;
                p.done(&format!("'{child}' added to '{msd}'"));
                Ok(())
            }
            MsdCommand::Remove { msd, child } => {
                fabrics.msd_remove(&msd, &child).await?;
                p.done(&format!("'{child}' removed from '{msd}'"));
                Ok(())
            }
            MsdCommand::AddChildren { msd } => {
                let report = fabrics.add_children(&msd).await?;
                p.report(&report)
            }
        },

        FabricCommand::Payload { .. } => unreachable!(),
    }
}

fn stage_done(ctx: &Context, fabric: &str, stage: FabricStage) -> Result<(), CliError> {
    let view = StageView { fabric, stage };
    ctx.printer
        .single(&view, |v| format!("{}: {}", v.fabric, v.stage))
}

