//! Switch freeform policy command handlers.

use fabricctl_core::PolicyManager;

use crate::cli::{PolicyArgs, PolicyCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

pub async fn handle(ctx: &Context, args: PolicyArgs) -> Result<(), CliError> {
    let client = ctx.client().await?;
    let policies = PolicyManager::new(&ctx.loader, &client);
    let p = &ctx.printer;

    match args.command {
        PolicyCommand::Create(t) => {
            let id = policies.create(&t.fabric, &t.role, &t.switch).await?;
            p.done(&format!("freeform policy {id} created on '{}'", t.switch));
            Ok(())
        }

        PolicyCommand::Delete(t) => {
            let prompt = format!("Delete every freeform policy on '{}'?", t.switch);
            if !util::confirm("policy delete", &prompt, ctx.assume_yes)? {
                return Ok(());
            }
            let removed = policies.delete(&t.fabric, &t.role, &t.switch).await?;
            p.done(&format!("{removed} freeform policy(ies) removed from '{}'", t.switch));
            Ok(())
        }
    }
}
