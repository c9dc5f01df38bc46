//! Switch command handlers.

use tabled::Tabled;

use fabricctl_api::types::SwitchInventory;
use fabricctl_core::SwitchManager;

use crate::cli::{SwitchArgs, SwitchCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Release")]
    release: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&SwitchInventory> for SwitchRow {
    fn from(s: &SwitchInventory) -> Self {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        Self {
            name: or_dash(&s.logical_name),
            serial: s.serial_number.clone(),
            ip: or_dash(&s.ip_address),
            role: or_dash(&s.switch_role),
            model: or_dash(&s.model),
            release: or_dash(&s.release),
            status: or_dash(&s.status),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: SwitchArgs) -> Result<(), CliError> {
    let client = ctx.client().await?;
    let switches = SwitchManager::new(&ctx.loader, &client);
    let p = &ctx.printer;

    match args.command {
        SwitchCommand::List { fabric } => {
            let list = switches.list(&fabric).await?;
            p.list(&list, |x| SwitchRow::from(x), |s| s.serial_number.clone())
        }

        SwitchCommand::Create {
            target: t,
            preserve_config,
        } => {
            let password = ctx.switch_password()?;
            switches
                .create(&t.fabric, &t.role, &t.switch, &password, preserve_config)
                .await?;
            p.done(&format!("switch '{}' discovered into {}", t.switch, t.fabric));
            Ok(())
        }

        SwitchCommand::CreateAll {
            fabric,
            preserve_config,
        } => {
            let password = ctx.switch_password()?;
            let report = switches.create_all(&fabric, &password, preserve_config).await?;
            p.report(&report)
        }

        SwitchCommand::Delete(t) => {
            let prompt = format!("Remove switch '{}' from {}?", t.switch, t.fabric);
            if !util::confirm("switch delete", &prompt, ctx.assume_yes)? {
                return Ok(());
            }
            switches.delete(&t.fabric, &t.role, &t.switch).await?;
            p.done(&format!("switch '{}' removed", t.switch));
            Ok(())
        }

        SwitchCommand::Role(t) => {
            switches.set_role(&t.fabric, &t.role, &t.switch).await?;
            p.done(&format!("role assigned to '{}'", t.switch));
            Ok(())
        }

        SwitchCommand::Hostname { target: t, hostname } => {
            switches
                .set_hostname(&t.fabric, &t.role, &t.switch, &hostname)
                .await?;
            p.done(&format!("'{}' renamed to '{hostname}'", t.switch));
            Ok(())
        }

        SwitchCommand::ChangeIp { target: t, ip } => {
            switches.change_ip(&t.fabric, &t.role, &t.switch, &ip).await?;
            p.done(&format!("'{}' now discovered at {ip}", t.switch));
            Ok(())
        }

        SwitchCommand::Rediscover(t) => {
            switches.rediscover(&t.fabric, &t.role, &t.switch).await?;
            p.done(&format!("'{}' rediscovered", t.switch));
            Ok(())
        }

        SwitchCommand::Deploy(t) => {
            let prompt = format!("Deploy pending config to switch '{}'?", t.switch);
            if !util::confirm("switch deploy", &prompt, ctx.assume_yes)? {
                return Ok(());
            }
            switches.deploy(&t.fabric, &t.role, &t.switch).await?;
            p.done(&format!("'{}' deployed", t.switch));
            Ok(())
        }
    }
}
