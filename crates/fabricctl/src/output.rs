//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use fabricctl_core::{SyncPlan, SyncReport};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Resolved presentation options for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Printer {
    pub fn new(format: OutputFormat, color: ColorMode, quiet: bool) -> Self {
        Self {
            format,
            color: should_color(color),
            quiet,
        }
    }

    /// Render and print a list of items.
    pub fn list<T, R>(
        &self,
        data: &[T],
        to_row: impl Fn(&T) -> R,
        id_fn: impl Fn(&T) -> String,
    ) -> Result<(), CliError>
    where
        T: Serialize,
        R: Tabled,
    {
        let out = match self.format {
            OutputFormat::Table => render_table(&data.iter().map(to_row).collect::<Vec<_>>()),
            OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
            _ => self.structured(data)?,
        };
        self.print(&out);
        Ok(())
    }

    /// Render and print one serializable value; `detail` is the table view.
    pub fn single<T: Serialize + ?Sized>(&self, data: &T, detail: impl FnOnce(&T) -> String) -> Result<(), CliError> {
        let out = match self.format {
            OutputFormat::Table | OutputFormat::Plain => detail(data),
            _ => self.structured(data)?,
        };
        self.print(&out);
        Ok(())
    }

    /// Outcome table plus a summary count for a sync or batch run. Fails
    /// with the partial-sync error when any action failed.
    pub fn report(&self, report: &SyncReport) -> Result<(), CliError> {
        let out = self.render_report(report)?;
        self.print(&out);
        ensure_success(report)
    }

    fn render_report(&self, report: &SyncReport) -> Result<String, CliError> {
        match self.format {
            OutputFormat::Table | OutputFormat::Plain => {
                let rows: Vec<OutcomeRow> = report
                    .outcomes
                    .iter()
                    .map(|o| OutcomeRow {
                        identity: o.identity.clone(),
                        action: o.phase.to_string(),
                        result: match &o.error {
                            None => self.paint_ok("ok"),
                            Some(e) => self.paint_err(&e.to_string()),
                        },
                    })
                    .collect();
                let summary = format!(
                    "{}: {} succeeded, {} failed",
                    report.kind,
                    report.succeeded(),
                    report.failed()
                );
                if rows.is_empty() {
                    Ok(summary)
                } else {
                    Ok(format!("{}\n{summary}", render_table(&rows)))
                }
            }
            _ => self.structured(&ReportView::from(report)),
        }
    }

    pub fn plan(&self, plan: &SyncPlan<String>) -> Result<(), CliError> {
        self.single(plan, |p| {
            let mut lines = Vec::new();
            for (label, keys) in [
                ("delete", &p.to_delete),
                ("update", &p.to_update),
                ("create", &p.to_create),
            ] {
                for key in keys {
                    lines.push(format!("{label:<7} {key}"));
                }
            }
            if lines.is_empty() {
                "nothing declared or observed".into()
            } else {
                lines.join("\n")
            }
        })
    }

    /// One-line confirmation of a completed action, to stderr.
    pub fn done(&self, message: &str) {
        if self.quiet {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{} {message}", self.paint_ok("✓"));
    }

    pub fn print(&self, output: &str) {
        if self.quiet || output.is_empty() {
            return;
        }
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{output}");
    }

    fn structured<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, CliError> {
        let rendered = match self.format {
            OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
            OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
            _ => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        };
        rendered.map_err(CliError::Render)
    }

    fn paint_ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_owned()
        }
    }

    fn paint_err(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_owned()
        }
    }
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// `Err(PartialSync)` listing every failed identity.
pub fn ensure_success(report: &SyncReport) -> Result<(), CliError> {
    Ok(report.check()?)
}

// ── Report rows ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Result")]
    result: String,
}

#[derive(Serialize)]
struct OutcomeView {
    identity: String,
    action: String,
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    kind: String,
    plan: &'a SyncPlan<String>,
    outcomes: Vec<OutcomeView>,
    succeeded: usize,
    failed: usize,
}

impl<'a> From<&'a SyncReport> for ReportView<'a> {
    fn from(report: &'a SyncReport) -> Self {
        Self {
            kind: report.kind.to_string(),
            plan: &report.plan,
            outcomes: report
                .outcomes
                .iter()
                .map(|o| OutcomeView {
                    identity: o.identity.clone(),
                    action: o.phase.to_string(),
                    error: o.error.as_ref().map(ToString::to_string),
                })
                .collect(),
            succeeded: report.succeeded(),
            failed: report.failed(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fabricctl_core::{CoreError, EntityKind, Phase};

    use super::*;

    fn printer(format: OutputFormat) -> Printer {
        Printer::new(format, ColorMode::Never, false)
    }

    fn mixed_report() -> SyncReport {
        let mut report = SyncReport::empty(EntityKind::Vrf);
        report.record("greenvrf", Phase::Delete, Ok(()));
        report.record("bluevrf", Phase::Update, Ok(()));
        report.record(
            "redvrf",
            Phase::Create,
            Err(CoreError::ControllerApi {
                status: 400,
                body: "vlan in use".into(),
            }),
        );
        report
    }

    #[test]
    fn table_report_ends_with_summary_count() {
        let out = printer(OutputFormat::Table)
            .render_report(&mixed_report())
            .unwrap();
        assert!(out.contains("greenvrf"));
        assert!(out.contains("vlan in use"));
        assert_eq!(out.lines().last(), Some("vrf: 2 succeeded, 1 failed"));
    }

    #[test]
    fn clean_report_still_prints_summary() {
        let mut report = SyncReport::empty(EntityKind::Network);
        report.record("web", Phase::Create, Ok(()));
        let p = printer(OutputFormat::Plain);
        let out = p.render_report(&report).unwrap();
        assert_eq!(out.lines().last(), Some("network: 1 succeeded, 0 failed"));
        assert!(ensure_success(&report).is_ok());

        let empty = SyncReport::empty(EntityKind::Network);
        assert_eq!(
            p.render_report(&empty).unwrap(),
            "network: 0 succeeded, 0 failed"
        );
    }

    #[test]
    fn structured_report_carries_counts() {
        let out = printer(OutputFormat::Json)
            .render_report(&mixed_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["succeeded"], 2);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["outcomes"][2]["action"], "create");
    }

    #[test]
    fn failed_actions_become_partial_sync() {
        match ensure_success(&mixed_report()) {
            Err(CliError::PartialSync {
                kind,
                failed,
                total,
                details,
            }) => {
                assert_eq!(kind, "vrf");
                assert_eq!((failed, total), (1, 3));
                assert!(details.contains("redvrf"));
            }
            other => panic!("expected PartialSync, got {other:?}"),
        }
    }
}
