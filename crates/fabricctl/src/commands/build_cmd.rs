//! `fabricctl build`: the end-to-end bring-up.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use fabricctl_core::{BuildOptions, BuildPipeline, BuildStage, BuildSummary};

use crate::cli::{BuildArgs, OutputFormat};
use crate::config::Context;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, Tabled, Serialize)]
struct StageRow {
    #[tabled(rename = "Stage")]
    stage: BuildStage,
    #[tabled(rename = "Ok")]
    ok: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
}

#[derive(Serialize)]
struct BuildView {
    stages: Vec<StageRow>,
    pending_path: String,
    pending_lines: usize,
    failures: Vec<String>,
}

impl From<&BuildSummary> for BuildView {
    fn from(s: &BuildSummary) -> Self {
        Self {
            stages: s
                .stages
                .iter()
                .map(|st| StageRow {
                    stage: st.stage,
                    ok: st.report.succeeded(),
                    failed: st.report.failed(),
                })
                .collect(),
            pending_path: s.pending_path.display().to_string(),
            pending_lines: s.pending_lines,
            failures: s
                .stages
                .iter()
                .flat_map(|st| {
                    st.report.outcomes.iter().filter_map(move |o| {
                        o.error
                            .as_ref()
                            .map(|e| format!("{}: {} {}: {e}", st.stage, o.phase, o.identity))
                    })
                })
                .collect(),
        }
    }
}

fn spinner(ctx: &Context) -> Option<ProgressBar> {
    if ctx.printer.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message("building fabrics");
    bar.enable_steady_tick(Duration::from_millis(120));
    Some(bar)
}

pub async fn handle(ctx: &Context, args: BuildArgs) -> Result<(), CliError> {
    let password = ctx.switch_password()?;
    let client = ctx.client().await?;
    let options = BuildOptions {
        preserve_config: args.preserve_config,
    };

    let bar = spinner(ctx);
    let result = BuildPipeline::new(&ctx.loader, &client, &password, options)
        .run()
        .await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let summary = result?;

    let view = BuildView::from(&summary);
    let p = &ctx.printer;
    match p.format {
        OutputFormat::Table | OutputFormat::Plain => {
            p.list(&view.stages, |r| *r, |r| r.stage.to_string())?;
            for failure in &view.failures {
                p.print(failure);
            }
            p.done(&format!(
                "{} pending line(s) written to {}; review, then run `fabricctl fabric deploy`",
                view.pending_lines, view.pending_path
            ));
        }
        _ => p.single(&view, |_| String::new())?,
    }

    if summary.is_success() {
        return Ok(());
    }
    let total = summary.stages.iter().map(|s| s.report.outcomes.len()).sum();
    Err(CliError::PartialSync {
        kind: "build".into(),
        failed: summary.failed(),
        total,
        details: view.failures.join("\n"),
    })
}
