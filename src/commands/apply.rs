//! Apply command: converge remote state to the local declarations.

use anyhow::Result;
use colored::Colorize;

use reconcile::{Outcome, ReconcileSummary, Reconciler};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::commands::Session;
use crate::progress;
use crate::ui;

pub fn run(ctx: &Context, session: &Session, args: ApplyArgs) -> Result<()> {
    ui::header("Applying Configuration");

    let resources = session.load_resources(args.target.as_deref())?;
    if resources.is_empty() {
        ui::warn("No declared resources found");
        return Ok(());
    }

    ui::kv("Remote", &session.config.url);
    ui::kv("Resources", &resources.len().to_string());

    if ctx.verbose > 0 {
        for resource in &resources {
            ui::dim(&format!("{}/{}", resource.kind, resource.name()));
        }
    }

    let reconciler = Reconciler::new(&session.registry);

    if args.dry_run {
        ui::warn("Dry run - no changes will be made");
        println!();
        for resource in &resources {
            match reconciler.plan(resource) {
                Ok(Outcome::Created) => {
                    println!("  {} {}/{} would be created", "+".green(), resource.kind, resource.name());
                }
                Ok(Outcome::Updated) => {
                    println!("  {} {}/{} would be updated", "~".yellow(), resource.kind, resource.name());
                }
                Ok(Outcome::Unchanged) => {
                    if !ctx.quiet {
                        println!("  {} {}/{} unchanged", "✓".green(), resource.kind, resource.name());
                    }
                }
                Err(e) => {
                    println!("  {} {}/{}: {}", "✗".red(), resource.kind, resource.name(), e);
                }
            }
        }
        return Ok(());
    }

    if !args.yes {
        let prompt = format!("Apply {} resources to {}?", resources.len(), session.config.url);
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        if !confirmed {
            ui::warn("Aborted");
            return Ok(());
        }
    }

    let pb = progress::spinner(&format!("Reconciling {} resources...", resources.len()));
    let reports = reconciler.reconcile_all(&resources, args.jobs);
    pb.finish_and_clear();

    for report in &reports {
        match &report.result {
            Ok(Outcome::Created) => {
                println!("  {} {}/{} created", "+".green(), report.kind, report.uid);
            }
            Ok(Outcome::Updated) => {
                println!("  {} {}/{} updated", "~".yellow(), report.kind, report.uid);
            }
            Ok(Outcome::Unchanged) => {
                if !ctx.quiet {
                    println!("  {} {}/{} unchanged", "✓".green(), report.kind, report.uid);
                }
            }
            Err(e) => {
                println!("  {} {}/{}: {}", "✗".red(), report.kind, report.uid, e);
            }
        }
    }

    let summary = ReconcileSummary::from_reports(&reports);
    println!();
    if summary.is_success() {
        ui::success(&format!(
            "{} created, {} updated, {} unchanged",
            summary.created, summary.updated, summary.unchanged
        ));
    } else {
        ui::error(&format!(
            "{} created, {} updated, {} unchanged, {} failed",
            summary.created, summary.updated, summary.unchanged, summary.failed
        ));
        anyhow::bail!("{} resource(s) failed to reconcile", summary.failed);
    }

    Ok(())
}
