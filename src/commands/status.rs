//! Status command: one line per declared resource, grouped by kind.

use anyhow::Result;
use colored::Colorize;

use reconcile::{Outcome, Reconciler};

use crate::Context;
use crate::cli::StatusArgs;
use crate::commands::Session;
use crate::ui;

pub fn run(_ctx: &Context, session: &Session, args: StatusArgs) -> Result<()> {
    ui::header("Status");
    ui::kv("Remote", &session.config.url);

    let resources = session.load_resources(args.target.as_deref())?;
    if resources.is_empty() {
        ui::warn("No declared resources found");
        return Ok(());
    }

    let reconciler = Reconciler::new(&session.registry);
    let mut current_kind = String::new();
    let mut pending = 0usize;
    let mut failed = 0usize;

    for resource in &resources {
        if resource.kind != current_kind {
            ui::section(&resource.kind);
            current_kind.clone_from(&resource.kind);
        }

        match reconciler.plan(resource) {
            Ok(Outcome::Unchanged) => {
                println!("  {} {}", "✓".green(), resource.name());
            }
            Ok(Outcome::Created) => {
                pending += 1;
                println!("  {} {} {}", "+".green(), resource.name(), "(missing remotely)".dimmed());
            }
            Ok(Outcome::Updated) => {
                pending += 1;
                println!("  {} {} {}", "~".yellow(), resource.name(), "(differs)".dimmed());
            }
            Err(e) => {
                failed += 1;
                println!("  {} {} {}", "✗".red(), resource.name(), e.to_string().dimmed());
            }
        }
    }

    println!();
    if pending == 0 && failed == 0 {
        ui::success("Everything converged");
    } else if failed == 0 {
        ui::warn(&format!("{} resource(s) pending; run apply", pending));
    } else {
        ui::error(&format!("{} pending, {} failed", pending, failed));
    }

    Ok(())
}
