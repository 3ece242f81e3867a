//! Diff command: show what apply would change, as unified text diffs of the
//! normalized resources.

use anyhow::Result;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use reconcile::{Outcome, Reconciler, Resource};

use crate::Context;
use crate::cli::DiffArgs;
use crate::commands::Session;
use crate::ui;

pub fn run(ctx: &Context, session: &Session, args: DiffArgs) -> Result<()> {
    ui::header("Configuration Diff");

    let resources = session.load_resources(args.target.as_deref())?;
    if resources.is_empty() {
        ui::warn("No declared resources found");
        return Ok(());
    }

    let reconciler = Reconciler::new(&session.registry);
    let mut has_changes = false;

    for resource in &resources {
        match reconciler.plan(resource) {
            Ok(Outcome::Unchanged) => {
                if !ctx.quiet {
                    ui::dim(&format!("{}/{} unchanged", resource.kind, resource.name()));
                }
            }
            Ok(Outcome::Created) => {
                has_changes = true;
                println!();
                println!(
                    "{} {}/{} (will be created)",
                    "+".green().bold(),
                    resource.kind.bold(),
                    resource.name().bold()
                );
                let handler = session.registry.get(&resource.kind)?;
                let rendered = render(&handler.unprepare(resource))?;
                for line in rendered.lines() {
                    println!("  {} {}", "+".green(), line.green());
                }
            }
            Ok(Outcome::Updated) => {
                has_changes = true;
                let handler = session.registry.get(&resource.kind)?;
                let existing = handler.get_remote(resource)?;

                let remote = render(&handler.unprepare(&existing))?;
                let local = render(&handler.unprepare(resource))?;

                println!();
                println!(
                    "{} {}/{}",
                    "~".yellow().bold(),
                    resource.kind.bold(),
                    resource.name().bold()
                );
                print_unified(&remote, &local);
            }
            Err(e) => {
                has_changes = true;
                ui::error(&format!("{}/{}: {}", resource.kind, resource.name(), e));
            }
        }
    }

    if !has_changes {
        println!();
        ui::success("No changes - remote state matches declarations");
    }

    Ok(())
}

fn render(resource: &Resource) -> Result<String> {
    let value = resource.to_value()?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn print_unified(old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    for change in diff.iter_all_changes() {
        let line = change.value().trim_end_matches('\n');
        match change.tag() {
            ChangeTag::Delete => println!("  {} {}", "-".red(), line.red()),
            ChangeTag::Insert => println!("  {} {}", "+".green(), line.green()),
            ChangeTag::Equal => println!("    {}", line.dimmed()),
        }
    }
}
