//! Pull command: write remote resources back into the local store.
//!
//! Pull never deletes local files; it only adds or overwrites at the
//! conventional per-kind paths.

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::PullArgs;
use crate::commands::Session;
use crate::progress;
use crate::ui;

pub fn run(ctx: &Context, session: &Session, args: PullArgs) -> Result<()> {
    ui::header("Pulling Remote Resources");
    ui::kv("Remote", &session.config.url);
    ui::kv("Into", &session.store.root().display().to_string());

    let mut written = 0usize;
    let mut failed = 0usize;

    for handler in session.registry.handlers() {
        if let Some(kind) = &args.kind
            && !handler.kind().eq_ignore_ascii_case(kind)
        {
            continue;
        }

        ui::section(handler.kind());

        let uids = match handler.list_remote() {
            Ok(uids) => uids,
            Err(e) => {
                ui::error(&format!("Could not list {}: {}", handler.kind(), e));
                failed += 1;
                continue;
            }
        };

        if uids.is_empty() {
            ui::dim("none");
            continue;
        }

        let pb = progress::bar(uids.len() as u64, handler.kind());
        for uid in &uids {
            pb.set_message(uid.clone());
            match handler
                .get_by_uid(uid)
                .map(|r| handler.unprepare(&r))
                .map_err(anyhow::Error::from)
                .and_then(|r| session.store.write(handler.as_ref(), &r))
            {
                Ok(path) => {
                    written += 1;
                    if !ctx.quiet {
                        pb.println(format!("  {} {}", "✓".green(), path.display()));
                    }
                }
                Err(e) => {
                    failed += 1;
                    pb.println(format!("  {} {}: {}", "✗".red(), uid, e));
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    println!();
    if failed == 0 {
        ui::success(&format!("Pulled {} resource(s)", written));
    } else {
        ui::error(&format!("Pulled {}, {} failed", written, failed));
        anyhow::bail!("{} resource(s) failed to pull", failed);
    }

    Ok(())
}
