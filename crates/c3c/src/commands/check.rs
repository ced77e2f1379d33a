//! Check command

use anyhow::Result;
use c3c_update::UpdateDecision;
use camino::Utf8Path;

use crate::cli::CheckArgs;
use crate::output;

pub async fn run(args: CheckArgs, root: &Utf8Path) -> Result<()> {
    let updater = super::load_updater(root).await?;

    let decision = if args.json {
        updater.check_for_update(args.stable).await
    } else {
        let spinner = output::spinner("Checking for updates...");
        let decision = updater.check_for_update(args.stable).await;
        spinner.finish_and_clear();
        decision
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        print_decision(&decision);
    }
    Ok(())
}

pub(crate) fn print_decision(decision: &UpdateDecision) {
    output::kv("Installed", &decision.local_identifier);
    output::kv("Remote", &decision.remote_identifier);

    if decision.degraded {
        output::warning("Could not reach GitHub (rate limited or offline)");
    } else if decision.available {
        output::success(&format!(
            "Update available: {}",
            decision.remote_identifier
        ));
        output::info("Run 'c3c-update install' to apply it");
    } else {
        output::success("Already on the latest version");
    }
}
