//! Install command

use anyhow::{bail, Result};
use camino::Utf8Path;
use dialoguer::Confirm;

use crate::cli::InstallArgs;
use crate::output;

pub async fn run(args: InstallArgs, root: &Utf8Path) -> Result<()> {
    let updater = super::load_updater(root).await?;

    let spinner = output::spinner("Checking for updates...");
    let decision = updater.check_for_update(false).await;
    spinner.finish_and_clear();
    super::check::print_decision(&decision);

    if !decision.available && !args.force {
        if decision.degraded {
            output::info("Use --force to attempt the update anyway");
        }
        return Ok(());
    }

    if !args.yes {
        let method = if updater.context().repository.is_checkout {
            "pull the latest commits"
        } else {
            "overwrite files with the latest release"
        };
        let confirmed = Confirm::new()
            .with_prompt(format!("This will {} in {}. Continue?", method, root))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Update cancelled");
            return Ok(());
        }
    }

    let spinner = output::spinner("Applying update...");
    let outcome = updater.install_update().await;
    spinner.finish_and_clear();

    if outcome.succeeded {
        output::success("Update applied");
        output::kv("Detail", &outcome.detail);
        output::info("Restart C3C to use the new version");
        Ok(())
    } else {
        output::error(&format!(
            "Update failed while {}: {}",
            outcome.stage, outcome.detail
        ));
        bail!("update failed ({})", outcome.detail)
    }
}
