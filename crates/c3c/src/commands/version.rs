//! Version command

use anyhow::Result;
use c3c_update::version::ReleaseChannel;
use camino::Utf8Path;
use serde::Serialize;

use crate::cli::VersionArgs;

/// Versions of the updater and the installation it manages
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    /// Version of this binary
    pub updater: String,

    /// Version reported by the installation's package manifest
    pub installed: String,

    /// Release channel of the installed version
    pub channel: String,

    /// Whether the installation is a source-control checkout
    pub checkout: bool,
}

impl VersionReport {
    fn display(&self) -> String {
        let mut lines = vec![
            format!("c3c-update {}", self.updater),
            format!("C3C        {} ({})", self.installed, self.channel),
        ];
        if self.checkout {
            lines.push("Install:   git checkout".to_string());
        } else {
            lines.push("Install:   release snapshot".to_string());
        }
        lines.join("\n")
    }
}

pub async fn run(args: VersionArgs, root: &Utf8Path) -> Result<()> {
    let updater = super::load_updater(root).await?;
    let context = updater.context();

    let report = VersionReport {
        updater: c3c_update::VERSION.to_string(),
        installed: context.current_version.to_string(),
        channel: ReleaseChannel::of(&context.current_version).to_string(),
        checkout: context.repository.is_checkout,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.display());
    }
    Ok(())
}
