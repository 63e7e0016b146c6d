//! Command dispatch: bridges CLI args -> registry/adapters -> output formatting.

pub mod blinds;
pub mod config_cmd;

use std::sync::Arc;

use homepilot_core::host::memory::InMemoryHost;
use homepilot_core::{PlatformConfig, Registry};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// A discovered hub: the registry plus the host holding its accessories.
pub struct Session {
    pub registry: Registry,
    pub host: Arc<InMemoryHost>,
}

impl Session {
    /// Connect and run one discovery cycle, surfacing any failure.
    async fn discover(platform: PlatformConfig) -> Result<Self, CliError> {
        let host = Arc::new(InMemoryHost::new());
        let registry = Registry::new(platform, host.clone())?;
        let report = registry.try_discover().await?;
        tracing::debug!(
            added = report.added.len(),
            skipped = report.skipped.len(),
            "discovery finished"
        );
        Ok(Self { registry, host })
    }
}

/// Dispatch a hub-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    platform: PlatformConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = Session::discover(platform).await?;
    match cmd {
        Command::Discover => blinds::list(&session, global),
        Command::Get(args) => blinds::get(&session, args, global).await,
        Command::Set(args) => blinds::set(&session, args, global).await,
        // Handled before a hub connection is made
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
