mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use homepilot_config::Config;
use homepilot_core::PlatformConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the hub
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "homepilot", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let platform = build_platform_config(&cli.global)?;
            tracing::debug!(command = ?cmd, url = %platform.url, "dispatching command");
            commands::dispatch(cmd, platform, &cli.global).await
        }
    }
}

/// Merge the config file, environment and CLI flag overrides.
pub(crate) fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = homepilot_config::load_config()?;
    if let Some(ref url) = global.url {
        cfg.url = Some(url.clone());
    }
    if global.inverted {
        cfg.inverted = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

fn build_platform_config(global: &GlobalOpts) -> Result<PlatformConfig, CliError> {
    let cfg = effective_config(global)?;
    if cfg.url.is_none() {
        return Err(CliError::NoUrl {
            path: homepilot_config::config_path().display().to_string(),
        });
    }
    Ok(homepilot_config::to_platform_config(&cfg)?)
}
