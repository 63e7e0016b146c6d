//! Config subcommand handlers.

use homepilot_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &homepilot_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = crate::effective_config(global)?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
                format => output::render_single(format, &cfg, |_| String::new(), |_| String::new())?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init(init) => write_config(&init, global),
    }
}

fn write_config(init: &InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = homepilot_config::config_path();
    if path.exists() && !init.force {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let Some(url) = global.url.clone() else {
        return Err(CliError::Validation {
            field: "url".into(),
            reason: "pass the hub address with --url".into(),
        });
    };

    let cfg = Config {
        url: Some(url),
        inverted: global.inverted,
        timeout: global.timeout.unwrap_or(Config::default().timeout),
        prune_missing: init.prune_missing,
    };
    // Reject anything the platform config would refuse later.
    homepilot_config::to_platform_config(&cfg)?;

    let written = homepilot_config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Wrote {}", written.display());
    }
    Ok(())
}
