//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

fn detail(cfg: &Config) -> String {
    let devices_file = cfg
        .devices_file
        .as_ref()
        .map_or_else(|| "(not set)".to_owned(), |p| p.display().to_string());
    [
        format!("Config file:   {}", config::config_path().display()),
        format!("State file:    {}", cfg.devicetree_path().display()),
        format!("Device dump:   {devices_file}"),
        format!("Output:        {}", cfg.defaults.output),
        format!("Color:         {}", cfg.defaults.color),
        format!("View name:     {}", cfg.defaults.view_name),
    ]
    .join("\n")
}

/// Fold global flags into the loaded config so `show` and `init`
/// reflect what a command would actually use.
fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(dir) = &global.state_dir {
        cfg.state_dir = Some(dir.clone());
    }
    if let Some(file) = &global.devices_file {
        cfg.devices_file = Some(file.clone());
    }
}

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            apply_overrides(&mut cfg, global);
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = output::render_single(format, &cfg, detail, |c| {
                c.devicetree_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists { path });
            }

            let mut cfg = config::load_config()?;
            apply_overrides(&mut cfg, global);
            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Wrote {}", written.display());
            }
            Ok(())
        }
    }
}
