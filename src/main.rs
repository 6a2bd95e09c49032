use clap::Parser;
use folio::core::config::{
    ConfigError, EnvOverrides, ResolvedConfig, config_base_dir, load_config, resolve,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio", about = "Portfolio assistant chat in the terminal")]
struct Args {
    /// Model to request (overrides config file and OPENROUTER_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Config file to read instead of ~/.folio/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Loads the config file named by `--config` (or the default one) and
/// layers env and CLI values on top.
fn load_settings(args: &Args, env: &EnvOverrides) -> Result<ResolvedConfig, ConfigError> {
    let explicit = args.config.as_deref();
    let file_config = load_config(explicit)?;
    let base_dir = config_base_dir(explicit);
    Ok(resolve(
        &file_config,
        env,
        args.model.as_deref(),
        base_dir.as_deref(),
    ))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger: stdout belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("folio.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match load_settings(&args, &EnvOverrides::from_env()) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Startup aborted: {}", e);
            eprintln!("folio: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Folio starting up: model={}, base_url={}",
        config.model_name,
        config.openrouter_base_url
    );

    folio::tui::run(config)
}
