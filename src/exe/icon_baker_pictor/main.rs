use std::path::Path;
use baker_pictor::core::{scan_sources, IconBakerConfig, IconBatch};
use baker_pictor::hosts::SoftwareHost;
use clap::Parser;
use nab_pictor::app::{set_panic_hook, AppRun, ExitReason};

// All tunables come from pictor.toml
#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs
{

}

fn main() -> ExitReason
{
    let app_run = AppRun::<CliArgs>::startup("Icon Baker", env!("CARGO_PKG_VERSION"));
    set_panic_hook();

    let config = match IconBakerConfig::load_or_default(Path::new(IconBakerConfig::DEFAULT_FILE_NAME))
    {
        Ok(config) => config,
        Err(err) =>
        {
            log::error!("Failed to load {}: {err}", IconBakerConfig::DEFAULT_FILE_NAME);
            app_run.set_exit_reason(ExitReason::ConfigError);
            return app_run.get_exit_reason();
        }
    };

    let host = SoftwareHost::new(config.render_settings());
    let mut batch = match IconBatch::from_config(host, &config)
    {
        Ok(batch) => batch,
        Err(err) =>
        {
            log::error!("Invalid configuration: {err}");
            app_run.set_exit_reason(ExitReason::ConfigError);
            return app_run.get_exit_reason();
        }
    };

    let models_path = config.models_path();
    let sources = match scan_sources(&models_path, config.extensions())
    {
        Ok(sources) => sources,
        Err(err) =>
        {
            log::error!("Failed to scan {models_path:?}: {err}");
            app_run.set_exit_reason(ExitReason::ConfigError);
            return app_run.get_exit_reason();
        }
    };
    log::info!("Found {} models in {models_path:?}, writing icons to {:?}", sources.len(), batch.output_dir());

    let summary = batch.run(&sources);
    for (name, err) in summary.failures()
    {
        log::warn!("  {name}: {err}");
    }
    log::info!("Done: {summary}");

    app_run.get_exit_reason()
}
