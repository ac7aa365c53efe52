pub mod types;
pub mod validation;

use clap::Parser;
use std::time::Duration;

use crate::magnifier::MagnifierSettings;
use crate::model::RoundCatalog;
pub use types::{Args, CleanArgs};

/// # Errors
///
/// Returns an error if the rounds file parsed by clap does not hold valid round configs.
pub fn args_checks() -> Result<CleanArgs, crate::error::ScoringError> {
    let args = Args::parse();
    clean_args(args)
}

/// # Errors
///
/// Returns an error if the rounds JSON does not deserialize into valid round configs.
pub fn clean_args(args: Args) -> Result<CleanArgs, crate::error::ScoringError> {
    let catalog = match args.rounds_json {
        Some(json) => RoundCatalog::from_json(json)?,
        None => RoundCatalog::builtin(),
    };
    Ok(CleanArgs {
        bind: args.bind,
        port: args.port,
        catalog,
        autosave_ms: args.autosave_ms,
        magnifier: MagnifierSettings {
            hold_ms: args.hold_ms,
            lens_px: args.lens_px,
            zoom: args.zoom,
            ..MagnifierSettings::default()
        },
        session_idle: Duration::from_secs(args.idle_minutes.saturating_mul(60)),
    })
}
