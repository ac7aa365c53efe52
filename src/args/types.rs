use clap::Parser;
use serde_json::Value;
use std::time::Duration;

use crate::magnifier::{DEFAULT_HOLD_MS, DEFAULT_LENS_PX, DEFAULT_ZOOM, MagnifierSettings};
use crate::model::RoundCatalog;
use crate::mvu::session::DEFAULT_AUTOSAVE_DELAY_MS;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[arg(long, value_name = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: String,
    #[arg(short = 'p', long, value_name = "PORT", default_value_t = 5201)]
    pub port: u16,
    /// Round catalogue. Without it the built-in rounds are offered.
    #[arg(
        short = 'r',
        long,
        value_name = "ROUNDS_JSON",
        value_parser = crate::args::validation::check_readable_file_and_json
    )]
    pub rounds_json: Option<Value>,
    /// Settle delay before a full end saves itself.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = DEFAULT_AUTOSAVE_DELAY_MS)]
    pub autosave_ms: u64,
    /// How long a press must last before the magnifier opens.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = DEFAULT_HOLD_MS)]
    pub hold_ms: u64,
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_LENS_PX, value_parser = crate::args::validation::check_lens_px)]
    pub lens_px: u32,
    #[arg(long, value_name = "FACTOR", default_value_t = DEFAULT_ZOOM, value_parser = crate::args::validation::check_zoom)]
    pub zoom: f32,
    /// Sessions untouched for this long are dropped.
    #[arg(long, value_name = "MINUTES", default_value_t = DEFAULT_SESSION_IDLE_MINUTES)]
    pub idle_minutes: u64,
}

pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 240;

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub bind: String,
    pub port: u16,
    pub catalog: RoundCatalog,
    pub autosave_ms: u64,
    pub magnifier: MagnifierSettings,
    pub session_idle: Duration,
}

impl Default for CleanArgs {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5201,
            catalog: RoundCatalog::builtin(),
            autosave_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            magnifier: MagnifierSettings::default(),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
        }
    }
}
