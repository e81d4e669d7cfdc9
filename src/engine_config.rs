use std::fs;
use std::io::ErrorKind;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Engine tuning constants. The pixel thresholds are calibration values
/// tuned against a specific capture resolution and should be re-tuned if the
/// target resolution changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    // -------- IMPORT SETTINGS
    /// Width (px) newly imported images are scaled to
    pub default_import_width: u32,

    // -------- GESTURE SETTINGS
    /// Max distance (px) between index and middle fingertips for a Drag pinch
    pub drag_pinch_max_px: f32,

    /// Max distance (px) between each of middle/ring/pinky fingertips and the
    /// thumb tip for a Delete pinch
    pub delete_pinch_max_px: f32,

    // -------- RESIZE SETTINGS
    /// Fraction of an object's width/height counted as each corner quadrant
    /// in the resize arming test
    pub resize_quadrant_margin: f32,

    /// Fraction of the two-cursor diagonal subtracted as padding when
    /// deriving the resize target width
    pub resize_padding_ratio: f32,

    /// Resizes that shrink an object below this fraction of the frame width
    /// are rejected
    pub resize_min_width_ratio: f32,

    // -------- TICK SETTINGS
    /// Tick period (ms); a tick that overruns simply schedules the next one
    /// late, no frames are dropped
    pub tick_interval_ms: u64,

    /// Consecutive capture failures before the source is reopened
    pub capture_failures_before_reopen: u32,

    /// Pause (ms) inserted after reopening a failed capture source
    pub capture_retry_backoff_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_import_width: 200,
            drag_pinch_max_px: 40.,
            delete_pinch_max_px: 30.,
            resize_quadrant_margin: 0.5,
            resize_padding_ratio: 0.2,
            resize_min_width_ratio: 0.05,
            tick_interval_ms: 10,
            capture_failures_before_reopen: 30,
            capture_retry_backoff_ms: 500,
        }
    }
}

impl EngineConfig {
    pub fn write_config_to_file(&self, config_file_path: &str) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, text)
            .with_context(|| format!("failed to write config to {:?}", config_file_path))?;
        info!("Wrote config to file: {:?}", config_file_path);
        Ok(())
    }
}

pub fn load_config_from_file(config_file_path: &str) -> Result<EngineConfig> {
    match fs::read_to_string(config_file_path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Engine config file not found at \"{}\"; using defaults",
                config_file_path
            );
            Ok(EngineConfig::default())
        }
        Err(e) => Err(anyhow!(
            "failed to read engine config \"{}\": {}",
            config_file_path,
            e
        )),
        Ok(text) => {
            info!("Loaded engine config OK from \"{}\"", config_file_path);
            serde_json::from_str::<EngineConfig>(&text)
                .map_err(|e| anyhow!("failed to parse config data: {}", e))
        }
    }
}
