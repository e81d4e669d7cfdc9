use clap::{Parser, command};

// Some defaults; some of which can be overriden via CLI args
const CONFIG_FILE_PATH: &str = "./float.json";
const ASSETS_DIR: &str = "./images";
const POSE_COMMAND: &str = "hand-landmarker";

const CAPTURE_WIDTH: u32 = 1280;
const CAPTURE_HEIGHT: u32 = 720;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Where to load engine tuning config
    #[arg(long="engineConfigPath",default_value_t=String::from(CONFIG_FILE_PATH))]
    pub config_path: String,

    /// Camera device index used for capture
    #[arg(long = "capture.device", default_value_t = 0)]
    pub capture_device: u32,

    /// Requested capture width (px)
    #[arg(long = "capture.width", default_value_t = CAPTURE_WIDTH)]
    pub capture_width: u32,

    /// Requested capture height (px)
    #[arg(long = "capture.height", default_value_t = CAPTURE_HEIGHT)]
    pub capture_height: u32,

    /// Command spawned as the hand-landmark detector sidecar; raw RGB frames
    /// go to its stdin, JSON observation lines come back on its stdout
    #[arg(long="pose.command",default_value_t=String::from(POSE_COMMAND))]
    pub pose_command: String,

    /// Directory scanned for importable images (preview keys 1-9)
    #[arg(long="assetsDir",default_value_t=String::from(ASSETS_DIR))]
    pub assets_dir: String,

    /// Image file to import at startup; repeat for multiple
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Mirror the preview window horizontally (selfie view); the composited
    /// output itself is never flipped
    #[arg(long = "preview.mirror")]
    pub preview_mirror: bool,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,
}
