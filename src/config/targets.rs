use crate::device::Device;
use crate::multiplane::MultiplaneParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct TargetToolConfig {
    pub target: TargetInputConfig,
    #[serde(default)]
    pub device: Device,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TargetInputConfig {
    /// Source image file.
    pub image: PathBuf,
    /// Depth map file; read as luma.
    pub depth: PathBuf,
    /// RGB channel of the source to use; `None` reads luma.
    #[serde(default, alias = "color_channel")]
    pub colour_channel: Option<usize>,
    /// Use `1 - depth` so that bright pixels are near.
    #[serde(default = "default_invert_depth")]
    pub invert_depth: bool,
    #[serde(flatten)]
    pub params: MultiplaneParams,
}

fn default_invert_depth() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Receives `target_NNNN.png` and `depth.png`.
    pub directory: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<TargetToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<TargetToolConfig, String> {
    serde_json::from_str(contents).map_err(|e| e.to_string())
}

/// Parse `<program> <config.json> [--colour <channel>]` and apply overrides.
pub fn parse_cli<I>(program: &str, args: I) -> Result<TargetToolConfig, String>
where
    I: IntoIterator<Item = String>,
{
    let usage = || format!("Usage: {program} <config.json> [--colour <channel>]");
    let mut config_path: Option<PathBuf> = None;
    let mut colour: Option<usize> = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--colour" | "--color" => {
                let value = args.next().ok_or_else(usage)?;
                let channel = value
                    .parse::<usize>()
                    .map_err(|e| format!("Invalid colour channel '{value}': {e}"))?;
                colour = Some(channel);
            }
            "-h" | "--help" => return Err(usage()),
            other if config_path.is_none() && !other.starts_with("--") => {
                config_path = Some(PathBuf::from(other));
            }
            other => return Err(format!("Unexpected argument '{other}'\n{}", usage())),
        }
    }
    let path = config_path.ok_or_else(usage)?;
    let mut config = load_config(&path)?;
    if colour.is_some() {
        config.target.colour_channel = colour;
    }
    Ok(config)
}
