//! Demo configuration and command-line parsing.

use std::path::PathBuf;

use crate::error::InstagridError;
use crate::scene::RenderMode;

/// Default path of the model drawn at every grid point.
pub const DEFAULT_MODEL_PATH: &str = "media/cooler_uv.obj";

/// Largest accepted grid dimension, `MAX_GRID_DIM^2` objects.
pub const MAX_GRID_DIM: u32 = 2048;

/// Startup configuration of the demo.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemoConfig {
    /// Initial grid dimension (the grid holds `count * count` objects).
    pub count: u32,
    /// Upper bound of the grid dimension slider.
    pub max_count: u32,
    /// Distance between two neighboring grid points.
    pub step: f32,
    /// Initial rendering strategy.
    pub mode: RenderMode,
    /// Model drawn at every grid point.
    pub model_path: PathBuf,
    /// Whether the orbit camera rotates on its own.
    pub auto_rotate: bool,
    /// Whether presentation waits for vertical sync.
    pub vsync: bool,
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            count: 10,
            max_count: 500,
            step: 5.0,
            mode: RenderMode::Naive,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            auto_rotate: true,
            vsync: true,
            width: 1280,
            height: 720,
        }
    }
}

const USAGE: &str = "usage: instagrid [--count N] [--max-count N] [--step F] [--mode naive|instanced] \
                     [--model PATH] [--no-auto-rotate] [--no-vsync] [--width N] [--height N]";

impl DemoConfig {
    /// Reads the configuration from the process arguments.
    pub fn from_env() -> Result<DemoConfig, InstagridError> {
        DemoConfig::from_args(std::env::args().skip(1))
    }

    /// Parses the configuration from a list of arguments (without the program name).
    ///
    /// Unspecified options keep their default value.
    pub fn from_args<I, S>(args: I) -> Result<DemoConfig, InstagridError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = DemoConfig::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--count" => config.count = parse_value(&arg, args.next())?,
                "--max-count" => config.max_count = parse_value(&arg, args.next())?,
                "--step" => config.step = parse_value(&arg, args.next())?,
                "--width" => config.width = parse_value(&arg, args.next())?,
                "--height" => config.height = parse_value(&arg, args.next())?,
                "--mode" => config.mode = parse_value(&arg, args.next())?,
                "--model" => {
                    let value = args.next().ok_or_else(|| missing_value(&arg))?;
                    config.model_path = PathBuf::from(value);
                }
                "--no-auto-rotate" => config.auto_rotate = false,
                "--no-vsync" => config.vsync = false,
                other => {
                    return Err(InstagridError::Config(format!(
                        "unknown argument `{}`\n{}",
                        other, USAGE
                    )))
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the consistency of the configuration values.
    pub fn validate(&self) -> Result<(), InstagridError> {
        if self.max_count > MAX_GRID_DIM {
            return Err(InstagridError::Config(format!(
                "max count ({}) exceeds {}",
                self.max_count, MAX_GRID_DIM
            )));
        }

        if self.count > self.max_count {
            return Err(InstagridError::Config(format!(
                "count ({}) exceeds max count ({})",
                self.count, self.max_count
            )));
        }

        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(InstagridError::Config(format!(
                "step must be a positive number, got {}",
                self.step
            )));
        }

        if self.width == 0 || self.height == 0 {
            return Err(InstagridError::Config(
                "window dimensions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn missing_value(flag: &str) -> InstagridError {
    InstagridError::Config(format!("missing value for `{}`\n{}", flag, USAGE))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, InstagridError> {
    let value = value.ok_or_else(|| missing_value(flag))?;
    value
        .parse()
        .map_err(|_| InstagridError::Config(format!("invalid value `{}` for `{}`", value, flag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_gives_defaults() {
        let config = DemoConfig::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.count, 10);
        assert_eq!(config.max_count, 500);
        assert_eq!(config.step, 5.0);
        assert_eq!(config.mode, RenderMode::Naive);
    }

    #[test]
    fn parses_every_flag() {
        let config = DemoConfig::from_args([
            "--count",
            "42",
            "--max-count",
            "100",
            "--step",
            "2.5",
            "--mode",
            "instanced",
            "--model",
            "assets/fan.obj",
            "--no-auto-rotate",
            "--no-vsync",
            "--width",
            "640",
            "--height",
            "480",
        ])
        .unwrap();

        assert_eq!(config.count, 42);
        assert_eq!(config.max_count, 100);
        assert_eq!(config.step, 2.5);
        assert_eq!(config.mode, RenderMode::Instanced);
        assert_eq!(config.model_path, PathBuf::from("assets/fan.obj"));
        assert!(!config.auto_rotate);
        assert!(!config.vsync);
        assert_eq!((config.width, config.height), (640, 480));
    }

    #[test]
    fn rejects_unknown_flags_and_bad_values() {
        assert!(matches!(
            DemoConfig::from_args(["--fullscreen"]),
            Err(InstagridError::Config(_))
        ));
        assert!(matches!(
            DemoConfig::from_args(["--count", "many"]),
            Err(InstagridError::Config(_))
        ));
        assert!(matches!(
            DemoConfig::from_args(["--count"]),
            Err(InstagridError::Config(_))
        ));
        assert!(matches!(
            DemoConfig::from_args(["--mode", "batched"]),
            Err(InstagridError::Config(_))
        ));
    }

    #[test]
    fn rejects_inconsistent_values() {
        assert!(DemoConfig::from_args(["--count", "501"]).is_err());
        assert!(DemoConfig::from_args(["--step", "0"]).is_err());
        assert!(DemoConfig::from_args(["--step", "-1"]).is_err());
        assert!(DemoConfig::from_args(["--width", "0"]).is_err());
        assert!(DemoConfig::from_args(["--count", "600", "--max-count", "1000"]).is_ok());

        let max = MAX_GRID_DIM.to_string();
        let at_max = ["--count", max.as_str(), "--max-count", max.as_str()];
        assert!(DemoConfig::from_args(at_max).is_ok());
        assert!(DemoConfig::from_args(["--max-count", "4294967295"]).is_err());
    }
}
