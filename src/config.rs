//! Demo configuration: JSON file plus command line overrides
//!
//! ```json
//! {
//!   "window": { "title": "Terrascape", "width": 1280, "height": 720 },
//!   "scene": { "columns": 512, "rows": 512, "generation": { "octaves": 4 } },
//!   "render": { "wireframe": true }
//! }
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::render::RenderConfig;
use crate::scene::SceneConfig;

/// Window configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Terrascape".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Everything the demo binary is configured with
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub render: RenderConfig,
}

impl DemoConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Build from command line arguments.
    ///
    /// `--config <path>` loads a file first; `--size <N>`, `--wireframe` and
    /// `--fill` then override it.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = match parse_str_arg(args, "--config") {
            Some(path) => {
                log::info!("Loading config from {}", path);
                Self::load(Path::new(&path))?
            }
            None => Self::default(),
        };

        if let Some(size) = parse_str_arg(args, "--size") {
            let size: u32 = size
                .parse()
                .map_err(|e| Error::Config(format!("--size {}: {}", size, e)))?;
            config.scene = config.scene.with_grid_size(size);
        }
        if has_flag(args, "--wireframe") {
            config.render.wireframe = true;
        }
        if has_flag(args, "--fill") {
            config.render.wireframe = false;
        }
        Ok(config)
    }
}

/// Value following `name` on the command line
pub fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Whether `name` appears on the command line
pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("terrascape")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = DemoConfig::from_args(&args(&[])).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.scene.columns, 1280);
        assert!(config.render.wireframe);
    }

    #[test]
    fn test_overrides() {
        let config = DemoConfig::from_args(&args(&["--size", "64", "--fill"])).unwrap();
        assert_eq!(config.scene.columns, 64);
        assert_eq!(config.scene.rows, 64);
        assert!(!config.render.wireframe);
    }

    #[test]
    fn test_bad_size() {
        assert!(matches!(
            DemoConfig::from_args(&args(&["--size", "huge"])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "window": {{ "width": 800 }}, "scene": {{ "rows": 32, "generation": {{ "octaves": 3 }} }} }}"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = DemoConfig::from_args(&args(&["--config", &path])).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.scene.rows, 32);
        assert_eq!(config.scene.columns, 1280);
        assert_eq!(config.scene.generation.octaves, 3);
        assert_eq!(config.scene.generation.amplitude, 0.2);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(DemoConfig::load(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DemoConfig::load(&dir.path().join("absent.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_roundtrip_json() {
        let config = DemoConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"projection\": \"perspective\""));
        let parsed: DemoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_helpers() {
        let list = args(&["--config", "a.json", "--fill"]);
        assert_eq!(parse_str_arg(&list, "--config").as_deref(), Some("a.json"));
        assert_eq!(parse_str_arg(&list, "--fill"), None);
        assert!(has_flag(&list, "--fill"));
        assert!(!has_flag(&list, "--wireframe"));
    }
}
