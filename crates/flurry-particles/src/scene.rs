//! Scene files: a surface, engine settings and a list of emitters

use crate::emitter::{toml_f64, EmitterConfig};
use crate::engine::EngineConfig;
use flurry_core::{FlurryError, Result};
use std::path::Path;

/// Parsed scene file
///
/// ```toml
/// [surface]
/// width = 800
/// height = 600
///
/// [engine]
/// seed = 7
///
/// [[emitter]]
/// mode = "flow"
/// x = [0, 800]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub width: f64,
    pub height: f64,
    pub engine: EngineConfig,
    pub emitters: Vec<EmitterConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            engine: EngineConfig::default(),
            emitters: Vec::new(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        let mut scene = Self::default();

        if let Some(surface) = table.get("surface").and_then(|v| v.as_table()) {
            if let Some(v) = surface.get("width") {
                scene.width = toml_f64(v, scene.width);
            }
            if let Some(v) = surface.get("height") {
                scene.height = toml_f64(v, scene.height);
            }
        }

        if let Some(engine) = table.get("engine").and_then(|v| v.as_table()) {
            if let Some(v) = engine.get("seed") {
                scene.engine.seed = v.as_integer().map(|s| s as u64);
            }
            if let Some(v) = engine.get("frame_rate") {
                scene.engine.frame_rate = toml_f64(v, scene.engine.frame_rate);
            }
        }

        if let Some(emitters) = table.get("emitter") {
            let Some(list) = emitters.as_array() else {
                return Err(FlurryError::ConfigError(
                    "`emitter` must be an array of tables ([[emitter]])".into(),
                ));
            };
            for (i, entry) in list.iter().enumerate() {
                let Some(emitter) = entry.as_table() else {
                    return Err(FlurryError::ConfigError(format!(
                        "emitter #{} is not a table",
                        i + 1
                    )));
                };
                scene.emitters.push(EmitterConfig::from_toml(emitter));
            }
        }

        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EmissionMode;

    #[test]
    fn parse_scene() {
        let source = r#"
[surface]
width = 320
height = 240.5

[engine]
seed = 7
frame_rate = 30

[[emitter]]
mode = "flow"
quantity = 2

[[emitter]]
mode = "burst"
max_particles = 80
"#;
        let scene = SceneConfig::from_toml_str(source).unwrap();
        assert_eq!(scene.width, 320.0);
        assert_eq!(scene.height, 240.5);
        assert_eq!(scene.engine.seed, Some(7));
        assert_eq!(scene.engine.frame_rate, 30.0);
        assert_eq!(scene.emitters.len(), 2);
        assert_eq!(scene.emitters[0].mode, EmissionMode::Flow { quantity: 2 });
        assert_eq!(scene.emitters[1].max_particles, 80);
    }

    #[test]
    fn non_finite_surface_keeps_defaults() {
        let scene = SceneConfig::from_toml_str("[surface]\nwidth = inf\nheight = nan").unwrap();
        assert_eq!(scene.width, 800.0);
        assert_eq!(scene.height, 600.0);
    }

    #[test]
    fn empty_scene_uses_defaults() {
        let scene = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(scene, SceneConfig::default());
    }

    #[test]
    fn malformed_emitter_list_is_an_error() {
        let err = SceneConfig::from_toml_str("emitter = 3").unwrap_err();
        assert!(matches!(err, FlurryError::ConfigError(_)));

        let err = SceneConfig::from_toml_str("emitter = [1, 2]").unwrap_err();
        assert!(matches!(err, FlurryError::ConfigError(_)));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = SceneConfig::from_toml_str("[surface\nwidth = 1").unwrap_err();
        assert!(matches!(err, FlurryError::TomlParseError(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, FlurryError::IoError(_)));
    }
}
