//! Built-in scenes, stored as scene-file TOML

use anyhow::{anyhow, Result};
use flurry_particles::SceneConfig;

pub const PRESETS: &[(&str, &str, &str)] = &[
    ("snow", "Slow flakes with wind gusts and a little wobble", SNOW),
    ("rain", "Dense, fast, uncapped streaks", RAIN),
    ("fireworks", "Repeating bursts that fall under gravity", FIREWORKS),
    ("swarm", "A flock chasing shared waypoints", SWARM),
];

const SNOW: &str = r#"
[surface]
width = 800
height = 600

[[emitter]]
mode = "flow"
x = [0, 800]
y = -10
quantity = 2
max_particles = 300
frequency = [40, 80]
particle_life = [8000, 10000]
angle = [80, 100]
speed = [40, 80]
size = [2, 5]
gravity = 0.001
jitter = 0.5

[emitter.drift]
force = [-0.02, 0.02]
interval = [2000, 5000]
duration = [1500, 3000]
"#;

const RAIN: &str = r#"
[surface]
width = 800
height = 600

[[emitter]]
mode = "flow"
x = [0, 800]
y = -20
quantity = 6
max_particles = 0
frequency = [10, 20]
particle_life = [1200, 1500]
angle = [95, 100]
speed = [400, 600]
size = [1, 2]
shape = "square"
"#;

const FIREWORKS: &str = r#"
[surface]
width = 800
height = 600

[[emitter]]
mode = "burst"
position = [400, 250]
width = 500
height = 200
max_particles = 80
frequency = [800, 1500]
particle_life = [1000, 1800]
angle = [0, 360]
speed = [80, 200]
size = [2, 3]
gravity = 0.01
"#;

const SWARM: &str = r#"
[surface]
width = 800
height = 600

[[emitter]]
mode = "flock"
position = [400, 300]
width = 600
height = 400
max_particles = 40
frequency = 50
flock_interval = [1500, 3000]
particle_life = 0
speed = [40, 60]
size = 3
jitter = 1.5
"#;

/// Parse a preset by name
pub fn load(name: &str) -> Result<SceneConfig> {
    let (_, _, source) = PRESETS
        .iter()
        .find(|(n, _, _)| *n == name)
        .ok_or_else(|| anyhow!("unknown preset '{name}'; run `flurry presets` to list them"))?;
    Ok(SceneConfig::from_toml_str(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flurry_particles::EmissionMode;

    #[test]
    fn every_preset_parses_with_emitters() {
        for (name, _, _) in PRESETS {
            let scene = load(name).unwrap();
            assert!(!scene.emitters.is_empty(), "{name} has no emitters");
            assert_eq!((scene.width, scene.height), (800.0, 600.0));
        }
    }

    #[test]
    fn presets_cover_each_mode() {
        assert!(matches!(load("snow").unwrap().emitters[0].mode, EmissionMode::Flow { .. }));
        assert!(matches!(
            load("fireworks").unwrap().emitters[0].mode,
            EmissionMode::Burst { repeat: true }
        ));
        assert!(matches!(load("swarm").unwrap().emitters[0].mode, EmissionMode::Flock { .. }));
        assert!(load("snow").unwrap().emitters[0].drift.is_some());
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(load("hail").is_err());
    }
}
