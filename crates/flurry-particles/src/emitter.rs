//! Emitter configuration (parsed from TOML) and runtime state

use crate::drift::{DriftAxis, DriftConfig, DriftCycle};
use crate::particle::Particle;
use crate::rand::ParticleRng;
use crate::render::{ImageHandle, Renderer, Shape};
use crate::spawn::{policy_for, SpawnContext, SpawnPolicy, SpawnRegion};
use flurry_core::{EmitterId, Span, Vec2};

/// How an emitter creates particles. Each mode carries only its own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum EmissionMode {
    /// `max_particles` at once at a shared position. Repeats every
    /// frequency interval unless `repeat` is false.
    Burst { repeat: bool },
    /// `quantity` particles per frequency interval, capped by `max_particles`
    Flow { quantity: u32 },
    /// One flock, then a new shared waypoint every `interval` ms
    Flock { interval: Span },
}

impl EmissionMode {
    pub fn name(&self) -> &'static str {
        match self {
            EmissionMode::Burst { .. } => "burst",
            EmissionMode::Flow { .. } => "flow",
            EmissionMode::Flock { .. } => "flock",
        }
    }
}

impl Default for EmissionMode {
    fn default() -> Self {
        EmissionMode::Burst { repeat: true }
    }
}

/// Configuration parsed from an `[[emitter]]` TOML table
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    pub region: SpawnRegion,
    pub mode: EmissionMode,
    /// Downward force per tick, scaled by particle size
    pub gravity: f64,
    pub drift: Option<DriftConfig>,
    pub size: Span,
    /// Particles per burst/flock, or the live cap in flow mode (0 = uncapped)
    pub max_particles: usize,
    /// Lifespan in ms; 0 lives forever
    pub particle_life: Span,
    /// Delay in ms between emissions
    pub frequency: Span,
    /// Direction of travel in degrees
    pub angle: Span,
    pub speed: Span,
    pub jitter: f64,
    pub shape: Shape,
    pub image: Option<ImageHandle>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            region: SpawnRegion::default(),
            mode: EmissionMode::default(),
            gravity: 0.0,
            drift: None,
            size: Span::new(2.0, 4.0),
            max_particles: 50,
            particle_life: Span::new(2500.0, 3000.0),
            frequency: Span::new(300.0, 700.0),
            angle: Span::new(0.0, 360.0),
            speed: Span::new(100.0, 400.0),
            jitter: 0.0,
            shape: Shape::Circle,
            image: None,
        }
    }
}

impl EmitterConfig {
    /// Parse an EmitterConfig from a TOML table. Absent or unreadable
    /// fields keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        // Spawn region: x/y spans, or a centered position + width/height
        if let Some(v) = table.get("position") {
            let position = toml_vec2(v, [0.0, 0.0]);
            let width = table.get("width").map(|v| toml_f64(v, 0.0)).unwrap_or(0.0);
            let height = table.get("height").map(|v| toml_f64(v, 0.0)).unwrap_or(0.0);
            config.region = SpawnRegion::centered(Vec2::from_array(position), width, height);
        }
        if let Some(v) = table.get("x") {
            config.region.x = toml_span("x", v, config.region.x);
        }
        if let Some(v) = table.get("y") {
            config.region.y = toml_span("y", v, config.region.y);
        }

        if let Some(v) = table.get("gravity") {
            config.gravity = toml_f64(v, config.gravity);
        }
        if let Some(v) = table.get("size") {
            config.size = toml_span("size", v, config.size);
        }
        if let Some(v) = table.get("max_particles") {
            config.max_particles = v.as_integer().unwrap_or(50).max(0) as usize;
        }
        if let Some(v) = table.get("particle_life") {
            config.particle_life = toml_span("particle_life", v, config.particle_life);
        }
        if let Some(v) = table.get("frequency") {
            config.frequency = toml_span("frequency", v, config.frequency);
        }
        if let Some(v) = table.get("angle") {
            config.angle = toml_span("angle", v, config.angle);
        }
        if let Some(v) = table.get("speed") {
            config.speed = toml_span("speed", v, config.speed);
        }
        if let Some(v) = table.get("jitter") {
            config.jitter = toml_f64(v, config.jitter);
        }
        if let Some(v) = table.get("shape") {
            config.shape = match v.as_str().unwrap_or("circle") {
                "circle" => Shape::Circle,
                "square" => Shape::Square,
                other => {
                    log::warn!("unknown particle shape '{other}', using circle");
                    Shape::Circle
                }
            };
        }
        if let Some(v) = table.get("image") {
            if let Some(s) = v.as_str() {
                config.image = Some(ImageHandle::new(s));
            }
        }

        if let Some(drift) = table.get("drift").and_then(|v| v.as_table()) {
            config.drift = Some(drift_from_toml(drift));
        }

        let mode_str = table
            .get("mode")
            .and_then(|v| v.as_str())
            .unwrap_or("burst");
        config.mode = match mode_str {
            "flow" => EmissionMode::Flow {
                quantity: table
                    .get("quantity")
                    .and_then(|v| v.as_integer())
                    .unwrap_or(1)
                    .max(0) as u32,
            },
            "flock" => EmissionMode::Flock {
                interval: table
                    .get("flock_interval")
                    .map(|v| toml_span("flock_interval", v, DEFAULT_FLOCK_INTERVAL))
                    .unwrap_or(DEFAULT_FLOCK_INTERVAL),
            },
            other => {
                if other != "burst" {
                    log::warn!("unknown emission mode '{other}', using burst");
                }
                EmissionMode::Burst {
                    repeat: table
                        .get("repeat")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(true),
                }
            }
        };

        config
    }

    /// Drift settings, if drift is configured with a non-zero force
    pub fn active_drift(&self) -> Option<&DriftConfig> {
        self.drift.as_ref().filter(|d| d.is_enabled())
    }
}

/// Waypoint interval used when a flock emitter does not set one
pub const DEFAULT_FLOCK_INTERVAL: Span = Span {
    min: 1000.0,
    max: 3000.0,
};

fn drift_from_toml(table: &toml::value::Table) -> DriftConfig {
    let mut drift = DriftConfig::default();
    if let Some(v) = table.get("force") {
        drift.force = toml_span("drift.force", v, drift.force);
    }
    if let Some(v) = table.get("interval") {
        drift.interval = toml_span("drift.interval", v, drift.interval);
    }
    if let Some(v) = table.get("duration") {
        drift.duration = toml_span("drift.duration", v, drift.duration);
    }
    if let Some(v) = table.get("axis") {
        drift.axis = match v.as_str().unwrap_or("horizontal") {
            "vertical" | "y" => DriftAxis::Vertical,
            "horizontal" | "x" => DriftAxis::Horizontal,
            other => {
                log::warn!("unknown drift axis '{other}', using horizontal");
                DriftAxis::Horizontal
            }
        };
    }
    drift
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Runtime state for one emitter
#[derive(Debug)]
pub struct Emitter {
    id: EmitterId,
    config: EmitterConfig,
    policy: Box<dyn SpawnPolicy>,
    drift: Option<DriftCycle>,
    particles: Vec<Particle>,
    rng: ParticleRng,
    state: RunState,
    /// Timestamp of the previous update; `None` until the first one
    last_frame: Option<f64>,
}

impl Emitter {
    pub fn new(id: EmitterId, config: EmitterConfig) -> Self {
        Self::with_rng(id, config, ParticleRng::from_entropy())
    }

    /// Create an emitter drawing randomness from `rng`
    pub fn with_rng(id: EmitterId, config: EmitterConfig, mut rng: ParticleRng) -> Self {
        if config.max_particles == 0 && !matches!(config.mode, EmissionMode::Flow { .. }) {
            log::warn!(
                "emitter {id}: max_particles = 0 in {} mode emits nothing",
                config.mode.name()
            );
        }
        let policy = policy_for(&config.mode);
        let drift = config
            .active_drift()
            .cloned()
            .map(|d| DriftCycle::new(d, &mut rng));
        let mut emitter = Self {
            id,
            config,
            policy,
            drift,
            particles: Vec::new(),
            rng,
            state: RunState::Stopped,
            last_frame: None,
        };
        emitter.reset();
        emitter
    }

    pub fn get_id(&self) -> EmitterId {
        self.id
    }

    /// Begin emitting. Has no effect while already running.
    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        log::debug!("emitter {} started ({})", self.id, self.config.mode.name());
        self.state = RunState::Running;
    }

    /// Stop and discard all particles and timers
    pub fn reset(&mut self) {
        self.state = RunState::Stopped;
        self.particles.clear();
        self.last_frame = None;
        self.policy.reset(&self.config, &mut self.rng);
        if let Some(drift) = self.drift.as_mut() {
            drift.reset(&mut self.rng);
        }
    }

    /// Advance the simulation to `timestamp` (ms)
    pub fn update(&mut self, timestamp: f64) {
        if self.state != RunState::Running {
            return;
        }

        let waypoint = {
            let mut cx = SpawnContext {
                timestamp,
                config: &self.config,
                particles: &mut self.particles,
                rng: &mut self.rng,
            };
            self.policy.advance(&mut cx)
        };

        let drift = self
            .drift
            .as_mut()
            .map(|cycle| cycle.advance(timestamp, &mut self.rng));
        let delta = self
            .last_frame
            .map_or(0.0, |last| (timestamp - last).max(0.0));

        for particle in &mut self.particles {
            if let Some(value) = drift {
                particle.set_drift(value);
            }
            if let Some(point) = waypoint {
                particle.push_waypoint(point, timestamp);
            }
            particle.update(timestamp, delta);
        }

        self.particles.retain(|p| !p.is_dead());
        self.last_frame = Some(timestamp);
    }

    /// Draw live particles in creation order
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for particle in &self.particles {
            particle.render(renderer);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn mode(&self) -> &EmissionMode {
        &self.config.mode
    }

    /// Current drift magnitude (0 while idle or when drift is off)
    pub fn drift_value(&self) -> f64 {
        self.drift.as_ref().map_or(0.0, |d| d.value())
    }

    pub fn is_drifting(&self) -> bool {
        self.drift.as_ref().is_some_and(|d| d.is_drifting())
    }

    pub fn all_particles_created(&self) -> bool {
        self.policy.all_particles_created()
    }

    /// Milliseconds the spawn gate currently waits between emissions
    pub fn next_emit_time(&self) -> f64 {
        self.policy.timer().next_emit()
    }

    pub fn last_emitted_time(&self) -> f64 {
        self.policy.timer().last_emitted()
    }
}

// ── TOML helpers (handle integer/float coercion) ──

/// A finite number, coercing integers. `inf` and `nan` are rejected.
fn toml_number(v: &toml::Value) -> Option<f64> {
    let n = v.as_float().or_else(|| v.as_integer().map(|i| i as f64))?;
    if n.is_finite() {
        Some(n)
    } else {
        log::warn!("ignoring non-finite value {n}");
        None
    }
}

pub(crate) fn toml_f64(v: &toml::Value, default: f64) -> f64 {
    toml_number(v).unwrap_or(default)
}

fn toml_vec2(v: &toml::Value, default: [f64; 2]) -> [f64; 2] {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 2 {
            return [toml_f64(&arr[0], default[0]), toml_f64(&arr[1], default[1])];
        }
    }
    default
}

/// A span is either `[min, max]` or a single number. Anything else, including
/// a range with an unreadable bound, keeps `default` whole.
fn toml_span(field: &str, v: &toml::Value, default: Span) -> Span {
    let bounds = match v.as_array() {
        Some(arr) if arr.len() == 2 => toml_number(&arr[0]).zip(toml_number(&arr[1])),
        Some(_) => None,
        None => toml_number(v).map(|n| (n, n)),
    };
    let Some((min, max)) = bounds else {
        log::warn!("{field}: expected a number or [min, max], keeping default");
        return default;
    };
    if min > max {
        log::warn!("{field}: range [{min}, {max}] is reversed, swapping bounds");
    }
    Span::new(min, max)
}
