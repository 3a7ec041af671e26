//! Run command - simulates a scene headlessly

use crate::presets;
use crate::surface::TextSurface;
use anyhow::{Context, Result};
use flurry_particles::{Engine, SceneConfig};
use flurry_runtime::FrameClock;
use serde::Serialize;

pub struct RunArgs {
    pub scene: Option<String>,
    pub preset: String,
    pub frames: u64,
    pub seed: Option<u64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub cols: usize,
    pub rows: usize,
    pub format: String,
    pub show: bool,
    pub realtime: bool,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub frames: u64,
    pub simulated_ms: f64,
    pub total_particles: usize,
    pub emitters: Vec<EmitterSummary>,
}

#[derive(Debug, Serialize)]
pub struct EmitterSummary {
    pub id: u64,
    pub mode: String,
    pub particles: usize,
    pub drifting: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let (mut scene, source) = match &args.scene {
        Some(path) => (
            SceneConfig::load(path).with_context(|| format!("Failed to load scene {path}"))?,
            path.clone(),
        ),
        None => (presets::load(&args.preset)?, format!("preset:{}", args.preset)),
    };
    apply_overrides(&mut scene, &args);

    let (engine, frames) = simulate(&scene, &args)?;
    let summary = summarize(&engine, source, frames);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_text(&summary),
    }

    if args.show {
        if let Some(surface) = engine.surface() {
            println!("{surface}");
        }
    }

    Ok(())
}

/// Command-line flags take precedence over the scene file
fn apply_overrides(scene: &mut SceneConfig, args: &RunArgs) {
    if args.seed.is_some() {
        scene.engine.seed = args.seed;
    }
    if let Some(width) = args.width {
        scene.width = width;
    }
    if let Some(height) = args.height {
        scene.height = height;
    }
}

/// Build an engine for `scene`, start every emitter and run the frames
fn simulate(scene: &SceneConfig, args: &RunArgs) -> Result<(Engine<TextSurface>, u64)> {
    let mut engine = Engine::from_config(&scene.engine);
    let surface = TextSurface::new(scene.width, scene.height, args.cols, args.rows);
    engine
        .initialize(|| Ok(surface))
        .context("Failed to initialize drawing surface")?;

    for config in &scene.emitters {
        let id = engine.create_emitter(config.clone());
        if let Some(emitter) = engine.get_emitter_mut(id) {
            emitter.start();
        }
    }
    engine.start()?;

    let pace = engine.clock().frame_duration();
    let mut frames = 0;
    for _ in 0..args.frames {
        if engine.tick()?.is_some() {
            frames += 1;
        }
        if args.realtime {
            std::thread::sleep(pace);
        }
    }
    log::info!(
        "simulated {frames} frame(s), {} particle(s) alive",
        engine.particle_count()
    );
    Ok((engine, frames))
}

fn summarize(engine: &Engine<TextSurface>, source: String, frames: u64) -> RunSummary {
    RunSummary {
        source,
        frames,
        simulated_ms: engine.clock().now(),
        total_particles: engine.particle_count(),
        emitters: engine
            .emitters()
            .iter()
            .map(|e| EmitterSummary {
                id: e.get_id().raw(),
                mode: e.mode().name().to_string(),
                particles: e.particle_count(),
                drifting: e.is_drifting(),
            })
            .collect(),
    }
}

fn print_text(summary: &RunSummary) {
    println!("Scene: {}", summary.source);
    println!(
        "Frames: {} ({:.1}s simulated)",
        summary.frames,
        summary.simulated_ms / 1000.0
    );
    println!("Particles: {}", summary.total_particles);
    for emitter in &summary.emitters {
        println!(
            "  emitter {} [{}]: {} particle(s){}",
            emitter.id,
            emitter.mode,
            emitter.particles,
            if emitter.drifting { ", drifting" } else { "" }
        );
    }
}
