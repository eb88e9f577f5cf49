//! Reactor Core headless driver
//!
//! Stands in for the GUI host: lays out an 800x600 canvas, fills the reactor,
//! drives it from a fixed-interval "timer" and sweeps the piston in partway
//! through. Prints a summary and the recorded time series as JSON.
//!
//! Usage: `reactor-core [settings.json]`

use reactor_core::render::build_instances;
use reactor_core::{ReactorCore, ReactorLayout, ReactorSettings, Recorder, Result, Shape};

const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;
const TICKS: u32 = 1200;
const CIRCLES: u32 = 12;
const SQUARES: u32 = 6;

fn main() {
    env_logger::init();
    log::info!("Reactor Core (headless) starting...");

    if let Err(e) = run() {
        log::error!("Reactor stopped: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => ReactorSettings::load_or_default(path),
        None => ReactorSettings::default(),
    };
    let tick_secs = settings.tick_secs;

    let mut layout = ReactorLayout::new(CANVAS_WIDTH, CANVAS_HEIGHT, &settings)?;
    let mut core = ReactorCore::from_layout(&layout, settings)?;
    let mut recorder = Recorder::default();

    for _ in 0..CIRCLES {
        core.spawn_circle()?;
    }
    for _ in 0..SQUARES {
        core.spawn_square()?;
    }

    let (piston_min, piston_max) = layout.piston_range();
    let mut events = 0usize;
    let mut capped_ticks = 0u32;

    for tick in 0..TICKS {
        // Second half: push the piston in one percent every 10 ticks
        if tick >= TICKS / 2 && tick % 10 == 0 {
            let target = piston_min + (tick - TICKS / 2) / 10;
            if layout.set_piston_percent(target.min(piston_max)) {
                core.apply_layout(&layout)?;
            }
        }

        let stats = core.advance(tick_secs)?;
        events += stats.events();
        if stats.capped {
            capped_ticks += 1;
        }
        recorder.record(&core);
    }

    let instances = build_instances(&core);
    println!("seed:            {}", core.seed());
    println!("simulated:       {:.2}s in {} ticks", core.time(), TICKS);
    println!("events resolved: {} ({} capped ticks)", events, capped_ticks);
    println!("piston:          {}%", layout.piston_percent());
    println!(
        "molecules:       {} circles, {} squares, total mass {}",
        core.count(Shape::Circle),
        core.count(Shape::Square),
        core.total_mass()
    );
    println!("render records:  {}", instances.len());
    println!("{}", recorder.to_json()?);
    Ok(())
}
