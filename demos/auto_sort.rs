//! Example: Drive a sort session from a simulated frame loop.
//!
//! Steps the sort automatically at the configured interval, printing each
//! stage, then prints the run statistics.
//!
//! Run with:
//!     cargo run --example auto_sort --features tokio -- [config.json]

use std::time::Duration;

use anyhow::Context;
use bitonic_visualizer::session::{SessionConfig, SortSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            SessionConfig::from_json(&json)?
        }
        None => SessionConfig {
            total_elements: 64,
            size_limit: 8,
            auto_step_interval_ms: 20,
            auto_sort: true,
            ..Default::default()
        },
    };

    println!("Bitonic Sort - Auto Step Demo");
    println!("=============================\n");

    let mut session = SortSession::cpu(&config)?;
    let grid = session.grid();
    println!("  Elements: {}", config.total_elements);
    println!("  Grid: {}x{}", grid.width, grid.height);
    println!("  Workgroup size: {}", session.sequencer().workgroup_size());
    println!("  Total steps: {}\n", session.sequencer().total_steps());

    let mut stepper = config.auto_stepper();
    stepper.set_enabled(true);

    // Two full runs so the average has something to average
    for run in 1..=2 {
        if run > 1 {
            session.randomize(config.seed.wrapping_add(run));
        }
        session.hover_at(0.0, 0.0);

        let mut frames = tokio::time::interval(Duration::from_millis(16));
        let mut last = tokio::time::Instant::now();
        stepper.set_enabled(true);

        while !session.is_complete() {
            frames.tick().await;
            let now = tokio::time::Instant::now();
            let before = session.sequencer().step_index();
            session.auto_tick(&mut stepper, now - last)?;
            last = now;

            let snapshot = session.snapshot();
            if snapshot.step_index != before {
                println!(
                    "  Step {:>3}/{}: {:<15} span {:<4} swaps {:<6} hover {} -> {}",
                    snapshot.step_index,
                    snapshot.total_steps,
                    snapshot.prev_stage.name(),
                    snapshot.prev_span,
                    snapshot.total_swaps,
                    snapshot.hovered_cell,
                    snapshot.swapped_cell
                );
            }
        }

        println!(
            "\nRun {} done: sorted={}, average {:.3} ms\n",
            run,
            session.elements().is_sorted(),
            session.average_sort_time_ms()
        );
    }

    println!("Statistics:\n{}", session.stats().to_json()?);

    Ok(())
}
