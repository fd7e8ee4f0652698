//! Non-interactive runners.
//!
//! These drive the same page state containers as the terminal UI, but on
//! `tokio::time` instead of the input loop, and write newline-delimited JSON
//! instead of drawing.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::app::{snapshot, write_snapshot, View};
use crate::config::Settings;
use crate::data::{Board, Route};
use crate::pages::architecture::Action as ArchAction;
use crate::pages::{ArchitecturePage, Page, PlanningPage};

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, value: &serde_json::Value) -> Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    Ok(())
}

async fn write_tick<W: AsyncWrite + Unpin>(
    out: &mut W,
    page: &ArchitecturePage,
    elapsed: Duration,
) -> Result<()> {
    write_line(
        out,
        &json!({
            "tick": page.ticks(),
            "elapsed_ms": elapsed.as_millis() as u64,
            "params": page.params(),
            "summary": page.status_counts(),
            "metrics": page.metrics(),
        }),
    )
    .await
}

/// Run the health simulator for `ticks` ticks, one JSON line per tick.
///
/// The first tick is computed when the simulation starts; later ticks come
/// from the page's repeating timer, paced by the configured speed. Each tick
/// is written as soon as the page computes it, stamped with its due time, so
/// a late wake-up that covers several periods still reports every set.
pub async fn simulate<W: AsyncWrite + Unpin>(
    settings: &Settings,
    ticks: u64,
    out: &mut W,
) -> Result<()> {
    if ticks == 0 {
        return Ok(());
    }

    let mut page = ArchitecturePage::new(settings);
    let start = Instant::now();
    page.update(ArchAction::ToggleSimulation);
    info!(ticks, speed_ms = page.speed_ms(), "headless simulation started");
    write_tick(out, &page, Duration::ZERO).await?;

    let mut timer = interval(page.speed());
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while page.ticks() < ticks {
        timer.tick().await;
        let elapsed = start.elapsed();

        while page.ticks() < ticks {
            let Some(action) = page.scheduler_mut().pop_due(elapsed) else {
                break;
            };
            let before = page.ticks();
            page.update(action);
            if page.ticks() > before {
                let due = page.scheduler_mut().now();
                write_tick(out, &page, due).await?;
            }
        }
        page.scheduler_mut().advance_clock(elapsed);
    }

    page.update(ArchAction::ToggleSimulation);
    out.flush().await?;
    info!(ticks = page.ticks(), "headless simulation finished");
    Ok(())
}

/// Run the planning board for `duration`, writing the board each time the
/// auto-progression timers move a task.
pub async fn run_board<W: AsyncWrite + Unpin>(
    settings: &Settings,
    duration: Duration,
    out: &mut W,
) -> Result<()> {
    let mut page = PlanningPage::new(settings);
    let start = Instant::now();
    let mut last = page.board().clone();
    write_line(out, &json!({ "elapsed_ms": 0, "board": last.columns() })).await?;

    let mut timer = interval(settings.poll_timeout());
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        timer.tick().await;
        let elapsed = start.elapsed().min(duration);
        page.tick(elapsed);

        if *page.board() != last {
            last = page.board().clone();
            debug!(elapsed_ms = elapsed.as_millis() as u64, "board changed");
            write_line(
                out,
                &json!({
                    "elapsed_ms": elapsed.as_millis() as u64,
                    "board": last.columns(),
                }),
            )
            .await?;
        }

        if elapsed >= duration {
            break;
        }
    }

    out.flush().await?;
    Ok(())
}

/// Export one simulation step plus the seed board to a JSON file.
pub fn export_to_file(settings: &Settings, export_path: &Path) -> Result<()> {
    let mut page = ArchitecturePage::new(settings);
    page.step();
    let board = Board::seed();

    let value = snapshot(&Route::new(View::Architecture), Some(&page), Some(&board));
    write_snapshot(export_path, &value)?;

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
