// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # das-tool
//!
//! A terminal dashboard shell with seven pages: a prompt editor, a planning
//! board whose tasks advance on their own, an architecture view driven by a
//! synthetic module health simulator, a time-travel debugger, a feedback
//! monitor and a gated toy code editor.
//!
//! All data is built in or randomly generated. Pages talk to each other only
//! through routes that carry an optional task payload.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │ events  │───▶│   app    │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (input) │    │ (routes) │    │(render) │    │         │ │
//! │  └─────────┘    └────┬─────┘    └─────────┘    └─────────┘ │
//! │                      │ mounts                               │
//! │                      ▼                                      │
//! │  ┌──────────────────────────┐   ┌────────────┐              │
//! │  │ pages (Action → update)  │──▶│ scheduler  │ timers        │
//! │  └────────────┬─────────────┘   └────────────┘              │
//! │               ▼                                             │
//! │  ┌──────────────────────────┐   ┌────────────┐              │
//! │  │ data (models, formula)   │   │ capability │ speech       │
//! │  └──────────────────────────┘   └────────────┘              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, route navigation, page mount/unmount
//! - **[`pages`]**: One state container per page with an `Action` reducer
//! - **[`scheduler`]**: Deterministic one-shot and repeating timers per page
//! - **[`data`]**: Data models: module metrics, board, payloads, timeline
//! - **[`capability`]**: Speech recognition interface and backends
//! - **[`config`]**: Layered settings from defaults, file and environment
//! - **[`headless`]**: `tokio` runners that write NDJSON instead of drawing
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive dashboard
//! das-tool
//!
//! # Open a page with a task
//! das-tool --route '/prompting?task=%7B%22title%22%3A%22Fix%22%7D'
//!
//! # Ten simulator ticks as NDJSON
//! das-tool --simulate 10 --seed 7 --speed 200
//! ```
//!
//! ### Driving a page directly
//!
//! ```
//! use std::time::Duration;
//! use das_tool::config::Settings;
//! use das_tool::data::ColumnId;
//! use das_tool::pages::{Page, PlanningPage};
//!
//! let mut page = PlanningPage::new(&Settings::default());
//! page.tick(Duration::from_secs(5));
//! assert!(page.board().column(ColumnId::Todo).tasks.is_empty());
//! ```
//!
//! ### Headless simulation
//!
//! ```
//! use das_tool::config::Settings;
//!
//! # tokio_test::block_on(async {
//! let mut settings = Settings::default();
//! settings.simulation.seed = Some(1);
//! settings.simulation.speed_ms = 100;
//!
//! let mut out = Vec::new();
//! das_tool::headless::simulate(&settings, 2, &mut out).await.unwrap();
//! assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
//! # });
//! ```

pub mod app;
pub mod capability;
pub mod config;
pub mod data;
pub mod events;
pub mod headless;
pub mod pages;
pub mod scheduler;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use capability::{SpeechEvent, SpeechRecognizer, TranscriptFile, Unsupported};
pub use config::Settings;
pub use data::{
    Board, ModuleMetrics, ModuleStatus, Route, SimulationParams, Task, TaskPayload,
};
pub use scheduler::{Scheduler, TimerId};
