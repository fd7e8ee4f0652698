//! Data models behind the dashboard pages.
//!
//! Everything here is plain data plus pure functions; page state containers
//! in [`crate::pages`] own instances of these types and mutate them through
//! their reducers.
//!
//! ## Submodules
//!
//! - [`architecture`]: Module catalogue, health metrics formula and status tiers
//! - [`board`]: Kanban board with transfer-of-ownership task moves
//! - [`payload`]: Task payloads carried between pages in route query strings
//! - [`timeline`]: Recorded execution history for the time-travel debugger
//! - [`feedback`]: Test results and performance samples
//! - [`format`]: Safe date formatting, duration parsing, count formatting
//!
//! ## Data Flow
//!
//! ```text
//! SimulationParams + Rng
//!        │
//!        ▼
//! simulate_step() ──▶ MetricsSet (replaces previous set)
//!
//! Board ──Task──▶ TaskPayload ──encode_task()──▶ Route "/page?task=..."
//!                                                    │
//!                     page mount ◀──task_from_query()┘
//! ```

pub mod architecture;
pub mod board;
pub mod feedback;
pub mod format;
pub mod payload;
pub mod timeline;

pub use architecture::{
    BaseMetrics, MetricsSet, Module, ModuleGraph, ModuleMetrics, ModuleStatus, SimulationParams,
    StatusCounts, MODULES,
};
pub use board::{Board, Category, Column, ColumnId, Priority, Task, TaskDraft};
pub use payload::{PayloadError, Route, TaskPayload};
