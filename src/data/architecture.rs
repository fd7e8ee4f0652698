//! Module catalogue and synthetic health metrics.
//!
//! The architecture page shows a fixed set of eight modules. While the
//! simulation runs, every tick derives a fresh [`ModuleMetrics`] record per
//! module from two user-controlled inputs plus random jitter, and classifies
//! it into a [`ModuleStatus`] tier.
//!
//! Every module goes through the same formula; the module identity and its
//! position in the graph do not influence the numbers.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use rand::Rng;
use serde::Serialize;

/// A named node in the static architecture diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Module {
    pub id: &'static str,
    pub name: &'static str,
    /// Upstream input names (module display names or external endpoints).
    pub inputs: &'static [&'static str],
    /// Downstream output names.
    pub outputs: &'static [&'static str],
}

/// The eight modules shown on the architecture page. Never mutated.
pub const MODULES: [Module; 8] = [
    Module {
        id: "dataIngestion",
        name: "Data Ingestion",
        inputs: &["API", "Database"],
        outputs: &["Parser"],
    },
    Module {
        id: "parser",
        name: "Parser",
        inputs: &["Data Ingestion"],
        outputs: &["Analyzer", "Storage"],
    },
    Module {
        id: "analyzer",
        name: "Analyzer",
        inputs: &["Parser"],
        outputs: &["Decision Engine", "Reporting"],
    },
    Module {
        id: "decisionEngine",
        name: "Decision Engine",
        inputs: &["Analyzer"],
        outputs: &["API", "UI", "Logger"],
    },
    Module {
        id: "storage",
        name: "Storage",
        inputs: &["Parser"],
        outputs: &["Analyzer", "Reporting"],
    },
    Module {
        id: "reporting",
        name: "Reporting",
        inputs: &["Analyzer", "Storage"],
        outputs: &["UI"],
    },
    Module {
        id: "ui",
        name: "UI",
        inputs: &["Decision Engine", "Reporting"],
        outputs: &["User"],
    },
    Module {
        id: "logger",
        name: "Logger",
        inputs: &["Decision Engine"],
        outputs: &[],
    },
];

/// Look up a module by id.
pub fn find_module(id: &str) -> Option<&'static Module> {
    MODULES.iter().find(|m| m.id == id)
}

/// Health tier of a module for one tick.
///
/// Ordered by severity so that `max()` yields the worst tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Normal,
    Warning,
    Error,
}

impl ModuleStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            ModuleStatus::Normal => "OK",
            ModuleStatus::Warning => "WARN",
            ModuleStatus::Error => "ERR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModuleStatus::Normal => "normal",
            ModuleStatus::Warning => "warning",
            ModuleStatus::Error => "error",
        }
    }
}

/// Base constants the formula perturbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseMetrics {
    /// Base latency in milliseconds.
    pub latency_ms: f64,
    /// Base error rate in percent.
    pub error_rate: f64,
    /// Base throughput in requests per second.
    pub throughput: f64,
    /// Base reliability in percent.
    pub reliability: f64,
}

impl Default for BaseMetrics {
    fn default() -> Self {
        Self {
            latency_ms: 40.0,
            error_rate: 0.02,
            throughput: 150.0,
            reliability: 99.95,
        }
    }
}

impl BaseMetrics {
    /// Classify latency and error rate against multiples of the base values.
    pub fn classify(&self, latency: u32, error_rate: f64) -> ModuleStatus {
        let latency = f64::from(latency);
        if latency > self.latency_ms * 2.0 || error_rate > self.error_rate * 2.0 {
            ModuleStatus::Error
        } else if latency > self.latency_ms * 1.5 || error_rate > self.error_rate * 1.5 {
            ModuleStatus::Warning
        } else {
            ModuleStatus::Normal
        }
    }
}

/// The two slider inputs, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationParams {
    pub user_load: u8,
    pub data_complexity: u8,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            user_load: 50,
            data_complexity: 50,
        }
    }
}

impl SimulationParams {
    /// Create params, clamping both inputs to `0..=100`.
    pub fn new(user_load: u8, data_complexity: u8) -> Self {
        Self {
            user_load: user_load.min(100),
            data_complexity: data_complexity.min(100),
        }
    }

    /// Normalized `(load, complexity)` impact factors in `[-1, 1]`.
    pub fn impact(&self) -> (f64, f64) {
        (
            (f64::from(self.user_load.min(100)) - 50.0) / 50.0,
            (f64::from(self.data_complexity.min(100)) - 50.0) / 50.0,
        )
    }
}

/// Derived metrics for one module and one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetrics {
    /// Latency in milliseconds, at least 1.
    pub latency: u32,
    /// Error rate in percent, three decimals, at least 0.
    pub error_rate: f64,
    /// Requests per second, at least 1.
    pub throughput: u32,
    /// Reliability in percent, two decimals, at most 100.
    pub reliability: f64,
    pub status: ModuleStatus,
}

/// Metrics for every module, keyed by module id. Replaced wholesale per tick.
pub type MetricsSet = BTreeMap<&'static str, ModuleMetrics>;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Compute one metrics record.
///
/// Jitter is drawn from `rng` in a fixed order (latency, error rate,
/// throughput, reliability), so a seeded generator reproduces a run.
pub fn calculate_metrics<R: Rng + ?Sized>(
    params: SimulationParams,
    base: &BaseMetrics,
    rng: &mut R,
) -> ModuleMetrics {
    let (load, complexity) = params.impact();

    let latency_jitter: f64 = rng.gen_range(0.9..1.1);
    let error_jitter: f64 = rng.gen_range(0.95..1.05);
    let throughput_jitter: f64 = rng.gen_range(0.95..1.05);
    let reliability_jitter: f64 = rng.gen_range(0.999..1.001);

    let latency = (base.latency_ms * (1.0 + load * 0.5 + complexity * 0.3) * latency_jitter)
        .round()
        .max(1.0) as u32;

    let error_rate = round_to(
        base.error_rate * (1.0 + load * 0.3 + complexity * 0.4) * error_jitter,
        3,
    )
    .max(0.0);

    let throughput = (base.throughput * (1.0 - load * 0.2 - complexity * 0.1) * throughput_jitter)
        .round()
        .max(1.0) as u32;

    let reliability = round_to(
        base.reliability * (1.0 - load * 0.05 - complexity * 0.05) * reliability_jitter,
        2,
    )
    .min(100.0);

    ModuleMetrics {
        latency,
        error_rate,
        throughput,
        reliability,
        status: base.classify(latency, error_rate),
    }
}

/// Run one simulation tick over `modules`, producing a brand-new set.
pub fn simulate_step<R: Rng + ?Sized>(
    modules: &[Module],
    params: SimulationParams,
    base: &BaseMetrics,
    rng: &mut R,
) -> MetricsSet {
    modules
        .iter()
        .map(|m| (m.id, calculate_metrics(params, base, rng)))
        .collect()
}

/// Module counts per status tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub normal: usize,
    pub warning: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn from_metrics(metrics: &MetricsSet) -> Self {
        let mut counts = Self::default();
        for m in metrics.values() {
            match m.status {
                ModuleStatus::Normal => counts.normal += 1,
                ModuleStatus::Warning => counts.warning += 1,
                ModuleStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// Worst tier present, if any module has metrics.
    pub fn worst(&self) -> Option<ModuleStatus> {
        if self.error > 0 {
            Some(ModuleStatus::Error)
        } else if self.warning > 0 {
            Some(ModuleStatus::Warning)
        } else if self.normal > 0 {
            Some(ModuleStatus::Normal)
        } else {
            None
        }
    }
}

/// Radius of the module ring in diagram units.
pub const LAYOUT_RADIUS: f64 = 150.0;
/// Centre of the module ring in diagram units.
pub const LAYOUT_CENTER: (f64, f64) = (250.0, 200.0);

/// Place `count` nodes evenly on a circle, scaled around the centre by `zoom`.
pub fn circular_layout(count: usize, zoom: f64) -> Vec<(f64, f64)> {
    (0..count)
        .map(|i| {
            let angle = (i as f64 / count as f64) * PI * 2.0;
            (
                LAYOUT_CENTER.0 + angle.cos() * LAYOUT_RADIUS * zoom,
                LAYOUT_CENTER.1 + angle.sin() * LAYOUT_RADIUS * zoom,
            )
        })
        .collect()
}

/// Directed module-to-module edges plus the external endpoints.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    /// `(source index, target index)` where the source lists the target's
    /// display name among its outputs.
    pub edges: Vec<(usize, usize)>,
    /// Input/output names that are not modules (e.g. "API", "User").
    pub external: Vec<&'static str>,
}

impl ModuleGraph {
    pub fn from_modules(modules: &[Module]) -> Self {
        let mut edges = Vec::new();
        let mut external: Vec<&'static str> = Vec::new();

        for (src, module) in modules.iter().enumerate() {
            for output in module.outputs {
                match modules.iter().position(|m| m.name == *output) {
                    Some(dst) => edges.push((src, dst)),
                    None => {
                        if !external.contains(output) {
                            external.push(output);
                        }
                    }
                }
            }
            for input in module.inputs {
                if !modules.iter().any(|m| m.name == *input) && !external.contains(input) {
                    external.push(input);
                }
            }
        }

        external.sort_unstable();
        Self { edges, external }
    }

    /// Whether an edge touches the given module index.
    pub fn touches(&self, edge: (usize, usize), index: usize) -> bool {
        edge.0 == index || edge.1 == index
    }
}
