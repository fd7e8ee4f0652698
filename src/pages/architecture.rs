//! Architecture dashboard state: the module health simulator.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{clamp_speed, Settings, SPEED_STEP_MS};
use crate::data::architecture::{
    simulate_step, BaseMetrics, MetricsSet, ModuleGraph, SimulationParams, StatusCounts, MODULES,
};
use crate::data::Route;
use crate::pages::Page;
use crate::scheduler::{Scheduler, TimerId};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.25;

/// Fixed figures shown in the model performance panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPerformance {
    pub response_ms: u32,
    pub cpu_percent: u32,
    pub memory_gb: f64,
    pub explainability_percent: u32,
}

pub const MODEL_PERFORMANCE: ModelPerformance = ModelPerformance {
    response_ms: 320,
    cpu_percent: 42,
    memory_gb: 1.7,
    explainability_percent: 86,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleSimulation,
    /// One simulation tick, delivered by the repeating timer.
    Tick,
    SetUserLoad(u8),
    SetDataComplexity(u8),
    /// Tick period in milliseconds; clamped and snapped to the slider step.
    SetSpeed(u64),
    ZoomIn,
    ZoomOut,
    /// Select a module by index; selecting it again deselects it.
    SelectModule(usize),
    CursorNext,
    CursorPrev,
}

#[derive(Debug)]
pub struct ArchitecturePage {
    scheduler: Scheduler<Action>,
    rng: StdRng,
    base: BaseMetrics,
    params: SimulationParams,
    speed_ms: u64,
    zoom: f64,
    simulating: bool,
    tick_timer: Option<TimerId>,
    metrics: MetricsSet,
    graph: ModuleGraph,
    selected: Option<usize>,
    cursor: usize,
    ticks: u64,
}

impl ArchitecturePage {
    pub fn new(settings: &Settings) -> Self {
        let rng = match settings.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }

    pub fn with_rng(settings: &Settings, rng: StdRng) -> Self {
        Self {
            scheduler: Scheduler::new(),
            rng,
            base: BaseMetrics::default(),
            params: SimulationParams::new(
                settings.simulation.user_load,
                settings.simulation.data_complexity,
            ),
            speed_ms: clamp_speed(settings.simulation.speed_ms),
            zoom: 1.0,
            simulating: false,
            tick_timer: None,
            metrics: MetricsSet::new(),
            graph: ModuleGraph::from_modules(&MODULES),
            selected: None,
            cursor: 0,
            ticks: 0,
        }
    }

    pub fn params(&self) -> SimulationParams {
        self.params
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn metrics(&self) -> &MetricsSet {
        &self.metrics
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::from_metrics(&self.metrics)
    }

    /// Recompute metrics for every module, replacing the previous set.
    pub fn step(&mut self) {
        self.metrics = simulate_step(&MODULES, self.params, &self.base, &mut self.rng);
        self.ticks += 1;
        let counts = self.status_counts();
        debug!(
            tick = self.ticks,
            normal = counts.normal,
            warning = counts.warning,
            error = counts.error,
            "simulation tick"
        );
    }

    fn arm_timer(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.scheduler.cancel(id);
        }
        self.tick_timer = Some(
            self.scheduler
                .schedule_repeating(Duration::from_millis(self.speed_ms), Action::Tick),
        );
    }

    fn start(&mut self) {
        self.simulating = true;
        info!(
            user_load = self.params.user_load,
            data_complexity = self.params.data_complexity,
            speed_ms = self.speed_ms,
            "simulation started"
        );
        self.step();
        self.arm_timer();
    }

    fn stop(&mut self) {
        self.simulating = false;
        if let Some(id) = self.tick_timer.take() {
            self.scheduler.cancel(id);
        }
        info!(ticks = self.ticks, "simulation stopped");
    }

    /// A slider change restarts the tick period while simulating.
    fn set_params(&mut self, params: SimulationParams) {
        if params == self.params {
            return;
        }
        self.params = params;
        if self.simulating {
            self.arm_timer();
        }
    }

    /// Next faster/slower speed on the slider.
    pub fn speed_step(&self, faster: bool) -> u64 {
        if faster {
            self.speed_ms.saturating_sub(SPEED_STEP_MS)
        } else {
            self.speed_ms + SPEED_STEP_MS
        }
    }
}

impl Page for ArchitecturePage {
    type Action = Action;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Action> {
        &mut self.scheduler
    }

    fn update(&mut self, action: Action) -> Option<Route> {
        match action {
            Action::ToggleSimulation => {
                if self.simulating {
                    self.stop();
                } else {
                    self.start();
                }
            }
            Action::Tick => {
                if self.simulating {
                    self.step();
                }
            }
            Action::SetUserLoad(value) => {
                self.set_params(SimulationParams::new(value, self.params.data_complexity));
            }
            Action::SetDataComplexity(value) => {
                self.set_params(SimulationParams::new(self.params.user_load, value));
            }
            Action::SetSpeed(ms) => {
                let ms = clamp_speed(ms);
                if ms != self.speed_ms {
                    self.speed_ms = ms;
                    if self.simulating {
                        self.arm_timer();
                    }
                }
            }
            Action::ZoomIn => self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX),
            Action::ZoomOut => self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN),
            Action::SelectModule(index) => {
                if index < MODULES.len() {
                    self.cursor = index;
                    self.selected = if self.selected == Some(index) {
                        None
                    } else {
                        Some(index)
                    };
                }
            }
            Action::CursorNext => self.cursor = (self.cursor + 1) % MODULES.len(),
            Action::CursorPrev => {
                self.cursor = (self.cursor + MODULES.len() - 1) % MODULES.len();
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ArchitecturePage {
        ArchitecturePage::with_rng(&Settings::default(), StdRng::seed_from_u64(11))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_start_computes_immediately() {
        let mut page = page();
        assert!(page.metrics().is_empty());

        page.update(Action::ToggleSimulation);
        assert!(page.is_simulating());
        assert_eq!(page.metrics().len(), MODULES.len());
        assert_eq!(page.ticks(), 1);
    }

    #[test]
    fn test_ticks_follow_speed() {
        let mut page = page();
        page.update(Action::ToggleSimulation);

        page.tick(ms(999));
        assert_eq!(page.ticks(), 1);
        page.tick(ms(3_000));
        assert_eq!(page.ticks(), 4);
    }

    #[test]
    fn test_stop_cancels_timer_and_keeps_metrics() {
        let mut page = page();
        page.update(Action::ToggleSimulation);
        page.tick(ms(1_000));
        let last = page.metrics().clone();

        page.update(Action::ToggleSimulation);
        page.tick(ms(10_000));

        assert!(!page.is_simulating());
        assert_eq!(page.ticks(), 2);
        assert_eq!(page.metrics(), &last);
    }

    #[test]
    fn test_speed_change_rearms_timer() {
        let mut page = page();
        page.update(Action::ToggleSimulation);
        page.tick(ms(500));
        page.update(Action::SetSpeed(200));
        assert_eq!(page.speed_ms(), 200);

        // New period counts from the change, not from start.
        page.tick(ms(699));
        assert_eq!(page.ticks(), 1);
        page.tick(ms(700));
        assert_eq!(page.ticks(), 2);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut page = page();
        page.update(Action::SetSpeed(10));
        assert_eq!(page.speed_ms(), 100);
        page.update(Action::SetSpeed(50_000));
        assert_eq!(page.speed_ms(), 2_000);
        assert_eq!(page.speed_step(false), 2_100);
    }

    #[test]
    fn test_params_change_rearms_timer() {
        let mut page = page();
        page.update(Action::ToggleSimulation);
        page.tick(ms(600));
        page.update(Action::SetUserLoad(90));
        assert_eq!(page.params().user_load, 90);

        page.tick(ms(1_000));
        assert_eq!(page.ticks(), 1);
        page.tick(ms(1_600));
        assert_eq!(page.ticks(), 2);

        page.update(Action::SetDataComplexity(10));
        page.tick(ms(2_000));
        assert_eq!(page.ticks(), 2);
        page.tick(ms(2_600));
        assert_eq!(page.ticks(), 3);
    }

    #[test]
    fn test_same_params_keep_period() {
        let mut page = page();
        page.update(Action::ToggleSimulation);
        page.tick(ms(600));
        let load = page.params().user_load;
        page.update(Action::SetUserLoad(load));
        page.tick(ms(1_000));
        assert_eq!(page.ticks(), 2);
    }

    #[test]
    fn test_select_toggles() {
        let mut page = page();
        page.update(Action::SelectModule(2));
        assert_eq!(page.selected(), Some(2));
        page.update(Action::SelectModule(2));
        assert_eq!(page.selected(), None);
        page.update(Action::SelectModule(99));
        assert_eq!(page.selected(), None);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut page = page();
        for _ in 0..10 {
            page.update(Action::ZoomIn);
        }
        assert_eq!(page.zoom(), ZOOM_MAX);
        for _ in 0..10 {
            page.update(Action::ZoomOut);
        }
        assert_eq!(page.zoom(), ZOOM_MIN);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut page = page();
        page.update(Action::CursorPrev);
        assert_eq!(page.cursor(), MODULES.len() - 1);
        page.update(Action::CursorNext);
        assert_eq!(page.cursor(), 0);
    }
}
