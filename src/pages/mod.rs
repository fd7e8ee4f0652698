//! Page state containers.
//!
//! Each page owns its state and a [`Scheduler`] for its timers, and changes
//! state only through [`Page::update`]. Key handling in [`crate::events`]
//! translates input into actions; timers deliver actions through
//! [`Page::tick`]. A page is created when navigated to and dropped when left,
//! which discards its pending timers.

pub mod architecture;
pub mod code_editor;
pub mod feedback;
pub mod input;
pub mod planning;
pub mod prompting;
pub mod time_travel;

use std::time::Duration;

use crate::data::Route;
use crate::scheduler::Scheduler;

pub use architecture::ArchitecturePage;
pub use code_editor::CodeEditorPage;
pub use feedback::FeedbackPage;
pub use input::TextField;
pub use planning::PlanningPage;
pub use prompting::PromptingPage;
pub use time_travel::TimeTravelPage;

/// A page reducer with its own timer queue.
pub trait Page {
    type Action: Clone;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Self::Action>;

    /// Apply one action. Returns a route when the action navigates away.
    fn update(&mut self, action: Self::Action) -> Option<Route>;

    /// Advance the page clock to `elapsed` since mount and apply every timer
    /// action that came due, one at a time so that timers armed by a handler
    /// can still fire within the same tick. Returns the last navigation
    /// requested, if any.
    fn tick(&mut self, elapsed: Duration) -> Option<Route> {
        let mut route = None;
        while let Some(action) = self.scheduler_mut().pop_due(elapsed) {
            if let Some(next) = self.update(action) {
                route = Some(next);
            }
        }
        self.scheduler_mut().advance_clock(elapsed);
        route
    }
}
