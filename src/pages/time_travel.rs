//! Time-travel debugger state: scrubbing and playback over a fixed timeline.

use std::time::Duration;

use tracing::{debug, info};

use crate::data::timeline::{TimelineEvent, BRANCH_START, INITIAL_INDEX, TIMELINE};
use crate::data::Route;
use crate::pages::Page;
use crate::scheduler::{Scheduler, TimerId};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StepForward,
    StepBack,
    JumpTo(usize),
    TogglePlay,
    /// Playback step, delivered by the repeating timer.
    PlaybackTick,
    ToggleEditMode,
    CreateBranch,
}

#[derive(Debug)]
pub struct TimeTravelPage {
    scheduler: Scheduler<Action>,
    period: Duration,
    index: usize,
    playing: bool,
    play_timer: Option<TimerId>,
    edit_mode: bool,
    branch_created: bool,
}

impl TimeTravelPage {
    pub fn new(period: Duration) -> Self {
        Self {
            scheduler: Scheduler::new(),
            period,
            index: INITIAL_INDEX,
            playing: false,
            play_timer: None,
            edit_mode: false,
            branch_created: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> &'static TimelineEvent {
        &TIMELINE[self.index]
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn branch_created(&self) -> bool {
        self.branch_created
    }

    /// Whether the event at `index` belongs to the created branch.
    pub fn is_branched(&self, index: usize) -> bool {
        self.branch_created && index >= BRANCH_START
    }

    fn last_index() -> usize {
        TIMELINE.len() - 1
    }

    fn stop(&mut self) {
        self.playing = false;
        if let Some(id) = self.play_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl Page for TimeTravelPage {
    type Action = Action;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Action> {
        &mut self.scheduler
    }

    fn update(&mut self, action: Action) -> Option<Route> {
        match action {
            Action::StepForward => self.index = (self.index + 1).min(Self::last_index()),
            Action::StepBack => self.index = self.index.saturating_sub(1),
            Action::JumpTo(index) => {
                if index < TIMELINE.len() {
                    self.index = index;
                }
            }
            Action::TogglePlay => {
                if self.playing {
                    self.stop();
                } else {
                    self.playing = true;
                    self.play_timer = Some(
                        self.scheduler
                            .schedule_repeating(self.period, Action::PlaybackTick),
                    );
                }
                debug!(playing = self.playing, index = self.index, "playback toggled");
            }
            Action::PlaybackTick => {
                if !self.playing {
                    return None;
                }
                if self.index < Self::last_index() {
                    self.index += 1;
                }
                if self.index == Self::last_index() {
                    self.stop();
                }
            }
            Action::ToggleEditMode => self.edit_mode = !self.edit_mode,
            Action::CreateBranch => {
                if !self.branch_created {
                    self.branch_created = true;
                    info!(from = BRANCH_START, "branch created");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_initial_state() {
        let page = TimeTravelPage::new(secs(2));
        assert_eq!(page.index(), 3);
        assert_eq!(page.selected().id, 4);
        assert!(!page.is_playing());
    }

    #[test]
    fn test_playback_steps_and_stops_at_end() {
        let mut page = TimeTravelPage::new(secs(2));
        page.update(Action::TogglePlay);

        page.tick(secs(2));
        assert_eq!(page.index(), 4);
        page.tick(secs(6));
        assert_eq!(page.index(), 6);
        assert!(page.is_playing());

        page.tick(secs(8));
        assert_eq!(page.index(), 7);
        assert!(!page.is_playing());

        page.tick(secs(60));
        assert_eq!(page.index(), 7);
    }

    #[test]
    fn test_pause_keeps_position() {
        let mut page = TimeTravelPage::new(secs(2));
        page.update(Action::TogglePlay);
        page.tick(secs(2));
        page.update(Action::TogglePlay);
        page.tick(secs(20));
        assert_eq!(page.index(), 4);
    }

    #[test]
    fn test_play_at_end_stops_on_next_tick() {
        let mut page = TimeTravelPage::new(secs(2));
        page.update(Action::JumpTo(7));
        page.update(Action::TogglePlay);
        assert!(page.is_playing());
        page.tick(secs(2));
        assert!(!page.is_playing());
        assert_eq!(page.index(), 7);
    }

    #[test]
    fn test_scrub_bounds() {
        let mut page = TimeTravelPage::new(secs(2));
        for _ in 0..20 {
            page.update(Action::StepBack);
        }
        assert_eq!(page.index(), 0);
        for _ in 0..20 {
            page.update(Action::StepForward);
        }
        assert_eq!(page.index(), 7);
        page.update(Action::JumpTo(42));
        assert_eq!(page.index(), 7);
    }

    #[test]
    fn test_branch_created_once() {
        let mut page = TimeTravelPage::new(secs(2));
        assert!(!page.is_branched(5));
        page.update(Action::CreateBranch);
        page.update(Action::CreateBranch);
        assert!(page.branch_created());
        assert!(!page.is_branched(3));
        assert!(page.is_branched(4));
        assert!(page.is_branched(7));
    }

    #[test]
    fn test_edit_mode_toggle() {
        let mut page = TimeTravelPage::new(secs(2));
        page.update(Action::ToggleEditMode);
        assert!(page.edit_mode());
        page.update(Action::ToggleEditMode);
        assert!(!page.edit_mode());
    }
}
