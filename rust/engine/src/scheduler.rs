//! Timed replay of a hand resolution.
//!
//! The scheduler is a plain state machine advanced by [`HarvestScheduler::poll`]
//! once per frame. It never sleeps and never touches the score: it tells the
//! round manager which beat is due and when the last beat of a soil has been
//! reached, and the round manager does the scoring.

use std::time::Duration;

use crate::events::Screen;

/// One planted soil in a resolution plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedHarvest {
    pub soil: usize,
    /// Number of animation beats, at least one
    pub retriggers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Animating {
        /// Position in the plan, not a soil index
        cursor: usize,
        retrigger: u32,
        last_step: Duration,
    },
    PendingTransition {
        target: Screen,
        due: Duration,
    },
}

/// What a poll produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStep {
    /// Nothing scheduled
    Idle,
    /// Something scheduled, not due yet
    Waiting,
    /// One beat for `soil`; `resolve` is set on the soil's last beat, which
    /// is when its score must be applied
    Beat {
        soil: usize,
        retrigger: u32,
        of: u32,
        resolve: bool,
    },
    /// Every soil has been resolved
    Finished,
    /// A deferred screen change came due
    Transition(Screen),
}

#[derive(Debug, Clone)]
pub struct HarvestScheduler {
    state: SchedulerState,
    plan: Vec<PlannedHarvest>,
    step_delay: Duration,
}

impl HarvestScheduler {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            plan: Vec::new(),
            step_delay,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, SchedulerState::Animating { .. })
    }

    /// Starts animating `plan` from its first soil. An empty plan leaves the
    /// scheduler untouched and returns `false`.
    pub fn start(&mut self, plan: Vec<PlannedHarvest>, now: Duration) -> bool {
        if plan.is_empty() {
            return false;
        }
        self.plan = plan;
        self.state = SchedulerState::Animating {
            cursor: 0,
            retrigger: 0,
            last_step: now,
        };
        true
    }

    /// Requests `target` once the clock reaches `due`.
    pub fn schedule_transition(&mut self, target: Screen, due: Duration) {
        self.state = SchedulerState::PendingTransition { target, due };
    }

    /// Advances by at most one step.
    pub fn poll(&mut self, now: Duration) -> SchedulerStep {
        match self.state {
            SchedulerState::Idle => SchedulerStep::Idle,
            SchedulerState::PendingTransition { target, due } => {
                if now >= due {
                    self.state = SchedulerState::Idle;
                    SchedulerStep::Transition(target)
                } else {
                    SchedulerStep::Waiting
                }
            }
            SchedulerState::Animating {
                cursor,
                retrigger,
                last_step,
            } => {
                let Some(entry) = self.plan.get(cursor).copied() else {
                    self.state = SchedulerState::Idle;
                    self.plan.clear();
                    return SchedulerStep::Finished;
                };
                if now.saturating_sub(last_step) <= self.step_delay {
                    return SchedulerStep::Waiting;
                }
                let of = entry.retriggers.max(1);
                let resolve = retrigger + 1 >= of;
                self.state = if resolve {
                    SchedulerState::Animating {
                        cursor: cursor + 1,
                        retrigger: 0,
                        last_step: now,
                    }
                } else {
                    SchedulerState::Animating {
                        cursor,
                        retrigger: retrigger + 1,
                        last_step: now,
                    }
                };
                SchedulerStep::Beat {
                    soil: entry.soil,
                    retrigger,
                    of,
                    resolve,
                }
            }
        }
    }
}
