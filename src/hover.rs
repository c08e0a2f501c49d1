// Hover/idle tracking for the transport chrome. Pointer activity inside the
// player keeps the chrome awake; it goes idle after the hide delay or the
// moment the pointer leaves. One host timer is armed at a time and re-armed
// from the stored deadline, so moves don't churn timers.

use crate::types::HoverVisibility;

/// Result of a pointer wake: whether the attribute changed and whether the
/// host should arm the hide timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WakeOutcome {
    pub became_active: bool,
    pub schedule_ms: Option<f64>,
}

/// Result of the hide timer firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerOutcome {
    pub became_idle: bool,
    /// Activity pushed the deadline since the timer was armed; re-arm for
    /// the remainder.
    pub reschedule_ms: Option<f64>,
}

#[derive(Debug)]
pub struct HoverTracker {
    hide_delay_ms: f64,
    state: HoverVisibility,
    deadline_ms: Option<f64>,
    timer_armed: bool,
}

impl HoverTracker {
    pub fn new(hide_delay_ms: f64) -> Self {
        HoverTracker {
            hide_delay_ms,
            state: HoverVisibility::Idle,
            deadline_ms: None,
            timer_armed: false,
        }
    }

    pub fn state(&self) -> HoverVisibility {
        self.state
    }

    /// Pointer enter/move/down inside the player bounds, or a fullscreen
    /// change. Resets the hide deadline.
    pub fn wake(&mut self, now_ms: f64) -> WakeOutcome {
        let became_active = self.state != HoverVisibility::Active;
        self.state = HoverVisibility::Active;
        self.deadline_ms = Some(now_ms + self.hide_delay_ms);
        let schedule_ms = if self.timer_armed {
            None
        } else {
            self.timer_armed = true;
            Some(self.hide_delay_ms)
        };
        WakeOutcome {
            became_active,
            schedule_ms,
        }
    }

    /// Pointer left the player region: idle immediately. A still-armed timer
    /// fires into a cleared deadline and does nothing.
    pub fn leave(&mut self) -> bool {
        self.deadline_ms = None;
        let changed = self.state != HoverVisibility::Idle;
        self.state = HoverVisibility::Idle;
        changed
    }

    pub fn timer_fired(&mut self, now_ms: f64) -> TimerOutcome {
        self.timer_armed = false;
        let deadline = match self.deadline_ms {
            Some(d) => d,
            None => {
                return TimerOutcome {
                    became_idle: false,
                    reschedule_ms: None,
                }
            }
        };
        if now_ms >= deadline {
            self.deadline_ms = None;
            let became_idle = self.state != HoverVisibility::Idle;
            self.state = HoverVisibility::Idle;
            TimerOutcome {
                became_idle,
                reschedule_ms: None,
            }
        } else {
            self.timer_armed = true;
            TimerOutcome {
                became_idle: false,
                reschedule_ms: Some(deadline - now_ms),
            }
        }
    }
}
