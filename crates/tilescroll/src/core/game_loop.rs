//! The two engine cadences: rendering and simulation.
//!
//! Both timers live on the caller's thread. [`GameLoop::next_tick`] hands out
//! due ticks one at a time in clock order, so a tick never overlaps another.

use crate::core::time::IntervalTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopTick {
    Simulation,
    Render,
}

#[derive(Debug, Clone)]
pub struct GameLoop {
    display_ms: u64,
    game_ms: u64,
    max_catch_up: u64,
    render: Option<IntervalTimer>,
    simulation: Option<IntervalTimer>,
}

impl GameLoop {
    pub fn new(display_ms: u64, game_ms: u64, max_catch_up: u64) -> Self {
        Self {
            display_ms,
            game_ms,
            max_catch_up: max_catch_up.max(1),
            render: None,
            simulation: None,
        }
    }

    /// Arm both timers, replacing any armed ones.
    pub fn start(&mut self, now_ms: u64) {
        self.render = Some(IntervalTimer::new(self.display_ms, now_ms));
        self.simulation = Some(IntervalTimer::new(self.game_ms, now_ms));
    }

    /// Cancel both timers. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.render = None;
        self.simulation = None;
    }

    /// Reflects the render timer only.
    pub fn is_running(&self) -> bool {
        self.render.is_some()
    }

    pub fn display_ms(&self) -> u64 {
        self.display_ms
    }

    pub fn game_ms(&self) -> u64 {
        self.game_ms
    }

    /// Change both cadences; a running loop is restarted from `now_ms`.
    pub fn set_speed(&mut self, display_ms: u64, game_ms: u64, now_ms: u64) {
        self.display_ms = display_ms;
        self.game_ms = game_ms;
        if self.is_running() {
            self.stop();
            self.start(now_ms);
        }
    }

    /// Earliest clock time at which a tick is due.
    pub fn next_due(&self) -> Option<u64> {
        let render = self.render.map(|t| t.next_due());
        let simulation = self.simulation.map(|t| t.next_due());
        match (render, simulation) {
            (Some(r), Some(s)) => Some(r.min(s)),
            (r, s) => r.or(s),
        }
    }

    /// Pop the earliest due tick at `now_ms`. Simulation wins ties.
    pub fn next_tick(&mut self, now_ms: u64) -> Option<LoopTick> {
        let max = self.max_catch_up;
        if let Some(t) = self.simulation.as_mut() {
            let dropped = t.drop_backlog(now_ms, max);
            if dropped > 0 {
                log::warn!("simulation fell behind, dropped {dropped} tick(s)");
            }
        }
        if let Some(t) = self.render.as_mut() {
            let dropped = t.drop_backlog(now_ms, max);
            if dropped > 0 {
                log::warn!("rendering fell behind, dropped {dropped} frame(s)");
            }
        }

        let sim_due = self.simulation.filter(|t| t.is_due(now_ms)).map(|t| t.next_due());
        let render_due = self.render.filter(|t| t.is_due(now_ms)).map(|t| t.next_due());

        let tick = match (sim_due, render_due) {
            (Some(s), Some(r)) if r < s => LoopTick::Render,
            (Some(_), _) => LoopTick::Simulation,
            (None, Some(_)) => LoopTick::Render,
            (None, None) => return None,
        };
        let timer = match tick {
            LoopTick::Simulation => self.simulation.as_mut(),
            LoopTick::Render => self.render.as_mut(),
        };
        if let Some(t) = timer {
            t.fire();
        }
        Some(tick)
    }
}
