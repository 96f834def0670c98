//! Sprite-sheet animation.
//!
//! A sheet is a grid of `frames` columns by `rows` rows. The controller steps
//! the column index on its own millisecond cadence; the row is chosen when
//! the animation starts.

/// Animation parameters declared on a sprite prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDef {
    /// Columns in the sheet.
    pub frames: u32,
    /// Rows in the sheet.
    pub rows: u32,
    /// Milliseconds each frame stays on screen.
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Animation state owned by a single sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub def: AnimationDef,
    /// Current column (0-based).
    pub frame: u32,
    /// Current row (0-based).
    pub row: u32,
    pub direction: Direction,
    /// Remaining cycles; negative loops forever.
    pub cycles: i32,
    running: bool,
    elapsed_ms: u32,
}

impl Animation {
    pub const LOOP_FOREVER: i32 = -1;

    pub fn new(def: AnimationDef) -> Self {
        Self {
            def,
            frame: 0,
            row: 0,
            direction: Direction::Forward,
            cycles: Self::LOOP_FOREVER,
            running: false,
            elapsed_ms: 0,
        }
    }

    /// Start playing from `(frame, row)`. Single-frame sheets never run.
    pub fn start(&mut self, frame: u32, row: u32, direction: Direction, cycles: i32) {
        self.frame = frame.min(self.def.frames.saturating_sub(1));
        self.row = row.min(self.def.rows.saturating_sub(1));
        self.direction = direction;
        self.cycles = cycles;
        self.elapsed_ms = 0;
        self.running = self.def.frames > 1 && cycles != 0;
    }

    /// Stop and reset to the first cell.
    pub fn stop(&mut self) {
        self.running = false;
        self.frame = 0;
        self.row = 0;
        self.elapsed_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt_ms`. Returns how many counted cycles finished; an
    /// animation looping forever never reports one.
    pub fn tick(&mut self, dt_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }

        let mut steps = if self.def.delay_ms == 0 {
            1
        } else {
            self.elapsed_ms += dt_ms;
            let n = self.elapsed_ms / self.def.delay_ms;
            self.elapsed_ms %= self.def.delay_ms;
            n
        };

        let mut completed = 0;
        while steps > 0 {
            steps -= 1;
            if !self.step() || self.cycles <= 0 {
                continue;
            }
            completed += 1;
            self.cycles -= 1;
            if self.cycles == 0 {
                self.stop();
                break;
            }
        }
        completed
    }

    /// Move one frame. Returns true when the sheet wrapped.
    fn step(&mut self) -> bool {
        let last = self.def.frames - 1;
        match self.direction {
            Direction::Forward if self.frame >= last => {
                self.frame = 0;
                true
            }
            Direction::Forward => {
                self.frame += 1;
                false
            }
            Direction::Reverse if self.frame == 0 => {
                self.frame = last;
                true
            }
            Direction::Reverse => {
                self.frame -= 1;
                false
            }
        }
    }
}
