use std::collections::HashSet;

/// Input handed to gameplay code. The engine attaches no meaning to key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// Anything else the host wants to forward; `kind` tags the payload.
    Custom { kind: u32, a: i32, b: i32 },
}

/// Input collected between two simulation ticks, plus the set of keys
/// currently held down. The event list is drained after every tick; the
/// held set carries over.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
    held: HashSet<u32>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                self.held.insert(key_code);
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
            }
            InputEvent::Custom { .. } => {}
        }
        self.events.push(event);
    }

    /// Events since the last tick, oldest first.
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pressed since the last tick.
    pub fn key_pressed(&self, key_code: u32) -> bool {
        self.events.contains(&InputEvent::KeyDown { key_code })
    }

    /// Released since the last tick.
    pub fn key_released(&self, key_code: u32) -> bool {
        self.events.contains(&InputEvent::KeyUp { key_code })
    }

    /// Down right now, however long ago it was pressed.
    pub fn key_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    pub fn custom(&self, kind: u32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.events.iter().filter_map(move |e| match *e {
            InputEvent::Custom { kind: k, a, b } if k == kind => Some((a, b)),
            _ => None,
        })
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: u32 = 37;
    const SPACE: u32 = 32;

    #[test]
    fn held_keys_survive_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: LEFT });
        assert!(q.key_pressed(LEFT));
        assert_eq!(q.drain().len(), 1);

        assert!(q.is_empty());
        assert!(!q.key_pressed(LEFT));
        assert!(q.key_held(LEFT));

        q.push(InputEvent::KeyUp { key_code: LEFT });
        assert!(q.key_released(LEFT));
        assert!(!q.key_held(LEFT));
    }

    #[test]
    fn tap_within_one_tick_is_seen_but_not_held() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: SPACE });
        q.push(InputEvent::KeyUp { key_code: SPACE });
        assert!(q.key_pressed(SPACE));
        assert!(!q.key_held(SPACE));
    }

    #[test]
    fn custom_events_filter_by_kind() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: -1, b: 2 });
        q.push(InputEvent::Custom { kind: 8, a: 0, b: 0 });
        q.push(InputEvent::Custom { kind: 7, a: 3, b: 4 });
        let sevens: Vec<_> = q.custom(7).collect();
        assert_eq!(sevens, vec![(-1, 2), (3, 4)]);
        assert_eq!(q.events().len(), 3);
    }

    #[test]
    fn release_all_clears_held_set() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: LEFT });
        q.push(InputEvent::KeyDown { key_code: SPACE });
        q.release_all();
        assert!(!q.key_held(LEFT) && !q.key_held(SPACE));
    }
}
