use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::action::{Action, Direction};

/// Raw events delivered by the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Key down, by platform key name (`"w"`, `"ArrowUp"`, `"Escape"`).
    KeyDown(String),
    /// Pointer position in pixels, origin top-left.
    PointerMove { x: f32, y: f32 },
    Click,
    /// On-screen direction button pressed (touch start or mouse down).
    ButtonPress(Direction),
    ButtonRelease(Direction),
    Resize { width: u32, height: u32 },
}

/// Drawable surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Pixels to normalized device coordinates, y up, clamped to `[-1, 1]`.
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Vec2::new(x / w * 2.0 - 1.0, -(y / h * 2.0 - 1.0)).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }
}

/// Everything the frame tick needs from input, drained once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameIntent {
    /// Direction key presses in arrival order.
    pub moves: Vec<Direction>,
    /// Direction buttons currently held down.
    pub held: Vec<Direction>,
    pub respawn: bool,
    pub close_info: bool,
    pub clicks: u32,
    /// Current pointer position in NDC.
    pub pointer_ndc: Vec2,
    /// Set when the viewport changed since the last drain.
    pub resized: Option<Viewport>,
}

impl FrameIntent {
    pub fn is_idle(&self) -> bool {
        self.moves.is_empty()
            && self.held.is_empty()
            && !self.respawn
            && !self.close_info
            && self.clicks == 0
            && self.resized.is_none()
    }
}

/// Pending input written by event handlers and polled by the frame tick.
///
/// Handlers only ever append here; nothing in the buffer touches the
/// character or the scene.
#[derive(Debug, Clone, Default)]
pub struct IntentBuffer {
    viewport: Viewport,
    pointer_ndc: Vec2,
    held: BTreeSet<Direction>,
    moves: Vec<Direction>,
    respawn: bool,
    close_info: bool,
    clicks: u32,
    resized: bool,
}

impl IntentBuffer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer_ndc
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => match Action::from_key(&key) {
                Action::Move(dir) => self.moves.push(dir),
                Action::Respawn => self.respawn = true,
                Action::CloseInfo => self.close_info = true,
                Action::Noop => tracing::debug!(%key, "unbound key ignored"),
            },
            InputEvent::PointerMove { x, y } => {
                self.pointer_ndc = self.viewport.to_ndc(x, y);
            }
            InputEvent::Click => self.clicks += 1,
            InputEvent::ButtonPress(dir) => {
                self.held.insert(dir);
            }
            InputEvent::ButtonRelease(dir) => {
                self.held.remove(&dir);
            }
            InputEvent::Resize { width, height } => {
                self.viewport = Viewport { width, height };
                self.resized = true;
            }
        }
    }

    /// Take the pending one-shot input. Held buttons and the pointer persist.
    pub fn drain(&mut self) -> FrameIntent {
        FrameIntent {
            moves: std::mem::take(&mut self.moves),
            held: self.held.iter().copied().collect(),
            respawn: std::mem::take(&mut self.respawn),
            close_info: std::mem::take(&mut self.close_info),
            clicks: std::mem::take(&mut self.clicks),
            pointer_ndc: self.pointer_ndc,
            resized: std::mem::take(&mut self.resized).then_some(self.viewport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_to_ndc() {
        let vp = Viewport {
            width: 800,
            height: 600,
        };
        assert_eq!(vp.to_ndc(400.0, 300.0), Vec2::ZERO);
        assert_eq!(vp.to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(-50.0, 900.0), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn zero_sized_viewport_does_not_divide_by_zero() {
        let vp = Viewport {
            width: 0,
            height: 0,
        };
        assert!(vp.to_ndc(0.0, 0.0).is_finite());
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn keys_queue_until_drained() {
        let mut buf = IntentBuffer::default();
        buf.push(InputEvent::KeyDown("w".into()));
        buf.push(InputEvent::KeyDown("ArrowLeft".into()));
        buf.push(InputEvent::KeyDown("r".into()));
        buf.push(InputEvent::KeyDown("Escape".into()));
        buf.push(InputEvent::KeyDown("q".into()));

        let intent = buf.drain();
        assert_eq!(intent.moves, vec![Direction::Forward, Direction::Left]);
        assert!(intent.respawn);
        assert!(intent.close_info);

        let next = buf.drain();
        assert!(next.is_idle());
    }

    #[test]
    fn held_buttons_persist_across_drains() {
        let mut buf = IntentBuffer::default();
        buf.push(InputEvent::ButtonPress(Direction::Forward));
        assert_eq!(buf.drain().held, vec![Direction::Forward]);
        assert_eq!(buf.drain().held, vec![Direction::Forward]);
        buf.push(InputEvent::ButtonRelease(Direction::Forward));
        assert!(buf.drain().held.is_empty());
    }

    #[test]
    fn clicks_are_counted_and_pointer_kept() {
        let mut buf = IntentBuffer::default();
        buf.push(InputEvent::PointerMove { x: 600.0, y: 150.0 });
        buf.push(InputEvent::Click);
        buf.push(InputEvent::Click);
        let intent = buf.drain();
        assert_eq!(intent.clicks, 2);
        assert_eq!(intent.pointer_ndc, Vec2::new(0.5, 0.5));
        assert_eq!(buf.drain().pointer_ndc, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn resize_reported_once_and_affects_mapping() {
        let mut buf = IntentBuffer::default();
        buf.push(InputEvent::Resize {
            width: 200,
            height: 100,
        });
        buf.push(InputEvent::PointerMove { x: 100.0, y: 50.0 });
        let intent = buf.drain();
        assert_eq!(
            intent.resized,
            Some(Viewport {
                width: 200,
                height: 100
            })
        );
        assert_eq!(intent.pointer_ndc, Vec2::ZERO);
        assert!(buf.drain().resized.is_none());
    }
}
