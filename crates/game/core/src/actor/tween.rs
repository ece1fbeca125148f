//! Commit-then-interpolate movement animation.
//!
//! A move records the pixel vector first and the logical position is
//! committed immediately afterwards; the tween then walks the pixel offset
//! back to zero over one move delay. While a tween runs the actor asks the
//! scheduler to wait.

use crate::types::{Direction, Position};

/// Pixel displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelOffset {
    pub x: i32,
    pub y: i32,
}

impl PixelOffset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tween {
    move_vector: PixelOffset,
    pixel_offset: PixelOffset,
    wait: f64,
    tweening: bool,
    nudging: bool,
}

impl Tween {
    /// Starts a full move from `from` to `to`; the offset begins at minus the vector.
    pub fn animate(&mut self, from: Position, to: Position, tile_size: i32) {
        let (dx, dy) = to - from;
        self.move_vector = PixelOffset::new(dx * tile_size, dy * tile_size);
        self.pixel_offset = PixelOffset::new(-self.move_vector.x, -self.move_vector.y);
        self.tweening = true;
    }

    /// Half-tile bump toward `dir` and back, with no logical move.
    pub fn nudge(&mut self, dir: Direction, tile_size: i32) {
        let (dx, dy) = dir.offset();
        self.move_vector = PixelOffset::new(dx * tile_size / 2, dy * tile_size / 2);
        self.pixel_offset = PixelOffset::ZERO;
        self.tweening = true;
        self.nudging = true;
    }

    /// Advances the interpolation by `dt` seconds.
    pub fn advance(&mut self, dt: f64, move_delay: f64) {
        if !self.tweening {
            self.move_vector = PixelOffset::ZERO;
            self.pixel_offset = PixelOffset::ZERO;
            return;
        }

        let base = if self.nudging {
            PixelOffset::ZERO
        } else {
            self.move_vector
        };
        let scale = if move_delay > 0.0 {
            self.wait / move_delay
        } else {
            1.0
        };
        self.pixel_offset = PixelOffset::new(
            (f64::from(self.move_vector.x) * scale) as i32 - base.x,
            (f64::from(self.move_vector.y) * scale) as i32 - base.y,
        );

        if self.wait < move_delay {
            self.wait += dt;
        } else {
            self.wait -= self.wait.min(move_delay);
            self.tweening = false;
            self.nudging = false;
        }
    }

    #[inline]
    pub fn is_tweening(&self) -> bool {
        self.tweening
    }

    #[inline]
    pub fn is_nudging(&self) -> bool {
        self.nudging
    }

    #[inline]
    pub fn pixel_offset(&self) -> PixelOffset {
        self.pixel_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_offset_starts_behind_and_settles_at_zero() {
        let mut tween = Tween::default();
        tween.animate(Position::new(0, 0), Position::new(1, 0), 32);
        assert!(tween.is_tweening());
        assert_eq!(tween.pixel_offset(), PixelOffset::new(-32, 0));

        tween.advance(0.05, 0.1);
        assert_eq!(tween.pixel_offset(), PixelOffset::new(-32, 0));
        tween.advance(0.05, 0.1);
        assert_eq!(tween.pixel_offset(), PixelOffset::new(-16, 0));
        tween.advance(0.05, 0.1);
        assert!(!tween.is_tweening());

        tween.advance(0.05, 0.1);
        assert_eq!(tween.pixel_offset(), PixelOffset::ZERO);
    }

    #[test]
    fn nudge_moves_out_and_snaps_back() {
        let mut tween = Tween::default();
        tween.nudge(Direction::Up, 32);
        assert!(tween.is_nudging());
        tween.advance(0.05, 0.1);
        tween.advance(0.05, 0.1);
        assert_eq!(tween.pixel_offset(), PixelOffset::new(0, -8));
        tween.advance(0.05, 0.1);
        assert!(!tween.is_tweening());
        assert!(!tween.is_nudging());
    }
}
