//! Animation frame selection.
//!
//! An [`Animation`] is an immutable playback definition owned by the image it
//! is declared on: a frame rate, a loop mode and an ordered list of 0-based
//! tile offsets. [`Animation::frame_at`] maps an elapsed time to the 1-based
//! tile frame number the tile geometry resolver understands (0 is reserved
//! for "the whole image").

use smallvec::SmallVec;

/// What happens when playback reaches the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Hold on the final frame once the sequence has played through.
    #[default]
    None,
    /// Wrap back to the first frame and keep playing.
    Loop,
}

/// Immutable playback parameters for one named animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Playback speed in frames per second. Zero freezes on the first frame.
    pub rate: f32,
    pub loop_mode: LoopMode,
    /// 0-based tile offsets, at least one entry.
    pub frames: SmallVec<[u32; 8]>,
}

impl Animation {
    /// Create an animation. Panics if `frames` is empty; the metadata parser
    /// rejects empty frame lists before this is reached.
    pub fn new(rate: f32, loop_mode: LoopMode, frames: impl IntoIterator<Item = u32>) -> Self {
        let frames: SmallVec<[u32; 8]> = frames.into_iter().collect();
        assert!(!frames.is_empty(), "animation frame list is empty");
        Animation {
            rate,
            loop_mode,
            frames,
        }
    }

    /// The 1-based tile frame number to show at `time` seconds.
    ///
    /// `floor(time * rate)` selects the raw step. Looping animations wrap;
    /// non-looping animations hold on the final frame once the sequence has
    /// completed (the historical behavior clamped one step past the last
    /// frame; see DESIGN.md).
    pub fn frame_at(&self, time: f32) -> u32 {
        let raw = if self.rate > 0.0 {
            (time * self.rate).floor().max(0.0) as usize
        } else {
            0
        };
        let index = match self.loop_mode {
            LoopMode::Loop => raw % self.frames.len(),
            LoopMode::None => raw.min(self.frames.len() - 1),
        };
        self.frames[index] + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_animation_wraps() {
        let anim = Animation::new(10.0, LoopMode::Loop, [4, 5, 6]);
        // 0.35s at 10 fps is raw step 3, which wraps to index 0.
        assert_eq!(anim.frame_at(0.35), 5);
        assert_eq!(anim.frame_at(0.0), 5);
        assert_eq!(anim.frame_at(0.15), 6);
        assert_eq!(anim.frame_at(0.25), 7);
    }

    #[test]
    fn non_looping_animation_holds_last_frame() {
        let anim = Animation::new(10.0, LoopMode::None, [4, 5, 6]);
        // Raw step 10 is far past the end of the 3-frame sequence; playback
        // holds on the final frame rather than indexing past it.
        assert_eq!(anim.frame_at(1.0), 7);
        assert_eq!(anim.frame_at(0.25), 7);
        assert_eq!(anim.frame_at(0.05), 4 + 1);
    }

    #[test]
    fn zero_rate_freezes_on_first_frame() {
        let anim = Animation::new(0.0, LoopMode::Loop, [9, 1]);
        assert_eq!(anim.frame_at(0.0), 10);
        assert_eq!(anim.frame_at(100.0), 10);
    }

    #[test]
    fn single_frame_animation_is_constant() {
        let anim = Animation::new(30.0, LoopMode::Loop, [2]);
        for t in [0.0, 0.5, 2.0, 10.0] {
            assert_eq!(anim.frame_at(t), 3);
        }
    }

    #[test]
    fn negative_time_is_treated_as_start() {
        let anim = Animation::new(10.0, LoopMode::Loop, [0, 1, 2]);
        assert_eq!(anim.frame_at(-5.0), 1);
    }
}
