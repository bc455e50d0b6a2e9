//! Frame-based animation state for one entity.
//!
//! An [`Animator`] owns a shared table of [`AnimationClip`]s (loaded once from
//! the player configuration) and the playback state of the clip currently
//! selected. Controllers request clips with [`Animator::set_animation`]; the
//! animation system advances playback once per variable-rate tick and writes
//! the current frame's image key to the entity properties.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const IDLE: &str = "idle";
pub const WALK: &str = "walk";
pub const JUMP_HOLD: &str = "jumpHold";
pub const JUMP: &str = "jump";
pub const JUMP_FALL: &str = "jumpFall";
pub const KNOCKBACK: &str = "knockBack";
pub const FALL: &str = "fall";

/// Ordered frames with a fixed per-frame duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub repeat: bool,
    /// Seconds each frame stays on screen.
    pub duration: f32,
    /// Image keys, in playback order.
    pub frames: Vec<String>,
}

pub type ClipTable = FxHashMap<String, AnimationClip>;

#[derive(Debug, Clone, Component)]
pub struct Animator {
    clips: Arc<ClipTable>,
    current_key: Option<String>,
    frame_index: usize,
    timer: f32,
}

impl Animator {
    pub fn new(clips: Arc<ClipTable>) -> Self {
        Self {
            clips,
            current_key: None,
            frame_index: 0,
            timer: 0.0,
        }
    }

    /// Create an animator that starts on `key`.
    pub fn with_initial(clips: Arc<ClipTable>, key: &str) -> Self {
        let mut animator = Self::new(clips);
        animator.set_animation(key);
        animator
    }

    /// Switch to `key`, restarting from the first frame.
    ///
    /// Requesting the clip that is already playing, or a clip that does not
    /// exist, leaves playback untouched.
    pub fn set_animation(&mut self, key: &str) {
        if self.current_key.as_deref() == Some(key) {
            return;
        }
        let Some(clip) = self.clips.get(key) else {
            return;
        };
        self.timer = clip.duration;
        self.frame_index = 0;
        self.current_key = Some(key.to_string());
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Long steps skip as many frames as they cover. A clip that does not
    /// repeat stops on its last frame and keeps its timer negative, which is
    /// what [`Animator::animation_ended`] reports.
    pub fn advance(&mut self, dt: f32) {
        let Some(key) = self.current_key.as_deref() else {
            return;
        };
        let Some(clip) = self.clips.get(key) else {
            return;
        };
        if clip.frames.is_empty() || clip.duration <= 0.0 {
            return;
        }

        self.timer -= dt;
        if self.timer >= 0.0 {
            return;
        }

        let overdue = -self.timer;
        let len = clip.frames.len();
        let skipped = (overdue / clip.duration).floor();
        // `as` saturates on huge ratios.
        let steps = (skipped as usize).saturating_add(1);
        let remainder = overdue - skipped * clip.duration;

        if clip.repeat {
            self.frame_index = (self.frame_index + steps % len) % len;
            self.timer = (clip.duration - remainder).clamp(0.0, clip.duration);
            return;
        }

        let remaining = len - 1 - self.frame_index.min(len - 1);
        if steps <= remaining {
            self.frame_index += steps;
            self.timer = (clip.duration - remainder).clamp(0.0, clip.duration);
        } else {
            self.frame_index = len - 1;
            self.timer = (remaining as f32 * clip.duration - overdue).min(-f32::MIN_POSITIVE);
        }
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current_key.as_deref()
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.current_key.as_deref().and_then(|k| self.clips.get(k))
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Image key of the frame on screen.
    pub fn current_frame(&self) -> Option<&str> {
        self.current_clip()
            .and_then(|clip| clip.frames.get(self.frame_index))
            .map(String::as_str)
    }

    /// `true` once a non-repeating clip has played its last frame out.
    pub fn animation_ended(&self) -> bool {
        match self.current_clip() {
            Some(clip) => {
                !clip.repeat
                    && !clip.frames.is_empty()
                    && self.frame_index == clip.frames.len() - 1
                    && self.timer < 0.0
            }
            None => false,
        }
    }

    /// `true` while `key` is the current clip and has not finished.
    pub fn is_playing_unfinished(&self, key: &str) -> bool {
        self.current_key() == Some(key) && !self.animation_ended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(repeat: bool, duration: f32, n: usize) -> AnimationClip {
        AnimationClip {
            repeat,
            duration,
            frames: (0..n).map(|i| format!("f{i}")).collect(),
        }
    }

    fn table() -> Arc<ClipTable> {
        let mut t = ClipTable::default();
        t.insert("once".into(), clip(false, 0.1, 3));
        t.insert("loop".into(), clip(true, 0.1, 3));
        t.insert("single".into(), clip(false, 0.1, 1));
        t.insert("frozen".into(), clip(true, 0.0, 2));
        Arc::new(t)
    }

    // ==================== SET ANIMATION TESTS ====================

    #[test]
    fn test_new_animator_has_no_clip() {
        let a = Animator::new(table());
        assert!(a.current_clip().is_none());
        assert!(a.current_frame().is_none());
        assert!(!a.animation_ended());
    }

    #[test]
    fn test_set_animation_resets_playback() {
        let mut a = Animator::with_initial(table(), "loop");
        a.advance(0.15);
        assert_eq!(a.frame_index(), 1);
        a.set_animation("once");
        assert_eq!(a.current_key(), Some("once"));
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn test_set_same_animation_is_noop() {
        let mut a = Animator::with_initial(table(), "loop");
        a.advance(0.15);
        a.set_animation("loop");
        assert_eq!(a.frame_index(), 1);
    }

    #[test]
    fn test_set_unknown_animation_is_noop() {
        let mut a = Animator::with_initial(table(), "loop");
        a.set_animation("does-not-exist");
        assert_eq!(a.current_key(), Some("loop"));
    }

    // ==================== ADVANCE TESTS ====================

    #[test]
    fn test_non_repeating_clip_ends_on_last_frame() {
        let mut a = Animator::with_initial(table(), "once");
        a.advance(0.31);
        assert_eq!(a.frame_index(), 2);
        assert!(a.animation_ended());
        assert_eq!(a.current_frame(), Some("f2"));
    }

    #[test]
    fn test_non_repeating_clip_in_small_steps() {
        let mut a = Animator::with_initial(table(), "once");
        for _ in 0..25 {
            a.advance(0.01);
        }
        assert_eq!(a.frame_index(), 2);
        assert!(!a.animation_ended());
        for _ in 0..10 {
            a.advance(0.01);
        }
        assert_eq!(a.frame_index(), 2);
        assert!(a.animation_ended());
    }

    #[test]
    fn test_repeating_clip_wraps_and_never_ends() {
        let mut a = Animator::with_initial(table(), "loop");
        a.advance(0.31);
        assert_eq!(a.frame_index(), 0);
        assert!(!a.animation_ended());
        for _ in 0..100 {
            a.advance(0.07);
            assert!(!a.animation_ended());
            assert!(a.frame_index() < 3);
        }
    }

    #[test]
    fn test_single_frame_clip_ends_after_duration() {
        let mut a = Animator::with_initial(table(), "single");
        a.advance(0.05);
        assert!(!a.animation_ended());
        a.advance(0.06);
        assert!(a.animation_ended());
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn test_tiny_frame_duration_wraps_without_spinning() {
        let mut t = ClipTable::default();
        t.insert("blink".into(), clip(true, 1e-9, 2));
        let mut a = Animator::with_initial(Arc::new(t), "blink");
        a.advance(1.0);
        assert!(a.frame_index() < 2);
        assert!(!a.animation_ended());
    }

    #[test]
    fn test_zero_duration_does_not_advance() {
        let mut a = Animator::with_initial(table(), "frozen");
        a.advance(1.0);
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn test_is_playing_unfinished() {
        let mut a = Animator::with_initial(table(), "once");
        assert!(a.is_playing_unfinished("once"));
        assert!(!a.is_playing_unfinished("loop"));
        a.advance(1.0);
        assert!(!a.is_playing_unfinished("once"));
    }
}
