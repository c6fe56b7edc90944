/// Horizontal travel, in pixels, a leftward swipe must exceed to count.
pub const SWIPE_THRESHOLD_PX: i32 = 70;

struct Touch<K> {
    target: K,
    start_x: i32,
    last_x: i32,
}

/// Tracks one touch at a time and reports leftward swipes on a target row.
pub struct SwipeTracker<K> {
    threshold_px: i32,
    touch: Option<Touch<K>>,
}

impl<K> SwipeTracker<K> {
    pub fn new(threshold_px: i32) -> Self {
        Self {
            threshold_px,
            touch: None,
        }
    }

    pub fn touch_start(&mut self, target: K, x: i32) {
        self.touch = Some(Touch {
            target,
            start_x: x,
            last_x: x,
        });
    }

    pub fn touch_move(&mut self, x: i32) {
        if let Some(touch) = self.touch.as_mut() {
            touch.last_x = x;
        }
    }

    /// Ends the touch. Returns the target if it was swiped left far enough.
    pub fn touch_end(&mut self) -> Option<K> {
        let touch = self.touch.take()?;
        let delta = touch.start_x - touch.last_x;
        if delta > self.threshold_px {
            Some(touch.target)
        } else {
            None
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.touch.is_some()
    }
}

impl<K> Default for SwipeTracker<K> {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_past_threshold() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start("row", 200);
        tracker.touch_move(150);
        tracker.touch_move(100);
        assert_eq!(tracker.touch_end(), Some("row"));
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_short_swipe_ignored() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start("row", 200);
        tracker.touch_move(150);
        assert_eq!(tracker.touch_end(), None);
    }

    #[test]
    fn test_exact_threshold_is_not_enough() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start("row", 170);
        tracker.touch_move(100);
        assert_eq!(tracker.touch_end(), None);
    }

    #[test]
    fn test_right_swipe_and_tap_ignored() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start("row", 100);
        tracker.touch_move(300);
        assert_eq!(tracker.touch_end(), None);

        // A previous gesture's end point must not leak into a tap.
        tracker.touch_start("row", 200);
        tracker.touch_move(10);
        tracker.touch_start("other", 200);
        assert_eq!(tracker.touch_end(), None);
    }

    #[test]
    fn test_end_without_start() {
        let mut tracker: SwipeTracker<u32> = SwipeTracker::new(5);
        tracker.touch_move(0);
        assert_eq!(tracker.touch_end(), None);
    }
}
