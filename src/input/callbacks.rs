//! Host notification surface for recognized gestures
//!
//! A host implements only the slots it cares about; every slot defaults to a
//! no-op.

use super::gestures::GestureEvent;

/// One notification slot per recognized gesture
pub trait GestureCallbacks {
    fn on_single_tap(&mut self) {}
    fn on_double_tap(&mut self) {}
    fn on_triple_tap(&mut self) {}
    fn on_long_press(&mut self) {}
    fn on_swipe_up(&mut self) {}
    fn on_swipe_down(&mut self) {}
    fn on_swipe_left(&mut self) {}
    fn on_swipe_right(&mut self) {}
}

impl GestureEvent {
    /// Deliver this gesture to the matching slot of `host`
    pub fn notify<H: GestureCallbacks + ?Sized>(self, host: &mut H) {
        match self {
            GestureEvent::SingleTap => host.on_single_tap(),
            GestureEvent::DoubleTap => host.on_double_tap(),
            GestureEvent::TripleTap => host.on_triple_tap(),
            GestureEvent::LongPress => host.on_long_press(),
            GestureEvent::SwipeUp => host.on_swipe_up(),
            GestureEvent::SwipeDown => host.on_swipe_down(),
            GestureEvent::SwipeLeft => host.on_swipe_left(),
            GestureEvent::SwipeRight => host.on_swipe_right(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SwipeOnly {
        swipes: Vec<&'static str>,
    }

    impl GestureCallbacks for SwipeOnly {
        fn on_swipe_up(&mut self) {
            self.swipes.push("up");
        }
        fn on_swipe_left(&mut self) {
            self.swipes.push("left");
        }
    }

    #[test]
    fn test_unimplemented_slots_are_noops() {
        let mut host = SwipeOnly::default();
        for event in GestureEvent::ALL {
            event.notify(&mut host);
        }
        assert_eq!(host.swipes, vec!["up", "left"]);
    }
}
