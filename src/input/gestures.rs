//! Gesture recognition for single-contact launcher gestures
//!
//! Recognizes:
//! - Single, double and triple tap (debounced through timers)
//! - Long press
//! - Swipes up, down, left and right
//!
//! The recognizer never reads a clock. Every delayed decision is handed to the
//! host as a [`TimerRequest`]; when the host's timer elapses it passes the
//! request's [`TimerToken`] back to [`GestureRecognizer::on_timer`]. Tokens
//! carry a generation, so a timer that outlived the state it was armed for is
//! simply ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::touch::{TouchPhase, TouchSample};

/// Direction of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureEvent {
    SingleTap,
    DoubleTap,
    TripleTap,
    LongPress,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
}

impl GestureEvent {
    pub const ALL: [GestureEvent; 8] = [
        GestureEvent::SingleTap,
        GestureEvent::DoubleTap,
        GestureEvent::TripleTap,
        GestureEvent::LongPress,
        GestureEvent::SwipeUp,
        GestureEvent::SwipeDown,
        GestureEvent::SwipeLeft,
        GestureEvent::SwipeRight,
    ];

    pub fn swipe(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Up => GestureEvent::SwipeUp,
            SwipeDirection::Down => GestureEvent::SwipeDown,
            SwipeDirection::Left => GestureEvent::SwipeLeft,
            SwipeDirection::Right => GestureEvent::SwipeRight,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureEvent::SingleTap => "single_tap",
            GestureEvent::DoubleTap => "double_tap",
            GestureEvent::TripleTap => "triple_tap",
            GestureEvent::LongPress => "long_press",
            GestureEvent::SwipeUp => "swipe_up",
            GestureEvent::SwipeDown => "swipe_down",
            GestureEvent::SwipeLeft => "swipe_left",
            GestureEvent::SwipeRight => "swipe_right",
        }
    }
}

impl std::fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for gesture recognition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Displacement along the dominant axis a swipe must exceed (px)
    pub swipe_distance: f64,

    /// Speed along the dominant axis a swipe must exceed (px/s)
    pub swipe_velocity: f64,

    /// Time allowed for a follow-up tap, counted from the previous tap's down (ms)
    pub double_tap_window_ms: u64,

    /// Time a contact must stay still before a long press fires (ms)
    pub long_press_delay_ms: u64,

    /// Drift from the down position still treated as stationary (px)
    pub jitter_tolerance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_distance: 100.0,
            swipe_velocity: 100.0,
            double_tap_window_ms: 300,
            long_press_delay_ms: 500,
            jitter_tolerance: 16.0,
        }
    }
}

/// Which pending decision a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Double-tap window after a first tap; resolves to a single tap
    MultiTap,
    /// Window after a double tap waiting for a third tap; resolves to a double tap
    TripleTap,
    /// Long-press delay after a down
    LongPress,
}

/// Snapshot identifying the state a timer was armed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

/// Request for the host to call [`GestureRecognizer::on_timer`] later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    /// Delay from the sample that armed the timer
    pub delay_ms: u64,
    /// Sample-clock time at which the timer is due
    pub deadline_ms: u64,
}

impl TimerRequest {
    fn new(kind: TimerKind, generation: u64, now_ms: u64, deadline_ms: u64) -> Self {
        Self {
            token: TimerToken { kind, generation },
            delay_ms: deadline_ms.saturating_sub(now_ms),
            deadline_ms,
        }
    }
}

/// Outcome of feeding one sample to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    /// Multi-tap window whose deadline passed before this sample; delivered
    /// ahead of `event`
    pub overdue: Option<GestureEvent>,
    /// Gesture recognized immediately
    pub event: Option<GestureEvent>,
    /// Timer the host must schedule
    pub timer: Option<TimerRequest>,
}

impl Classification {
    fn none() -> Self {
        Self::default()
    }

    fn emit(event: GestureEvent) -> Self {
        Self { event: Some(event), ..Self::default() }
    }

    /// Gestures to deliver, in order
    pub fn events(&self) -> impl Iterator<Item = GestureEvent> {
        self.overdue.into_iter().chain(self.event)
    }
}

/// The contact currently on screen
#[derive(Debug, Clone)]
struct Contact {
    origin_x: f64,
    origin_y: f64,
    down_ms: u64,
    /// A long press was delivered; the release must stay silent
    consumed: bool,
}

/// Long-press arming for the current contact
#[derive(Debug, Clone)]
pub struct PendingLongPress {
    pub active: bool,
    pub armed_at_ms: u64,
    pub origin_x: f64,
    pub origin_y: f64,
    generation: u64,
}

/// Multi-tap window waiting for another tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTap {
    /// One tap seen; the window runs from its down
    AwaitingSecond { anchor_ms: u64, deadline_ms: u64, generation: u64 },
    /// Two taps seen; the window runs from the second tap's down
    AwaitingThird { anchor_ms: u64, deadline_ms: u64, generation: u64 },
}

impl PendingTap {
    fn deadline_ms(&self) -> u64 {
        match *self {
            PendingTap::AwaitingSecond { deadline_ms, .. } => deadline_ms,
            PendingTap::AwaitingThird { deadline_ms, .. } => deadline_ms,
        }
    }

    /// Gesture this window resolves to when no further tap arrives
    fn resolution(&self) -> GestureEvent {
        match self {
            PendingTap::AwaitingSecond { .. } => GestureEvent::SingleTap,
            PendingTap::AwaitingThird { .. } => GestureEvent::DoubleTap,
        }
    }
}

/// Single-contact gesture recognizer
pub struct GestureRecognizer {
    config: GestureConfig,
    contact: Option<Contact>,
    long_press: Option<PendingLongPress>,
    pending_tap: Option<PendingTap>,
    generation: u64,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            contact: None,
            long_press: None,
            pending_tap: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Check if a contact is currently down
    pub fn has_active_contact(&self) -> bool {
        self.contact.is_some()
    }

    pub fn pending_tap(&self) -> Option<PendingTap> {
        self.pending_tap
    }

    pub fn pending_long_press(&self) -> Option<&PendingLongPress> {
        self.long_press.as_ref()
    }

    /// Feed one raw sample
    pub fn on_sample(&mut self, sample: TouchSample) -> Classification {
        let overdue = self.flush_overdue(sample.timestamp_ms);
        let mut result = match sample.phase {
            TouchPhase::Down => self.touch_down(sample),
            TouchPhase::Move => self.touch_motion(sample),
            TouchPhase::Up => self.touch_up(sample),
            TouchPhase::Cancel => self.touch_cancel(sample),
        };
        result.overdue = overdue;
        if result.overdue.is_some() || result.event.is_some() || result.timer.is_some() {
            debug!(
                phase = ?sample.phase,
                t = sample.timestamp_ms,
                overdue = ?result.overdue,
                event = ?result.event,
                timer = ?result.timer.map(|t| t.token.kind),
                "classified touch sample"
            );
        }
        result
    }

    /// Handle an elapsed timer
    pub fn on_timer(&mut self, token: TimerToken) -> Option<GestureEvent> {
        let event = match token.kind {
            TimerKind::LongPress => {
                let live = self.contact.is_some()
                    && matches!(&self.long_press,
                        Some(lp) if lp.active && lp.generation == token.generation);
                if live {
                    self.long_press = None;
                    if let Some(contact) = self.contact.as_mut() {
                        contact.consumed = true;
                    }
                    Some(GestureEvent::LongPress)
                } else {
                    None
                }
            }
            TimerKind::MultiTap => match self.pending_tap {
                Some(PendingTap::AwaitingSecond { generation, .. })
                    if generation == token.generation =>
                {
                    self.pending_tap = None;
                    Some(GestureEvent::SingleTap)
                }
                _ => None,
            },
            TimerKind::TripleTap => match self.pending_tap {
                Some(PendingTap::AwaitingThird { generation, .. })
                    if generation == token.generation =>
                {
                    self.pending_tap = None;
                    Some(GestureEvent::DoubleTap)
                }
                _ => None,
            },
        };

        match event {
            Some(event) => debug!(?token, %event, "timer resolved gesture"),
            None => trace!(?token, "stale timer ignored"),
        }
        event
    }

    fn touch_down(&mut self, sample: TouchSample) -> Classification {
        if self.contact.is_some() {
            warn!(t = sample.timestamp_ms, "down while a contact is active, restarting sequence");
        }

        self.contact = Some(Contact {
            origin_x: sample.x,
            origin_y: sample.y,
            down_ms: sample.timestamp_ms,
            consumed: false,
        });

        let generation = self.next_generation();
        self.long_press = Some(PendingLongPress {
            active: true,
            armed_at_ms: sample.timestamp_ms,
            origin_x: sample.x,
            origin_y: sample.y,
            generation,
        });

        Classification {
            timer: Some(TimerRequest::new(
                TimerKind::LongPress,
                generation,
                sample.timestamp_ms,
                sample.timestamp_ms.saturating_add(self.config.long_press_delay_ms),
            )),
            ..Classification::none()
        }
    }

    fn touch_motion(&mut self, sample: TouchSample) -> Classification {
        if self.contact.is_none() {
            debug!(t = sample.timestamp_ms, "move without down ignored");
            return Classification::none();
        }

        let jitter = self.config.jitter_tolerance;
        if let Some(lp) = self.long_press.as_mut().filter(|lp| lp.active) {
            let dx = sample.x - lp.origin_x;
            let dy = sample.y - lp.origin_y;
            if (dx * dx + dy * dy).sqrt() > jitter {
                lp.active = false;
                debug!(t = sample.timestamp_ms, "contact moved, long press disarmed");
            }
        }

        Classification::none()
    }

    fn touch_up(&mut self, sample: TouchSample) -> Classification {
        let Some(contact) = self.contact.take() else {
            warn!(t = sample.timestamp_ms, "up without down ignored");
            return Classification::none();
        };
        self.long_press = None;

        if contact.consumed {
            debug!(t = sample.timestamp_ms, "release after long press ignored");
            return Classification::none();
        }

        let dx = sample.x - contact.origin_x;
        let dy = sample.y - contact.origin_y;
        let dt_ms = sample.timestamp_ms.saturating_sub(contact.down_ms);

        if let Some(direction) = self.classify_swipe(dx, dy, dt_ms) {
            return Classification::emit(GestureEvent::swipe(direction));
        }

        self.register_tap(contact.down_ms, sample.timestamp_ms)
    }

    fn touch_cancel(&mut self, sample: TouchSample) -> Classification {
        if self.contact.take().is_none() {
            debug!(t = sample.timestamp_ms, "cancel without down ignored");
        }
        self.long_press = None;
        Classification::none()
    }

    /// Swipe direction if the displacement is both far and fast enough
    fn classify_swipe(&self, dx: f64, dy: f64, dt_ms: u64) -> Option<SwipeDirection> {
        let horizontal = dx.abs() >= dy.abs();
        let distance = if horizontal { dx.abs() } else { dy.abs() };
        let velocity = distance / (dt_ms.max(1) as f64 / 1000.0);

        if distance <= self.config.swipe_distance || velocity <= self.config.swipe_velocity {
            return None;
        }

        Some(match (horizontal, dx > 0.0, dy < 0.0) {
            (true, true, _) => SwipeDirection::Right,
            (true, false, _) => SwipeDirection::Left,
            (false, _, true) => SwipeDirection::Up,
            (false, _, false) => SwipeDirection::Down,
        })
    }

    fn register_tap(&mut self, down_ms: u64, up_ms: u64) -> Classification {
        let window = self.config.double_tap_window_ms;

        match self.pending_tap {
            Some(PendingTap::AwaitingSecond { anchor_ms, .. })
                if up_ms.saturating_sub(anchor_ms) < window =>
            {
                let generation = self.next_generation();
                let deadline_ms = down_ms.saturating_add(window);
                self.pending_tap = Some(PendingTap::AwaitingThird {
                    anchor_ms: down_ms,
                    deadline_ms,
                    generation,
                });
                Classification {
                    timer: Some(TimerRequest::new(TimerKind::TripleTap, generation, up_ms, deadline_ms)),
                    ..Classification::none()
                }
            }
            Some(PendingTap::AwaitingThird { anchor_ms, .. })
                if up_ms.saturating_sub(anchor_ms) < window =>
            {
                self.pending_tap = None;
                Classification::emit(GestureEvent::TripleTap)
            }
            _ => {
                // Any window this release missed was flushed in on_sample
                let generation = self.next_generation();
                let deadline_ms = down_ms.saturating_add(window);
                self.pending_tap = Some(PendingTap::AwaitingSecond {
                    anchor_ms: down_ms,
                    deadline_ms,
                    generation,
                });
                Classification {
                    timer: Some(TimerRequest::new(TimerKind::MultiTap, generation, up_ms, deadline_ms)),
                    ..Classification::none()
                }
            }
        }
    }

    /// Resolve a pending multi-tap window whose deadline has passed
    fn flush_overdue(&mut self, now_ms: u64) -> Option<GestureEvent> {
        let pending = self.pending_tap.filter(|p| p.deadline_ms() <= now_ms)?;
        self.pending_tap = None;
        let event = pending.resolution();
        debug!(now_ms, %event, "multi-tap window overdue, resolved early");
        Some(event)
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
