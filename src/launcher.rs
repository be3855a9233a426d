//! Home screen host - routes recognized gestures to their bound actions

use serde::Serialize;
use tracing::warn;

use crate::actions::{Action, ActionBinding, ActionDispatcher, ActionExecutor, DispatchPolicy, Dispatched};
use crate::error::DispatchError;
use crate::input::{GestureCallbacks, GestureEvent};

/// Record of one handled gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub gesture: GestureEvent,
    /// Action that ran, `None` if the gesture is unbound
    pub action: Option<Action>,
    /// Failure reported by the executor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Gesture host for the home screen
pub struct Launcher<E> {
    dispatcher: ActionDispatcher<E>,
    bindings: ActionBinding,
    /// `None` unless outcome recording was requested
    outcomes: Option<Vec<Outcome>>,
}

impl<E: ActionExecutor> Launcher<E> {
    pub fn new(executor: E, bindings: ActionBinding, policy: DispatchPolicy) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(executor, policy),
            bindings,
            outcomes: None,
        }
    }

    /// Keep an [`Outcome`] for every handled gesture until drained
    pub fn record_outcomes(mut self) -> Self {
        self.outcomes = Some(Vec::new());
        self
    }

    pub fn outcomes(&self) -> &[Outcome] {
        self.outcomes.as_deref().unwrap_or_default()
    }

    /// Drain recorded outcomes
    pub fn take_outcomes(&mut self) -> Vec<Outcome> {
        self.outcomes.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Dispatch a gesture and record what happened
    pub fn handle(&mut self, gesture: GestureEvent) -> Result<Dispatched, DispatchError> {
        let result = self.dispatcher.dispatch(gesture, &self.bindings);
        let Some(outcomes) = self.outcomes.as_mut() else {
            return result;
        };
        let outcome = match &result {
            Ok(Dispatched::Executed(action)) => Outcome { gesture, action: Some(*action), error: None },
            Ok(Dispatched::Skipped) => Outcome { gesture, action: None, error: None },
            Err(e) => Outcome {
                gesture,
                action: Some(e.action()),
                error: Some(e.to_string()),
            },
        };
        outcomes.push(outcome);
        result
    }

    fn on_gesture(&mut self, gesture: GestureEvent) {
        if let Err(e) = self.handle(gesture) {
            warn!(error = %e, "gesture action failed");
        }
    }
}

impl<E: ActionExecutor> GestureCallbacks for Launcher<E> {
    fn on_single_tap(&mut self) {
        self.on_gesture(GestureEvent::SingleTap);
    }

    fn on_double_tap(&mut self) {
        self.on_gesture(GestureEvent::DoubleTap);
    }

    fn on_triple_tap(&mut self) {
        self.on_gesture(GestureEvent::TripleTap);
    }

    fn on_long_press(&mut self) {
        self.on_gesture(GestureEvent::LongPress);
    }

    fn on_swipe_up(&mut self) {
        self.on_gesture(GestureEvent::SwipeUp);
    }

    fn on_swipe_down(&mut self) {
        self.on_gesture(GestureEvent::SwipeDown);
    }

    fn on_swipe_left(&mut self) {
        self.on_gesture(GestureEvent::SwipeLeft);
    }

    fn on_swipe_right(&mut self) {
        self.on_gesture(GestureEvent::SwipeRight);
    }
}
