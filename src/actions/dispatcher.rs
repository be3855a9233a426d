//! Gesture to action dispatch

use tracing::{debug, info, warn};

use super::{Action, ActionBinding, ActionExecutor, ActionRequest, DispatchPolicy};
use crate::error::DispatchError;
use crate::input::GestureEvent;

/// What a dispatch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Gesture is not bound to anything
    Skipped,
    /// Executor ran the action
    Executed(Action),
}

/// Looks up the bound action and hands it to the executor
pub struct ActionDispatcher<E> {
    executor: E,
    policy: DispatchPolicy,
}

impl<E: ActionExecutor> ActionDispatcher<E> {
    pub fn new(executor: E, policy: DispatchPolicy) -> Self {
        Self { executor, policy }
    }

    /// Run the action bound to `event`, if any
    ///
    /// The executor is called at most once. Its failure is returned as is,
    /// tagged with the action that failed.
    pub fn dispatch(
        &mut self,
        event: GestureEvent,
        bindings: &ActionBinding,
    ) -> Result<Dispatched, DispatchError> {
        let Some(action) = bindings.lookup(event) else {
            debug!(gesture = %event, "no action bound");
            return Ok(Dispatched::Skipped);
        };

        let request = ActionRequest {
            action,
            gesture: event,
            authenticate: action == Action::OpenSettings && self.policy.settings_lock,
        };

        match self.executor.execute(&request) {
            Ok(()) => {
                info!(gesture = %event, %action, "action executed");
                Ok(Dispatched::Executed(action))
            }
            Err(source) => {
                warn!(gesture = %event, %action, error = %source, "action failed");
                Err(DispatchError::ActionFailed { action, gesture: event, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionFailure;

    fn recording() -> impl FnMut(&ActionRequest) -> Result<(), ActionFailure> {
        let mut seen = Vec::new();
        move |request: &ActionRequest| {
            seen.push(*request);
            Ok(())
        }
    }

    #[test]
    fn test_disabled_binding_never_reaches_executor() {
        let mut calls = 0;
        let mut dispatcher = ActionDispatcher::new(
            |_: &ActionRequest| -> Result<(), ActionFailure> {
                calls += 1;
                Ok(())
            },
            DispatchPolicy::default(),
        );
        let bindings = ActionBinding::default();
        for event in GestureEvent::ALL {
            assert_eq!(dispatcher.dispatch(event, &bindings).unwrap(), Dispatched::Skipped);
        }
        drop(dispatcher);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_bound_action_executes_once() {
        let mut requests = Vec::new();
        let mut dispatcher = ActionDispatcher::new(
            |r: &ActionRequest| -> Result<(), ActionFailure> {
                requests.push(*r);
                Ok(())
            },
            DispatchPolicy::default(),
        );
        let bindings = ActionBinding::launcher_defaults();
        let outcome = dispatcher.dispatch(GestureEvent::SwipeUp, &bindings).unwrap();
        assert_eq!(outcome, Dispatched::Executed(Action::ShowAppList));
        drop(dispatcher);

        assert_eq!(
            requests,
            vec![ActionRequest {
                action: Action::ShowAppList,
                gesture: GestureEvent::SwipeUp,
                authenticate: false,
            }]
        );
    }

    #[test]
    fn test_settings_lock_requests_authentication() {
        let mut requests = Vec::new();
        let mut dispatcher = ActionDispatcher::new(
            |r: &ActionRequest| -> Result<(), ActionFailure> {
                requests.push(*r);
                Ok(())
            },
            DispatchPolicy { settings_lock: true },
        );
        let mut bindings = ActionBinding::launcher_defaults();
        bindings.bind(GestureEvent::SwipeRight, Action::ShowRecents);

        dispatcher.dispatch(GestureEvent::LongPress, &bindings).unwrap();
        dispatcher.dispatch(GestureEvent::SwipeRight, &bindings).unwrap();
        drop(dispatcher);

        assert!(requests[0].authenticate);
        assert_eq!(requests[0].action, Action::OpenSettings);
        assert!(!requests[1].authenticate);
    }

    #[test]
    fn test_failure_names_the_action() {
        let mut dispatcher = ActionDispatcher::new(
            |_: &ActionRequest| -> Result<(), ActionFailure> {
                Err(ActionFailure::PermissionDenied("accessibility service off".into()))
            },
            DispatchPolicy::default(),
        );
        let bindings = ActionBinding::launcher_defaults();

        let err = dispatcher.dispatch(GestureEvent::DoubleTap, &bindings).unwrap_err();
        assert_eq!(err.action(), Action::LockScreen);
        assert!(matches!(
            err,
            DispatchError::ActionFailed {
                gesture: GestureEvent::DoubleTap,
                source: ActionFailure::PermissionDenied(_),
                ..
            }
        ));
    }

    #[test]
    fn test_dispatcher_holds_no_state_between_calls() {
        let mut dispatcher = ActionDispatcher::new(recording(), DispatchPolicy::default());
        let bindings = ActionBinding::launcher_defaults();
        let first = dispatcher.dispatch(GestureEvent::SwipeDown, &bindings).unwrap();
        let second = dispatcher.dispatch(GestureEvent::SwipeDown, &bindings).unwrap();
        assert_eq!(first, second);
    }
}
