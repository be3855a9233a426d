//! Launcher actions and their gesture bindings
//!
//! Each recognized gesture can be bound to one system action. What an action
//! actually does is up to the [`ActionExecutor`] the host plugs in.

mod command;
mod dispatcher;

pub use command::*;
pub use dispatcher::*;

use serde::{Deserialize, Serialize};

use crate::error::ActionFailure;
use crate::input::GestureEvent;

/// System action a gesture can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Gesture does nothing
    #[default]
    Disabled,
    /// Open the app drawer
    ShowAppList,
    ShowFavoriteList,
    ShowWidgets,
    LockScreen,
    /// Expand the notification shade
    ShowNotification,
    OpenQuickSettings,
    ShowRecents,
    OpenPowerDialog,
    TakeScreenShot,
    /// Open launcher settings (optionally behind authentication)
    OpenSettings,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Disabled,
        Action::ShowAppList,
        Action::ShowFavoriteList,
        Action::ShowWidgets,
        Action::LockScreen,
        Action::ShowNotification,
        Action::OpenQuickSettings,
        Action::ShowRecents,
        Action::OpenPowerDialog,
        Action::TakeScreenShot,
        Action::OpenSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Disabled => "disabled",
            Action::ShowAppList => "show_app_list",
            Action::ShowFavoriteList => "show_favorite_list",
            Action::ShowWidgets => "show_widgets",
            Action::LockScreen => "lock_screen",
            Action::ShowNotification => "show_notification",
            Action::OpenQuickSettings => "open_quick_settings",
            Action::ShowRecents => "show_recents",
            Action::OpenPowerDialog => "open_power_dialog",
            Action::TakeScreenShot => "take_screen_shot",
            Action::OpenSettings => "open_settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Gesture to action table
///
/// Gestures left out of a config table are disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActionBinding {
    #[serde(default)]
    pub single_tap: Action,
    #[serde(default)]
    pub double_tap: Action,
    #[serde(default)]
    pub triple_tap: Action,
    #[serde(default)]
    pub long_press: Action,
    #[serde(default)]
    pub swipe_up: Action,
    #[serde(default)]
    pub swipe_down: Action,
    #[serde(default)]
    pub swipe_left: Action,
    #[serde(default)]
    pub swipe_right: Action,
}

impl ActionBinding {
    /// Bindings used when no config file exists
    pub fn launcher_defaults() -> Self {
        Self {
            double_tap: Action::LockScreen,
            long_press: Action::OpenSettings,
            swipe_up: Action::ShowAppList,
            swipe_down: Action::ShowNotification,
            ..Self::default()
        }
    }

    pub fn action_for(&self, event: GestureEvent) -> Action {
        match event {
            GestureEvent::SingleTap => self.single_tap,
            GestureEvent::DoubleTap => self.double_tap,
            GestureEvent::TripleTap => self.triple_tap,
            GestureEvent::LongPress => self.long_press,
            GestureEvent::SwipeUp => self.swipe_up,
            GestureEvent::SwipeDown => self.swipe_down,
            GestureEvent::SwipeLeft => self.swipe_left,
            GestureEvent::SwipeRight => self.swipe_right,
        }
    }

    /// Bound action, or `None` when the gesture is disabled
    pub fn lookup(&self, event: GestureEvent) -> Option<Action> {
        Some(self.action_for(event)).filter(|a| *a != Action::Disabled)
    }

    pub fn bind(&mut self, event: GestureEvent, action: Action) {
        let slot = match event {
            GestureEvent::SingleTap => &mut self.single_tap,
            GestureEvent::DoubleTap => &mut self.double_tap,
            GestureEvent::TripleTap => &mut self.triple_tap,
            GestureEvent::LongPress => &mut self.long_press,
            GestureEvent::SwipeUp => &mut self.swipe_up,
            GestureEvent::SwipeDown => &mut self.swipe_down,
            GestureEvent::SwipeLeft => &mut self.swipe_left,
            GestureEvent::SwipeRight => &mut self.swipe_right,
        };
        *slot = action;
    }
}

/// How the dispatcher decorates requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DispatchPolicy {
    /// Opening settings requires authentication
    pub settings_lock: bool,
}

/// One action invocation handed to the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    /// Gesture that triggered the action
    pub gesture: GestureEvent,
    /// Executor must authenticate the user before acting
    pub authenticate: bool,
}

/// External collaborator that carries out actions
pub trait ActionExecutor {
    fn execute(&mut self, request: &ActionRequest) -> Result<(), ActionFailure>;
}

impl<F> ActionExecutor for F
where
    F: FnMut(&ActionRequest) -> Result<(), ActionFailure>,
{
    fn execute(&mut self, request: &ActionRequest) -> Result<(), ActionFailure> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("open_app"), None);
    }

    #[test]
    fn test_disabled_binding_has_no_action() {
        let mut bindings = ActionBinding::launcher_defaults();
        assert_eq!(bindings.lookup(GestureEvent::SwipeUp), Some(Action::ShowAppList));
        assert_eq!(bindings.lookup(GestureEvent::TripleTap), None);

        bindings.bind(GestureEvent::SwipeUp, Action::Disabled);
        assert_eq!(bindings.lookup(GestureEvent::SwipeUp), None);
        assert_eq!(bindings.action_for(GestureEvent::SwipeUp), Action::Disabled);
    }

    #[test]
    fn test_partial_table_disables_missing_gestures() {
        let bindings: ActionBinding = toml::from_str(r#"swipe_left = "show_widgets""#).unwrap();
        assert_eq!(bindings.lookup(GestureEvent::SwipeLeft), Some(Action::ShowWidgets));
        for event in GestureEvent::ALL {
            if event != GestureEvent::SwipeLeft {
                assert_eq!(bindings.lookup(event), None);
            }
        }
    }
}
