//! Launcher gestures - touch gesture recognition and action dispatch for a
//! home screen launcher
//!
//! ```text
//!  touch samples ──► GestureRecognizer ──► GestureEvent ──► ActionDispatcher ──► ActionExecutor
//!                        ▲        │
//!                        └─timer──┘  (calloop runtime or replay clock)
//! ```
//!
//! The recognizer knows nothing about actions, and the dispatcher knows
//! nothing about touch samples.

pub mod actions;
pub mod config;
pub mod error;
pub mod input;
pub mod launcher;
pub mod replay;
pub mod runtime;

pub use actions::{Action, ActionBinding, ActionDispatcher, ActionExecutor, ActionRequest, Dispatched};
pub use config::LauncherConfig;
pub use error::{ActionFailure, DispatchError, Error, Result};
pub use input::{GestureCallbacks, GestureConfig, GestureEvent, GestureRecognizer, TouchPhase, TouchSample};
pub use launcher::Launcher;
pub use runtime::GestureRuntime;
