//! Event-loop integration for the gesture recognizer
//!
//! Timers requested by the recognizer become `calloop` timer sources on the
//! same loop that delivers touch samples, so recognizer state is only ever
//! touched from one thread. Each timer closure owns a copy of its
//! [`TimerToken`]; nothing is read back from shared flags when it fires.
//!
//! Once the owning view goes away the runtime is detached: later samples are
//! dropped and timers that still fire become no-ops.

use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopHandle};
use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::input::{GestureCallbacks, GestureConfig, GestureRecognizer, TimerRequest, TimerToken, TouchSample};

/// State shared with event loop callbacks
pub struct GestureState<H: 'static> {
    recognizer: GestureRecognizer,
    host: H,
    loop_handle: LoopHandle<'static, GestureState<H>>,
    attached: bool,
    /// Timer sources inserted and not yet fired
    outstanding: usize,
}

impl<H: GestureCallbacks + 'static> GestureState<H> {
    /// Classify one sample and deliver or schedule whatever it produces
    pub fn handle_sample(&mut self, sample: TouchSample) {
        if !self.attached {
            debug!(t = sample.timestamp_ms, "detached, touch sample dropped");
            return;
        }

        let result = self.recognizer.on_sample(sample);
        for event in result.events() {
            event.notify(&mut self.host);
        }
        if let Some(request) = result.timer {
            self.schedule(request);
        }
    }

    fn schedule(&mut self, request: TimerRequest) {
        let token = request.token;
        let timer = Timer::from_duration(Duration::from_millis(request.delay_ms));
        let inserted = self.loop_handle.insert_source(timer, move |_, _, state| {
            state.fire(token);
            TimeoutAction::Drop
        });

        match inserted {
            Ok(_) => {
                self.outstanding += 1;
                trace!(?token, delay_ms = request.delay_ms, "gesture timer scheduled");
            }
            Err(e) => warn!(?token, error = %e.error, "failed to schedule gesture timer"),
        }
    }

    fn fire(&mut self, token: TimerToken) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if !self.attached {
            trace!(?token, "detached, timer ignored");
            return;
        }
        if let Some(event) = self.recognizer.on_timer(token) {
            event.notify(&mut self.host);
        }
    }
}

/// Recognizer bound to its own event loop
pub struct GestureRuntime<H: 'static> {
    event_loop: EventLoop<'static, GestureState<H>>,
    state: GestureState<H>,
}

impl<H: GestureCallbacks + 'static> GestureRuntime<H> {
    pub fn new(config: GestureConfig, host: H) -> Result<Self> {
        let event_loop: EventLoop<GestureState<H>> = EventLoop::try_new()?;
        let loop_handle = event_loop.handle();

        Ok(Self {
            event_loop,
            state: GestureState {
                recognizer: GestureRecognizer::new(config),
                host,
                loop_handle,
                attached: true,
                outstanding: 0,
            },
        })
    }

    pub fn host(&self) -> &H {
        &self.state.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.state.host
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.state.outstanding
    }

    /// Feed a sample right now
    pub fn feed(&mut self, sample: TouchSample) {
        self.state.handle_sample(sample);
    }

    /// Stop delivering gestures; outstanding timers fire as no-ops
    pub fn detach(&mut self) {
        if self.state.attached {
            info!(pending = self.state.outstanding, "gesture runtime detached");
        }
        self.state.attached = false;
    }

    /// Run one event loop iteration
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.event_loop.dispatch(timeout, &mut self.state)?;
        Ok(())
    }

    /// Dispatch until every scheduled timer has fired
    pub fn run_until_idle(&mut self) -> Result<()> {
        while self.state.outstanding > 0 {
            self.dispatch(None)?;
        }
        Ok(())
    }

    /// Replay samples at their recorded pace, then drain all timers
    pub fn play<I>(&mut self, samples: I) -> Result<()>
    where
        I: IntoIterator<Item = TouchSample>,
    {
        let mut start_ms = None;
        for sample in samples {
            let start = *start_ms.get_or_insert(sample.timestamp_ms);
            let offset = Duration::from_millis(sample.timestamp_ms.saturating_sub(start));
            let inserted = self
                .state
                .loop_handle
                .insert_source(Timer::from_duration(offset), move |_, _, state| {
                    state.outstanding = state.outstanding.saturating_sub(1);
                    state.handle_sample(sample);
                    TimeoutAction::Drop
                });

            match inserted {
                Ok(_) => self.state.outstanding += 1,
                Err(e) => warn!(t = sample.timestamp_ms, error = %e.error, "failed to queue touch sample"),
            }
        }

        self.run_until_idle()
    }
}
