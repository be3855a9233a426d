//! Deterministic replay of recorded touch traces
//!
//! Drives a [`GestureRecognizer`] on the sample clock instead of wall time:
//! timers due at or before a sample's timestamp fire before that sample, and
//! timers still pending after the last sample fire in deadline order.
//!
//! Traces are JSON lines, one [`TouchSample`] per line:
//!
//! ```text
//! {"x": 120.0, "y": 640.0, "t": 0, "phase": "down"}
//! {"x": 121.0, "y": 641.0, "t": 80, "phase": "up"}
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::BufRead;

use tracing::trace;

use crate::error::{Error, Result};
use crate::input::{GestureConfig, GestureEvent, GestureRecognizer, TimerToken, TouchSample};

/// A gesture and the sample-clock time it was recognized at
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TimedGesture {
    pub at_ms: u64,
    pub gesture: GestureEvent,
}

/// Virtual-clock driver around a recognizer
pub struct Replay {
    recognizer: GestureRecognizer,
    /// (deadline, insertion order, token); equal deadlines fire first-armed-first
    timers: BinaryHeap<Reverse<(u64, u64, TimerToken)>>,
    seq: u64,
}

impl Replay {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config),
            timers: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Feed one sample, firing every timer due up to its timestamp first
    pub fn feed(&mut self, sample: TouchSample, out: &mut Vec<TimedGesture>) {
        self.advance_to(sample.timestamp_ms, out);

        let result = self.recognizer.on_sample(sample);
        for gesture in result.events() {
            out.push(TimedGesture { at_ms: sample.timestamp_ms, gesture });
        }
        if let Some(request) = result.timer {
            self.seq += 1;
            self.timers
                .push(Reverse((request.deadline_ms, self.seq, request.token)));
        }
    }

    /// Fire all timers due at or before `now_ms`
    pub fn advance_to(&mut self, now_ms: u64, out: &mut Vec<TimedGesture>) {
        while let Some(&Reverse((deadline_ms, _, token))) = self.timers.peek() {
            if deadline_ms > now_ms {
                break;
            }
            self.timers.pop();
            self.fire(deadline_ms, token, out);
        }
    }

    /// Fire every remaining timer
    pub fn finish(&mut self, out: &mut Vec<TimedGesture>) {
        while let Some(Reverse((deadline_ms, _, token))) = self.timers.pop() {
            self.fire(deadline_ms, token, out);
        }
    }

    fn fire(&mut self, deadline_ms: u64, token: TimerToken, out: &mut Vec<TimedGesture>) {
        trace!(?token, deadline_ms, "replay timer due");
        if let Some(gesture) = self.recognizer.on_timer(token) {
            out.push(TimedGesture { at_ms: deadline_ms, gesture });
        }
    }
}

/// Classify a whole trace on the sample clock
pub fn replay<I>(config: GestureConfig, samples: I) -> Vec<TimedGesture>
where
    I: IntoIterator<Item = TouchSample>,
{
    let mut driver = Replay::new(config);
    let mut out = Vec::new();
    for sample in samples {
        driver.feed(sample, &mut out);
    }
    driver.finish(&mut out);
    out
}

/// Parse a JSON-lines touch trace; blank lines and `#` comments are skipped
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<TouchSample>> {
    let mut samples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sample = serde_json::from_str(line).map_err(|source| Error::Trace {
            line: index + 1,
            source,
        })?;
        samples.push(sample);
    }
    Ok(samples)
}
