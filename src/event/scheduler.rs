//! Stochastic event: one scripted activity fired at exponential or fixed
//! intervals against a running simulation.
//!
//! The event never advances the simulation clock; it only observes it.
//! When the clock has moved past the pending trigger time, `step` drains
//! every due trigger in one call, with the simulation's dynamics
//! suspended for the whole burst rather than toggled per trigger.

use std::io;

use super::params::ParamSource;
use super::rng::EventRng;

/// Construction-time configuration failure. Negative intervals are
/// rejected outright, never clamped.
#[derive(Debug)]
#[non_exhaustive]
pub enum EventConfigError {
    NegativeRate { rate: f64 },
    NegativeDelay { delay: f64 },
}

impl std::fmt::Display for EventConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeRate { rate } => write!(f, "negative event rate: {rate}"),
            Self::NegativeDelay { delay } => write!(f, "negative event delay: {delay}"),
        }
    }
}

impl std::error::Error for EventConfigError {}

/// Activity evaluation failure, surfaced out of [`Event::step`].
#[derive(Debug)]
pub struct EvalError {
    detail: String,
}

impl EvalError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "activity evaluation failed: {}", self.detail)
    }
}

impl std::error::Error for EvalError {}

/// The simulation as the scheduler sees it: a clock, a dynamics switch,
/// and a scripting entry point.
pub trait Simulation {
    /// Current simulation time.
    fn time(&self) -> f64;

    /// Suspend dynamical updates while scripted activity runs.
    fn relax(&mut self);

    /// Resume dynamical updates.
    fn unrelax(&mut self);

    /// Execute one scripted activity against the simulation state.
    fn evaluate(&mut self, activity: &str) -> Result<(), EvalError>;
}

/// One scheduled activity with its pending trigger time.
///
/// With `rate > 0`, inter-trigger gaps are exponential with that rate (a
/// Poisson process); otherwise gaps are the fixed `delay`. Gaps compose
/// from the previous due time, not from the observed clock, so a late
/// `step` fires every trigger the clock has passed.
#[derive(Clone, Debug)]
pub struct Event {
    activity: String,
    rate: f64,
    delay: f64,
    next_time: f64,
    rng: EventRng,
}

impl Event {
    /// Build an event and draw its first trigger time from `now`.
    pub fn new(
        now: f64,
        activity: impl Into<String>,
        rate: f64,
        delay: f64,
        seed: u64,
    ) -> Result<Self, EventConfigError> {
        if rate < 0.0 {
            return Err(EventConfigError::NegativeRate { rate });
        }
        if delay < 0.0 {
            return Err(EventConfigError::NegativeDelay { delay });
        }
        let mut event = Self {
            activity: activity.into(),
            rate,
            delay,
            next_time: 0.0,
            rng: EventRng::new(seed),
        };
        event.reschedule(now);
        Ok(event)
    }

    /// Build an event from a parameter source.
    ///
    /// The activity comes from `activity`, falling back to `code`. The
    /// interval comes from `rate`; `delay` is consulted only when no rate
    /// key binds.
    pub fn with_params<P: ParamSource>(
        now: f64,
        params: &P,
        seed: u64,
    ) -> Result<Self, EventConfigError> {
        let mut activity = String::new();
        if !params.set_str(&mut activity, "activity") {
            params.set_str(&mut activity, "code");
        }
        let mut rate = 0.0;
        let mut delay = 0.0;
        if !params.set_f64(&mut rate, "rate") {
            params.set_f64(&mut delay, "delay");
        }
        Self::new(now, activity, rate, delay, seed)
    }

    /// Absolute simulation time of the pending trigger.
    #[inline(always)]
    #[must_use]
    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    #[inline(always)]
    #[must_use]
    pub fn activity(&self) -> &str {
        &self.activity
    }

    #[inline(always)]
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline(always)]
    #[must_use]
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Draw the next trigger time, measured from `now`.
    pub fn reschedule(&mut self, now: f64) {
        if self.rate > 0.0 {
            self.next_time = now + self.rng.exp_sample(self.rate);
        } else {
            self.next_time = now + self.delay;
        }
    }

    /// Fire every trigger the simulation clock has passed.
    ///
    /// A no-op while `sim.time() <= next_time` (strictly past, not at, the
    /// due time). Otherwise dynamics are suspended, the activity is
    /// evaluated once per elapsed trigger, and dynamics resume. An
    /// evaluation error propagates immediately and leaves the simulation
    /// relaxed; recovery is the caller's.
    ///
    /// Nothing bounds the burst except the clock: a configuration whose
    /// activity never advances time past effectively zero gaps is the
    /// caller's responsibility.
    pub fn step<S: Simulation>(&mut self, sim: &mut S) -> Result<(), EvalError> {
        if sim.time() > self.next_time {
            sim.relax();
            loop {
                self.reschedule(self.next_time);
                sim.evaluate(&self.activity)?;
                if sim.time() <= self.next_time {
                    break;
                }
            }
            sim.unrelax();
        }
        Ok(())
    }

    /// Checkpoint hook. Scheduling state is not persisted; a restored
    /// event draws a fresh first gap at construction.
    // TODO: persist next_time so a restore does not resample the pending gap.
    pub fn write_state<W: io::Write>(&self, _out: &mut W) -> io::Result<()> {
        Ok(())
    }

    /// Restore hook, the counterpart of [`Event::write_state`].
    pub fn read_state<R: io::Read>(&mut self, _input: &mut R) -> io::Result<()> {
        Ok(())
    }
}
