//! Repeatedly toggle a relay at a fixed period
//!
//! An [`Oscillation`] describes the run, an [`Oscillator`] performs it and can
//! be stopped from another thread.
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, info};

use crate::{
    capabilities::Relay,
    datatypes::RelayState,
    error::{Error, Result},
};

/// Shortest time a relay may spend in one state.
pub const MIN_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Unbounded,
    Timeout(Duration),
    /// Full cycles, a cycle being two toggles
    Cycles(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oscillation {
    pub relay: u32,
    pub period: Duration,
    pub limit: Limit,
    pub start_state: Option<RelayState>,
    pub final_state: Option<RelayState>,
}

impl Oscillation {
    /// Oscillate `relay` until stopped, spending `period` in each state.
    pub fn new(relay: u32, period: Duration) -> Self {
        Self {
            relay,
            period,
            limit: Limit::Unbounded,
            start_state: None,
            final_state: None,
        }
    }

    pub fn for_duration(mut self, timeout: Duration) -> Self {
        self.limit = Limit::Timeout(timeout);
        self
    }

    pub fn cycles(mut self, cycles: u32) -> Self {
        self.limit = Limit::Cycles(cycles);
        self
    }

    pub fn start_state(mut self, state: RelayState) -> Self {
        self.start_state = Some(state);
        self
    }

    pub fn final_state(mut self, state: RelayState) -> Self {
        self.final_state = Some(state);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.period < MIN_PERIOD {
            return Err(Error::InvalidArgument(format!(
                "Invalid period; must be at least {}ms",
                MIN_PERIOD.as_millis()
            )));
        }
        match self.limit {
            Limit::Timeout(timeout) if timeout == Duration::from_secs(0) => Err(
                Error::InvalidArgument(String::from("Invalid timeout; must be positive")),
            ),
            Limit::Cycles(0) => Err(Error::InvalidArgument(String::from(
                "Invalid cycle count; must be positive",
            ))),
            _ => Ok(()),
        }
    }
}

/// Runs oscillations; `stop` is permanent for this oscillator.
#[derive(Debug, Clone, Default)]
pub struct Oscillator {
    stop: Arc<AtomicBool>,
    half_cycles: Arc<AtomicU64>,
}

impl Oscillator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Toggles performed since the start state was reached.
    pub fn half_cycles(&self) -> u64 {
        self.half_cycles.load(Ordering::SeqCst)
    }

    /// Block until the limit is reached or `stop` is called.
    ///
    /// Once stopped, runs return without contacting the device.
    pub fn run<R: Relay>(&self, device: &R, plan: &Oscillation) -> Result<()> {
        plan.validate()?;
        if self.is_stopped() {
            debug!("relay {} oscillator already stopped", plan.relay);
            return Ok(());
        }
        info!(
            "oscillating relay {} every {:?} ({:?})",
            plan.relay, plan.period, plan.limit
        );

        if let Some(start_state) = plan.start_state {
            if device.relay_state(plan.relay)? != start_state {
                device.power(plan.relay, start_state.is_on())?;
                thread::sleep(plan.period);
            }
        }

        self.half_cycles.store(0, Ordering::SeqCst);
        let started = Instant::now();
        while !self.is_stopped() && !self.limit_reached(plan, started) {
            device.toggle(plan.relay)?;
            thread::sleep(plan.period);
            let done = self.half_cycles.fetch_add(1, Ordering::SeqCst) + 1;
            debug!("relay {} toggled, {} half cycles", plan.relay, done);
        }

        if let Some(final_state) = plan.final_state {
            if device.relay_state(plan.relay)? != final_state {
                device.power(plan.relay, final_state.is_on())?;
            }
        }

        info!(
            "relay {} oscillation finished after {} half cycles",
            plan.relay,
            self.half_cycles()
        );
        Ok(())
    }

    /// Run on a background thread.
    pub fn spawn<R>(&self, device: Arc<R>, plan: Oscillation) -> JoinHandle<Result<()>>
    where
        R: Relay + Send + Sync + 'static,
    {
        let oscillator = self.clone();
        thread::spawn(move || oscillator.run(device.as_ref(), &plan))
    }

    fn limit_reached(&self, plan: &Oscillation, started: Instant) -> bool {
        match plan.limit {
            Limit::Unbounded => false,
            Limit::Timeout(timeout) => started.elapsed() >= timeout,
            Limit::Cycles(cycles) => self.half_cycles() >= u64::from(cycles) * 2,
        }
    }
}
