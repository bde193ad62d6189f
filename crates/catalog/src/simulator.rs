//! Latency and failure injection around a `ProductSource`.
//!
//! This is a development/test double: it lets shelf UIs exercise their
//! loading, error and success states without a real backend.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use ivx_core::ContentRef;

use crate::product::Product;
use crate::source::{FetchError, ProductSource};

pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(800);
pub const DEFAULT_FAILURE_RATE: f64 = 0.08;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationConfigError {
    #[error("min delay ({min:?}) exceeds max delay ({max:?})")]
    DelayRange { min: Duration, max: Duration },
    #[error("failure rate must be within [0, 1], got {0}")]
    FailureRate(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Probability in `[0, 1]` that a call fails with `FetchError::Network`.
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            failure_rate: DEFAULT_FAILURE_RATE,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// No delay, no failures.
    pub fn disabled() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            failure_rate: 0.0,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SimulationConfigError> {
        if self.min_delay > self.max_delay {
            return Err(SimulationConfigError::DelayRange {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(SimulationConfigError::FailureRate(self.failure_rate));
        }
        Ok(())
    }

    /// Draw one independent trial.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Trial {
        let delay = if self.min_delay == self.max_delay {
            self.min_delay
        } else {
            rng.gen_range(self.min_delay..=self.max_delay)
        };
        Trial {
            delay,
            fail: rng.gen_bool(self.failure_rate),
        }
    }
}

/// Outcome of one simulated call, decided before the call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub delay: Duration,
    pub fail: bool,
}

/// Wraps a source with randomized delay and failure injection.
///
/// Every call is a single attempt; there is no retry or backoff.
#[derive(Debug)]
pub struct SimulatedSource<S> {
    inner: S,
    config: SimulationConfig,
    rng: Mutex<StdRng>,
}

impl<S> SimulatedSource<S> {
    pub fn new(inner: S, config: SimulationConfig) -> Result<Self, SimulationConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            inner,
            config,
            rng: Mutex::new(rng),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn next_trial(&self) -> Trial {
        // A poisoned RNG is still a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.config.sample(&mut *rng)
    }
}

#[async_trait]
impl<S> ProductSource for SimulatedSource<S>
where
    S: ProductSource,
{
    async fn fetch(&self, target: &ContentRef) -> Result<Vec<Product>, FetchError> {
        let trial = self.next_trial();
        if !trial.delay.is_zero() {
            tokio::time::sleep(trial.delay).await;
        }
        if trial.fail {
            tracing::debug!(content = %target, delay_ms = trial.delay.as_millis() as u64, "injected fetch failure");
            return Err(FetchError::Network);
        }
        self.inner.fetch(target).await
    }
}
