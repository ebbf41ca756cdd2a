use crate::config::BitrateMode;
use crate::stats::MetricsCalculator;
use crate::transport::MediaTransport;
use anyhow::Result;
use opticlink_core::{ConnectionState, MetricsSnapshot};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Periodic metrics sampling, driven from the orchestrator loop.
///
/// The sampler owns no task: the loop awaits [`tick`](Self::tick) next to
/// its other event sources and calls [`sample`](Self::sample) when it fires.
/// Once stopped, `tick` never resolves, so no snapshot can follow a stop.
pub struct StatsSampler {
    period: Duration,
    ticker: Option<Interval>,
    calculator: MetricsCalculator,
}

impl StatsSampler {
    pub fn new(period: Duration, mode: BitrateMode) -> Self {
        Self {
            period,
            ticker: None,
            calculator: MetricsCalculator::new(mode),
        }
    }

    /// First tick fires one period from now.
    pub fn start(&mut self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.calculator.reset();
    }

    pub fn stop(&mut self) {
        self.ticker = None;
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Waits for the next tick; pending forever while stopped.
    pub async fn tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    pub async fn sample(&mut self, transport: &dyn MediaTransport) -> Result<MetricsSnapshot> {
        let stats = transport.stats().await?;
        Ok(self.calculator.compute(&stats, ConnectionState::Live))
    }
}
