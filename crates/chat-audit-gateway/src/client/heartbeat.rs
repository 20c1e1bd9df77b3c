//! Heartbeat timer

use rand::Rng;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Heartbeat schedule and acknowledgement tracking
///
/// The first beat is delayed by a random fraction of the interval so that
/// many clients started together do not beat in lockstep.
#[derive(Debug)]
pub struct Heartbeat {
    period: Duration,
    timer: Interval,
    acked: bool,
}

impl Heartbeat {
    pub fn new(period: Duration) -> Self {
        let jitter = period.mul_f64(rand::thread_rng().gen_range(0.0..1.0));
        Self::with_first_beat(period, jitter)
    }

    /// Schedule with an explicit delay before the first beat
    pub fn with_first_beat(period: Duration, first: Duration) -> Self {
        let mut timer = interval_at(Instant::now() + first, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            period,
            timer,
            acked: true,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next scheduled beat
    pub async fn tick(&mut self) {
        self.timer.tick().await;
    }

    /// Mark a beat as sent
    ///
    /// Returns false when the previous beat was never acknowledged, meaning
    /// the connection is dead.
    pub fn beat(&mut self) -> bool {
        let alive = self.acked;
        self.acked = false;
        alive
    }

    pub fn ack(&mut self) {
        self.acked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ack_tracking() {
        let mut heartbeat = Heartbeat::with_first_beat(Duration::from_secs(40), Duration::ZERO);

        assert!(heartbeat.beat());
        assert!(!heartbeat.beat());

        heartbeat.ack();
        assert!(heartbeat.beat());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_beat_after_delay() {
        let start = Instant::now();
        let mut heartbeat =
            Heartbeat::with_first_beat(Duration::from_secs(40), Duration::from_secs(3));

        heartbeat.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));

        heartbeat.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(43));
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_within_period() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::new(Duration::from_secs(10));
        heartbeat.tick().await;
        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(heartbeat.period(), Duration::from_secs(10));
    }
}
