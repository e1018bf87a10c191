//! Scan metrics.
//!
//! Tracks an EMA of full-scan duration plus scan/notification counters for
//! observability. The performance breaker deliberately uses the raw duration
//! of each scan, not the EMA: one pathological scan is enough to disable.

use std::time::Duration;

/// Smoothing factor for Exponential Moving Average.
/// alpha = 2 / (N + 1). For N=9, alpha = 0.2.
const EMA_ALPHA: f64 = 0.2;

#[derive(Debug, Clone, Default)]
struct Ema {
	value: f64,
	initialized: bool,
}

impl Ema {
	fn update(&mut self, next: f64) {
		if self.initialized {
			self.value = EMA_ALPHA * next + (1.0 - EMA_ALPHA) * self.value;
		} else {
			self.value = next;
			self.initialized = true;
		}
	}
}

/// Per-controller scan statistics.
#[derive(Debug, Clone, Default)]
pub struct ScanMetrics {
	duration_ms: Ema,
	scans: u64,
	notifications: u64,
}

impl ScanMetrics {
	/// Records one completed scan.
	pub fn record_scan(&mut self, elapsed: Duration) {
		self.scans += 1;
		self.duration_ms.update(elapsed.as_secs_f64() * 1000.0);
	}

	/// Records one emitted change notification.
	pub fn record_notification(&mut self) {
		self.notifications += 1;
	}

	/// Smoothed scan duration, if any scan completed yet.
	pub fn avg_duration(&self) -> Option<Duration> {
		self.duration_ms
			.initialized
			.then(|| Duration::from_secs_f64(self.duration_ms.value / 1000.0))
	}

	/// Number of completed scans.
	pub fn scans(&self) -> u64 {
		self.scans
	}

	/// Number of emitted change notifications.
	pub fn notifications(&self) -> u64 {
		self.notifications
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_sample_seeds_the_ema() {
		let mut m = ScanMetrics::default();
		assert_eq!(m.avg_duration(), None);
		m.record_scan(Duration::from_millis(10));
		assert_eq!(m.avg_duration(), Some(Duration::from_millis(10)));
		assert_eq!(m.scans(), 1);
	}

	#[test]
	fn ema_moves_toward_new_samples() {
		let mut m = ScanMetrics::default();
		m.record_scan(Duration::from_millis(10));
		m.record_scan(Duration::from_millis(20));
		let avg = m.avg_duration().unwrap();
		assert!(avg > Duration::from_millis(10));
		assert!(avg < Duration::from_millis(20));
	}
}
