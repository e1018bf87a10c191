//! Single-flight gating for debounced rescans.
//!
//! A [`ScanGate`] tracks the busy/waiting/scheduled/enabled flags for one
//! buffer's scan pipeline as an explicit state machine. The gate itself is
//! lock-free; callers mutate it under their own per-buffer lock. The policy
//! it encodes:
//!
//! * at most one scan in flight,
//! * a request during the debounce wait is dropped (the pending scan will
//!   read the latest snapshot anyway),
//! * a request during a running scan sets a single-slot rerun flag instead
//!   of queueing,
//! * a disabled gate refuses everything, permanently.

/// Decision returned by [`ScanGate::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
	/// No scan pending: the caller must start the debounce-then-scan task.
	Start,
	/// A scan is running; it will rerun once after it completes.
	Coalesced,
	/// A scan is already waiting out its debounce; nothing to do.
	Dropped,
	/// The gate is permanently disabled.
	Disabled,
}

/// Per-buffer scan flags as an explicit small state machine.
#[derive(Debug, Clone)]
pub struct ScanGate {
	/// A scan is currently executing.
	busy: bool,
	/// A scan task exists and is waiting out the debounce delay.
	waiting: bool,
	/// A request arrived while busy; rerun once after completion.
	scheduled: bool,
	/// Feature switch; cleared permanently by the performance breaker.
	enabled: bool,
}

impl ScanGate {
	/// Creates an enabled, idle gate.
	pub fn new(enabled: bool) -> Self {
		Self {
			busy: false,
			waiting: false,
			scheduled: false,
			enabled,
		}
	}

	/// Registers a rescan request and returns what the caller must do.
	pub fn request(&mut self) -> GateDecision {
		if !self.enabled {
			return GateDecision::Disabled;
		}
		if self.busy {
			self.scheduled = true;
			return GateDecision::Coalesced;
		}
		if self.waiting {
			return GateDecision::Dropped;
		}
		self.waiting = true;
		GateDecision::Start
	}

	/// Marks the debounce wait over and the scan running.
	pub fn begin(&mut self) {
		debug_assert!(self.waiting && !self.busy, "begin() without a waiting scan");
		self.waiting = false;
		self.busy = true;
	}

	/// Marks the scan finished; returns true when a coalesced rerun must run.
	///
	/// On rerun the gate moves straight back to waiting, so the follow-up
	/// cycle repeats the debounce delay before scanning.
	pub fn finish(&mut self) -> bool {
		debug_assert!(self.busy, "finish() without a running scan");
		self.busy = false;
		let rerun = self.scheduled && self.enabled;
		self.scheduled = false;
		if rerun {
			self.waiting = true;
		}
		rerun
	}

	/// Permanently disables the gate, dropping any queued rerun.
	///
	/// A running scan still has to call [`Self::finish`]; it will not rerun.
	pub fn disable(&mut self) {
		self.enabled = false;
		self.waiting = false;
		self.scheduled = false;
	}

	/// Returns true if the gate accepts requests.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Returns true if a scan is executing.
	pub fn is_busy(&self) -> bool {
		self.busy
	}

	/// Returns true if a scan task is waiting out its debounce.
	pub fn is_waiting(&self) -> bool {
		self.waiting
	}
}

impl Default for ScanGate {
	fn default() -> Self {
		Self::new(true)
	}
}
