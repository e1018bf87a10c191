//! Per-buffer folding controller.
//!
//! Owns everything scan-related for one buffer: the latest snapshot the host
//! delivered, the last committed region set, the scan gate, metrics, and the
//! debounced background scan task.
//!
//! # Scheduling
//!
//! A change notification only flips gate flags and (at most) spawns one scan
//! task; it never scans inline. The scan task sleeps out the debounce
//! interval (the only intentional suspension point), then captures the
//! snapshot under the buffer lock, scans outside it, and re-acquires it to
//! diff and install. Requests arriving during the debounce are dropped (the
//! pending scan reads the latest snapshot anyway); requests arriving during
//! a running scan coalesce into a single follow-up cycle.
//!
//! # Performance breaker
//!
//! A scan whose wall-clock duration exceeds the configured threshold
//! permanently disables folding for the buffer: regions are cleared, one
//! [`FoldEvent::Disabled`] is emitted, and every later request is refused.

use std::sync::Arc;
use std::time::{Duration, Instant};

use asmfold_primitives::{ChangeSet, CharSpan, line_char_span, line_text};
use asmfold_worker::{GateDecision, GenerationClock, GenerationToken, ScanGate, TaskClass, spawn};
use parking_lot::Mutex;
use ropey::Rope;
use tokio::sync::broadcast;

use crate::classify::TokenClassifier;
use crate::config::FoldConfig;
use crate::detect::BoundaryDetector;
use crate::diff::{diff_region_sets, full_extent};
use crate::error::Result;
use crate::metrics::ScanMetrics;
use crate::region::{Region, RegionKind, RegionSet};
use crate::scan::scan_snapshot;

/// Capacity of the event broadcast channel.
const EVENT_BUFFER: usize = 16;

/// A host buffer edit: the snapshots before and after, plus the changeset
/// translating positions between them.
#[derive(Debug, Clone)]
pub struct BufferChange {
	/// Snapshot before the edit.
	pub old: Rope,
	/// Snapshot after the edit.
	pub new: Rope,
	/// Position translation from `old` to `new`.
	pub changes: ChangeSet,
}

/// Notifications emitted by a [`FoldController`].
#[derive(Debug, Clone)]
pub enum FoldEvent {
	/// The committed region set changed inside this span. Coordinates are on
	/// the snapshot the scan committed; translate before applying if the
	/// buffer moved on since.
	RegionsChanged {
		/// Minimal contiguous span covering every change.
		span: CharSpan,
	},
	/// The performance breaker fired; folding is permanently off for this
	/// buffer. Emitted exactly once.
	Disabled {
		/// Duration of the offending scan.
		elapsed: Duration,
		/// Configured slow-scan threshold.
		threshold: Duration,
	},
}

/// One foldable region as served to the host renderer.
#[derive(Debug, Clone)]
pub struct FoldRegionView {
	/// The collapsible span, in committed-snapshot coordinates.
	pub span: CharSpan,
	/// Whether the host should start this region collapsed.
	pub default_collapsed: bool,
	/// Replacement text shown while collapsed.
	pub label: String,
	/// Hover preview of the folded content.
	pub hover: String,
	/// What produced the region.
	pub kind: RegionKind,
	/// Nesting level, >= 1.
	pub level: usize,
}

/// Lock-protected per-buffer scan state.
struct FoldState {
	gate: ScanGate,
	/// Latest snapshot delivered by the host.
	text: Rope,
	/// Host version counter for `text`.
	version: u64,
	/// Changes accumulated since the snapshot the committed set was built on.
	pending: Option<ChangeSet>,
	/// Region set from the last completed scan.
	committed: Option<RegionSet>,
	metrics: ScanMetrics,
}

/// Per-buffer folding controller. One instance per tracked buffer.
///
/// Dropping the controller cancels the in-flight scan task at its next
/// suspension point and detaches it.
pub struct FoldController {
	cfg: Arc<FoldConfig>,
	detector: Arc<BoundaryDetector>,
	state: Arc<Mutex<FoldState>>,
	events: broadcast::Sender<FoldEvent>,
	clock: GenerationClock,
	cancel: GenerationToken,
}

impl FoldController {
	/// Creates a controller for one buffer and schedules the initial scan.
	pub fn new(cfg: FoldConfig, classifier: Arc<dyn TokenClassifier>, text: Rope) -> Result<Self> {
		cfg.validate()?;
		let enabled = cfg.enabled;
		let cfg = Arc::new(cfg);
		let detector = Arc::new(BoundaryDetector::new(cfg.clone(), classifier));
		let (events, _) = broadcast::channel(EVENT_BUFFER);

		let controller = Self {
			cfg,
			detector,
			state: Arc::new(Mutex::new(FoldState {
				gate: ScanGate::new(enabled),
				text,
				version: 0,
				pending: None,
				committed: None,
				metrics: ScanMetrics::default(),
			})),
			events,
			clock: GenerationClock::new(),
			cancel: GenerationToken::root(),
		};
		controller.request_scan();
		Ok(controller)
	}

	/// Host change notification. Only updates flags and the pending
	/// changeset; scanning happens on the background task.
	pub fn buffer_changed(&self, change: BufferChange) {
		let decision = {
			let mut st = self.state.lock();
			if st.gate.is_enabled() {
				debug_assert_eq!(change.changes.len(), change.old.len_chars());
				debug_assert_eq!(change.changes.len_after(), change.new.len_chars());
				st.text = change.new;
				st.version += 1;
				st.pending = Some(match st.pending.take() {
					Some(acc) => acc.compose(change.changes),
					None => change.changes,
				});
			}
			st.gate.request()
		};

		match decision {
			GateDecision::Start => self.spawn_scan(),
			GateDecision::Coalesced => tracing::trace!("fold.request.coalesced"),
			GateDecision::Dropped => tracing::trace!("fold.request.dropped"),
			GateDecision::Disabled => {}
		}
	}

	/// Regions of the committed set overlapping `span`, for rendering.
	///
	/// Spans are in committed-snapshot coordinates (see [`FoldEvent`]).
	pub fn regions_overlapping(&self, span: CharSpan) -> Vec<FoldRegionView> {
		let st = self.state.lock();
		let Some(set) = &st.committed else {
			return Vec::new();
		};

		let mut out = Vec::new();
		for region in &set.regions {
			let rspan = region_char_span(&set.snapshot, region);
			if !rspan.overlaps(&span) {
				continue;
			}
			out.push(FoldRegionView {
				span: rspan,
				default_collapsed: self.cfg.default_collapsed && region.kind == RegionKind::Block,
				label: region_label(&set.snapshot, region),
				hover: hover_preview(&set.snapshot, region, self.cfg.hover_line_cap),
				kind: region.kind,
				level: region.level,
			});
		}
		out
	}

	/// Subscribes to change and disable notifications.
	pub fn subscribe(&self) -> broadcast::Receiver<FoldEvent> {
		self.events.subscribe()
	}

	/// Returns false once the feature is off (configured off, or tripped by
	/// the performance breaker).
	pub fn is_enabled(&self) -> bool {
		self.state.lock().gate.is_enabled()
	}

	/// Returns true while a scan is executing.
	pub fn is_scanning(&self) -> bool {
		self.state.lock().gate.is_busy()
	}

	/// Number of completed scans.
	pub fn scans_completed(&self) -> u64 {
		self.state.lock().metrics.scans()
	}

	/// Smoothed scan duration, if any scan completed yet.
	pub fn avg_scan_duration(&self) -> Option<Duration> {
		self.state.lock().metrics.avg_duration()
	}

	/// Version of the snapshot the committed region set was built on.
	pub fn committed_version(&self) -> Option<u64> {
		self.state.lock().committed.as_ref().map(|set| set.version)
	}

	/// The controller's configuration.
	pub fn config(&self) -> &FoldConfig {
		&self.cfg
	}

	fn request_scan(&self) {
		if self.state.lock().gate.request() == GateDecision::Start {
			self.spawn_scan();
		}
	}

	fn spawn_scan(&self) {
		let generation = self.clock.next();
		let token = self.cancel.child(generation);
		let cfg = self.cfg.clone();
		let detector = self.detector.clone();
		let state = self.state.clone();
		let events = self.events.clone();

		spawn(TaskClass::Background, async move {
			loop {
				// Debounce: the only intentional suspension point.
				tokio::select! {
					_ = token.cancelled() => {
						tracing::trace!(generation, "fold.scan.cancelled");
						return;
					}
					_ = tokio::time::sleep(cfg.debounce) => {}
				}
				if !execute_scan(generation, &cfg, &detector, &state, &events) {
					return;
				}
			}
		});
	}
}

impl Drop for FoldController {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

/// Runs one scan cycle; returns true when a coalesced rerun is due.
fn execute_scan(
	generation: u64,
	cfg: &FoldConfig,
	detector: &BoundaryDetector,
	state: &Mutex<FoldState>,
	events: &broadcast::Sender<FoldEvent>,
) -> bool {
	// Capture. Taking `pending` here pins it to the captured snapshot; edits
	// landing while we scan start a fresh changeset against it.
	let (text, version, pending) = {
		let mut st = state.lock();
		if !st.gate.is_enabled() || !st.gate.is_waiting() {
			// Disabled while we slept.
			return false;
		}
		st.gate.begin();
		(st.text.clone(), st.version, st.pending.take())
	};

	let started = Instant::now();
	let regions = scan_snapshot(&text, detector);
	let elapsed = started.elapsed();

	// Install.
	let mut st = state.lock();
	st.metrics.record_scan(elapsed);

	if elapsed > cfg.slow_scan_threshold {
		st.gate.disable();
		st.committed = None;
		st.pending = None;
		let _ = st.gate.finish();
		drop(st);

		tracing::warn!(
			generation,
			elapsed_ms = elapsed.as_millis() as u64,
			threshold_ms = cfg.slow_scan_threshold.as_millis() as u64,
			"fold.disable: scan exceeded slow-scan threshold"
		);
		let _ = events.send(FoldEvent::Disabled {
			elapsed,
			threshold: cfg.slow_scan_threshold,
		});
		return false;
	}

	let prev = st.committed.take();
	let new_set = RegionSet {
		snapshot: text,
		version,
		regions,
	};
	let span = match &prev {
		Some(prev) => {
			let identity;
			let change = match &pending {
				Some(change) => change,
				None => {
					identity = ChangeSet::identity(prev.snapshot.len_chars());
					&identity
				}
			};
			diff_region_sets(prev, change, &new_set)
		}
		None => full_extent(&new_set),
	};
	let region_count = new_set.regions.len();
	st.committed = Some(new_set);
	if span.is_some() {
		st.metrics.record_notification();
	}
	let rerun = st.gate.finish();
	drop(st);

	tracing::debug!(
		generation,
		version,
		regions = region_count,
		elapsed_ms = elapsed.as_millis() as u64,
		changed = span.is_some(),
		rerun,
		"fold.scan"
	);
	if let Some(span) = span {
		let _ = events.send(FoldEvent::RegionsChanged { span });
	}
	rerun
}

/// The collapsible char span of a region: fold point on the start line to
/// the end column on the end line.
fn region_char_span(text: &Rope, region: &Region) -> CharSpan {
	let slice = text.slice(..);
	let start_span = line_char_span(slice, region.start_line);
	let end_span = line_char_span(slice, region.end_line);

	let start = (start_span.start + region.fold_col).min(start_span.end);
	let end = (end_span.start + region.end_col).min(end_span.end).max(start);
	CharSpan::new(start, end)
}

/// Replacement label: the start line's remainder after the hover column, or
/// an ellipsis when there is nothing to show.
fn region_label(text: &Rope, region: &Region) -> String {
	if region.kind == RegionKind::Block {
		let mut buf = String::new();
		line_text(text.slice(..), region.start_line, &mut buf);
		let rest: String = buf.chars().skip(region.hover_col).collect();
		let rest = rest.trim();
		if !rest.is_empty() {
			return rest.to_string();
		}
	}
	"...".to_string()
}

/// Hover preview: the region's lines up to `cap`, ellipsis-terminated when
/// truncated.
fn hover_preview(text: &Rope, region: &Region, cap: usize) -> String {
	let slice = text.slice(..);
	let last = region.end_line.min(region.start_line + cap - 1);

	let mut out = String::new();
	let mut buf = String::new();
	for line in region.start_line..=last {
		line_text(slice, line, &mut buf);
		if line > region.start_line {
			out.push('\n');
		}
		out.push_str(&buf);
	}
	if last < region.end_line {
		out.push_str("\n...");
	}
	out
}
