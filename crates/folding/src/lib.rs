//! Incremental region-folding runtime for assembly buffers.
//!
//! Scans a buffer snapshot for foldable regions (explicit fold tags,
//! dialect block keywords such as `SEGMENT`/`ENDS`, `PROC`/`ENDP`,
//! `%MACRO`/`%ENDMACRO`, and multi-line comment runs) and keeps the
//! committed region set incrementally up to date as the host reports edits.
//!
//! The host integrates through three narrow seams:
//!
//! * a [`TokenClassifier`] that types each line's tokens (only directives
//!   matter here),
//! * [`FoldController::buffer_changed`] called from its change notification,
//! * [`FoldController::regions_overlapping`] plus the [`FoldEvent`] stream
//!   for rendering.
//!
//! Scans are debounced, single-flight, and diffed: hosts are told the one
//! minimal span that actually changed. A scan that blows the configured
//! wall-clock budget permanently disables folding for that buffer instead of
//! degrading editor latency.

/// Region builder: the nesting stack.
mod build;
/// Token classification interface and the bundled table-driven classifier.
pub mod classify;
/// Multi-line comment coalescing.
mod comment;
/// Read-only folding configuration.
pub mod config;
/// Per-buffer controller: scheduling, breaker, queries, events.
pub mod controller;
/// Keyword boundary detection for explicit tags and dialect tables.
pub mod detect;
/// Region change-set diffing.
pub mod diff;
/// Error types.
pub mod error;
/// Scan metrics.
mod metrics;
/// Region data model.
pub mod region;
/// The full-scan pipeline.
pub mod scan;

pub use classify::{KeywordClassifier, Token, TokenClassifier, TokenKind};
pub use config::{Dialect, FoldConfig};
pub use controller::{BufferChange, FoldController, FoldEvent, FoldRegionView};
pub use detect::{BoundaryDetector, StartBoundary};
pub use diff::{diff_region_sets, full_extent};
pub use error::{FoldError, Result};
pub use region::{Region, RegionKind, RegionSet};
pub use scan::scan_snapshot;
