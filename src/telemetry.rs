//! Telemetry metric name constants.
//!
//! Centralised metric names for munez dispatch. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `munez_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: provider display name (e.g. "Groq", "Gemini")
//! - `status`: outcome: "ok" or "error"
//! - `failure`: failure kind for errored attempts (e.g. "quota_exceeded")

/// Total provider attempts made by the orchestrator.
///
/// Labels: `provider`, `status` ("ok" | "error"), `failure` ("none" on success).
pub const ATTEMPTS_TOTAL: &str = "munez_attempts_total";

/// Duration of a single provider attempt in seconds.
///
/// Labels: `provider`.
pub const ATTEMPT_DURATION_SECONDS: &str = "munez_attempt_duration_seconds";

/// Total dispatches (one per chat request reaching the orchestrator).
///
/// Labels: `status` ("ok" | "all_failed" | "no_providers").
pub const DISPATCH_TOTAL: &str = "munez_dispatch_total";
