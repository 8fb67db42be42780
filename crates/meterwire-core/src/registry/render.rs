//! Prometheus text exposition for registry snapshots.
//!
//! Dotted registry names are flattened into the `[a-zA-Z0-9_:]` alphabet.
//! Timers render as histograms in microseconds, meters as counters. Distinct
//! registry names can flatten to the same family name; the caller keeps the
//! first one and skips the rest.

use std::fmt::Write;

use crate::metric::{MeterSnapshot, Metric, TimerSnapshot};

fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == ':' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Exposition family name for a registry entry.
pub(super) fn family(name: &str, metric: &Metric) -> String {
    match metric {
        Metric::Timer(_) => format!("{}_micros", sanitize(name)),
        Metric::Meter(_) => format!("{}_total", sanitize(name)),
    }
}

pub(super) fn meter(name: &str, snap: &MeterSnapshot, out: &mut String) {
    let _ = writeln!(out, "# TYPE {} counter", name);
    let _ = writeln!(out, "{} {}", name, snap.count);
}

pub(super) fn timer(name: &str, snap: &TimerSnapshot, out: &mut String) {
    let _ = writeln!(out, "# TYPE {} histogram", name);
    for (le, count) in &snap.buckets {
        let _ = writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, le, count);
    }
    let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, snap.count);
    let _ = writeln!(out, "{}_sum {}", name, snap.sum_micros);
    let _ = writeln!(out, "{}_count {}", name, snap.count);
}
