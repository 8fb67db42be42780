//! Metric name resolution.
//!
//! Names are dot-separated: `<resource type>.<method>[.<suffix>...]` unless a
//! declaration supplies an explicit name. Both functions are pure.

use crate::resource::ResourceInfo;

/// Suffix appended to default exception-meter names.
pub const EXCEPTIONS_SUFFIX: &str = "exceptions";

/// Join `base` with every non-empty part, separated by `.`.
pub fn name(base: &str, parts: &[&str]) -> String {
    let mut out = String::from(base);
    for part in parts.iter().filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(part);
    }
    out
}

/// Resolve the registry key for a metric declared on `resource`.
///
/// - explicit + absolute: the explicit name verbatim
/// - explicit + relative: `<resource type>.<explicit>`
/// - no explicit name: `<resource type>.<method>.<suffixes...>`
pub fn choose_name(
    explicit: &str,
    absolute: bool,
    resource: &ResourceInfo,
    suffixes: &[&str],
) -> String {
    if !explicit.is_empty() {
        if absolute {
            return explicit.to_string();
        }
        return name(resource.resource_type(), &[explicit]);
    }
    let base = name(resource.resource_type(), &[resource.method()]);
    name(&base, suffixes)
}
