//! Desired vs observed logging state.

use std::collections::BTreeSet;

use cpctl_core::facility::derive_disabled;

/// Logging facilities as currently reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedLogging {
    pub enabled: BTreeSet<String>,
    pub disabled: BTreeSet<String>,
}

/// What a logging update has to send, and whether it is needed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingPlan {
    /// Desired enabled facilities, in declaration order.
    pub to_enable: Vec<String>,
    /// The rest of the universe, in universe order.
    pub to_disable: Vec<String>,
    /// `true` iff the observed enabled set differs from the desired one.
    pub changed: bool,
}

impl LoggingPlan {
    /// "enable types: a, b" or "no types to enable".
    pub fn describe_enable(&self) -> String {
        describe_types(&self.to_enable, "enable types", "no types to enable")
    }

    /// "disable types: a, b" or "no types to disable".
    pub fn describe_disable(&self) -> String {
        describe_types(&self.to_disable, "disable types", "no types to disable")
    }
}

/// Compare an expanded, validated desired list with the observed state.
///
/// Comparison is by set; list order and duplicates do not count as changes.
pub fn plan_logging(
    observed: &ObservedLogging,
    desired_enabled: &[String],
    universe: &[String],
) -> LoggingPlan {
    let mut seen = BTreeSet::new();
    let to_enable: Vec<String> = desired_enabled
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect();
    let to_disable = derive_disabled(&to_enable, universe);

    let desired: BTreeSet<String> = to_enable.iter().cloned().collect();
    let changed = observed.enabled != desired;

    LoggingPlan {
        to_enable,
        to_disable,
        changed,
    }
}

pub(crate) fn describe_types(types: &[String], label: &str, empty: &str) -> String {
    if types.is_empty() {
        empty.to_string()
    } else {
        format!("{label}: {}", types.join(", "))
    }
}
