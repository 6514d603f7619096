//! Logging facility universe and desired-state expansion.
//!
//! The universe is closed and ordered. A declared list may contain the
//! wildcards `all` or `*`; either one replaces the whole list with the
//! universe in canonical order.

use std::collections::BTreeSet;

use crate::error::ConfigError;

/// Every supported control-plane logging facility, in canonical order.
pub const LOGGING_FACILITIES: [&str; 5] = [
    "api",
    "audit",
    "authenticator",
    "controllerManager",
    "scheduler",
];

/// Tokens that expand to the full universe.
pub const WILDCARDS: [&str; 2] = ["all", "*"];

/// The logging universe as owned strings.
pub fn supported_logging_types() -> Vec<String> {
    LOGGING_FACILITIES.iter().map(|s| s.to_string()).collect()
}

pub fn is_wildcard(name: &str) -> bool {
    WILDCARDS.contains(&name)
}

/// Expand wildcards and validate every entry against `universe`.
///
/// A wildcard anywhere discards the other entries. Without a wildcard the
/// declared order is kept. The first unknown name fails the call.
pub fn expand_desired(declared: &[String], universe: &[String]) -> Result<Vec<String>, ConfigError> {
    let expanded = if declared.iter().any(|name| is_wildcard(name)) {
        universe.to_vec()
    } else {
        declared.to_vec()
    };

    if let Some(unknown) = expanded.iter().find(|name| !universe.contains(name)) {
        return Err(ConfigError::UnknownFacility {
            name: unknown.clone(),
        });
    }

    Ok(expanded)
}

/// `universe − enabled`, returned in universe order.
pub fn derive_disabled(enabled: &[String], universe: &[String]) -> Vec<String> {
    let enabled: BTreeSet<&str> = enabled.iter().map(String::as_str).collect();
    universe
        .iter()
        .filter(|name| !enabled.contains(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["all"])]
    #[case(&["*"])]
    #[case(&["scheduler", "all"])]
    #[case(&["api", "*", "audit"])]
    #[case(&["bogus", "all"])]
    fn wildcard_anywhere_expands_to_universe(#[case] declared: &[&str]) {
        let universe = supported_logging_types();
        let expanded = expand_desired(&strings(declared), &universe).expect("expand");
        assert_eq!(expanded, universe);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["scheduler", "api"])]
    #[case(&["authenticator", "controllerManager"])]
    fn valid_names_keep_declared_order(#[case] declared: &[&str]) {
        let expanded =
            expand_desired(&strings(declared), &supported_logging_types()).expect("expand");
        assert_eq!(expanded, strings(declared));
    }

    #[test]
    fn unknown_name_is_reported_verbatim() {
        let err = expand_desired(&strings(&["api", "anything", "nope"]), &supported_logging_types())
            .unwrap_err();
        match err {
            ConfigError::UnknownFacility { name } => assert_eq!(name, "anything"),
            other => panic!("expected UnknownFacility, got {other:?}"),
        }
    }

    #[test]
    fn unknown_name_message() {
        let err = expand_desired(&strings(&["anything"]), &supported_logging_types()).unwrap_err();
        assert_eq!(err.to_string(), r#"log type "anything" is unknown"#);
    }

    #[test]
    fn disabled_is_complement_of_enabled() {
        let universe = supported_logging_types();
        // every subset of the five facilities
        for mask in 0u32..(1 << universe.len()) {
            let enabled: Vec<String> = universe
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, name)| name.clone())
                .collect();
            let disabled = derive_disabled(&enabled, &universe);

            let union: BTreeSet<&String> = enabled.iter().chain(disabled.iter()).collect();
            assert_eq!(union.len(), universe.len());
            assert!(disabled.iter().all(|name| !enabled.contains(name)));
        }
    }

    #[test]
    fn disabled_follows_universe_order() {
        let disabled = derive_disabled(
            &strings(&["controllerManager", "authenticator"]),
            &supported_logging_types(),
        );
        assert_eq!(disabled, strings(&["api", "audit", "scheduler"]));
    }
}
