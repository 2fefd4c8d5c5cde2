//! Environment-driven proptest tuning shared by property suites.

use std::env;

/// Overrides the number of cases each property runs.
pub const PROPTEST_CASES_ENV_KEY: &str = "PROPTEST_CASES";
/// Runs property cases in forked subprocesses when truthy.
pub const TSURARA_PBT_FORK_ENV_KEY: &str = "TSURARA_PBT_FORK";

/// Case count and forking policy for a property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, falling back to the defaults for
    /// missing or malformed values.
    ///
    /// # Examples
    /// ```
    /// use tsurara_test_support::profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::load_with(default_cases, default_fork, |key| env::var(key).ok())
    }

    fn load_with<F>(default_cases: u32, default_fork: bool, lookup: F) -> Self
    where
        F: Fn(&'static str) -> Option<String>,
    {
        Self {
            cases: override_or(&lookup, PROPTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(&lookup, TSURARA_PBT_FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T, F, P>(lookup: &F, key: &'static str, default: T, parse: P) -> T
where
    F: Fn(&'static str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "ignoring invalid property-test override",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn load(overrides: &[(&'static str, &str)], cases: u32, fork: bool) -> ProptestRunProfile {
        let vars: HashMap<&'static str, String> = overrides
            .iter()
            .map(|(key, value)| (*key, (*value).to_owned()))
            .collect();
        ProptestRunProfile::load_with(cases, fork, |key| vars.get(key).cloned())
    }

    #[rstest]
    fn defaults_apply_without_overrides() {
        let profile = load(&[], 64, false);
        assert_eq!(profile.cases(), 64);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    #[case("25000", 25_000)]
    fn valid_case_overrides_apply(#[case] raw: &str, #[case] expected: u32) {
        let profile = load(&[(PROPTEST_CASES_ENV_KEY, raw)], 64, false);
        assert_eq!(profile.cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("many")]
    fn invalid_case_overrides_fall_back(#[case] raw: &str) {
        let profile = load(&[(PROPTEST_CASES_ENV_KEY, raw)], 64, false);
        assert_eq!(profile.cases(), 64);
    }

    #[rstest]
    #[case("TRUE", true)]
    #[case("on", true)]
    #[case("0", false)]
    #[case("no", false)]
    fn fork_flag_parses(#[case] raw: &str, #[case] expected: bool) {
        let profile = load(&[(TSURARA_PBT_FORK_ENV_KEY, raw)], 64, !expected);
        assert_eq!(profile.fork(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("maybe")]
    fn invalid_fork_flag_keeps_default(#[case] raw: &str) {
        let profile = load(&[(TSURARA_PBT_FORK_ENV_KEY, raw)], 64, true);
        assert!(profile.fork());
    }
}
