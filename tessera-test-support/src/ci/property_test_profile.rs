//! Property-test run profile parsing for CI and local overrides.
//!
//! Suites read their case count and fork mode from one place so a CI job can
//! scale every property test with a single environment variable.

use std::env;

/// Environment variable controlling proptest case counts.
pub const TESSERA_PBT_CASES_ENV_KEY: &str = "TESSERA_PBT_CASES";
/// Environment variable controlling proptest process forking.
pub const TESSERA_PBT_FORK_ENV_KEY: &str = "TESSERA_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from environment variables, falling back to the given
    /// defaults for unset or malformed values.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::load_with_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    fn load_with_lookup<F>(default_cases: u32, default_fork: bool, lookup: F) -> Self
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let cases = override_or_default(
            TESSERA_PBT_CASES_ENV_KEY,
            lookup(TESSERA_PBT_CASES_ENV_KEY),
            default_cases,
            parse_cases,
        );
        let fork = override_or_default(
            TESSERA_PBT_FORK_ENV_KEY,
            lookup(TESSERA_PBT_FORK_ENV_KEY),
            default_fork,
            parse_switch,
        );
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or_default<T, F>(key: &'static str, raw: Option<String>, default: T, parse: F) -> T
where
    F: Fn(&str) -> Result<T, String>,
{
    let Some(raw) = raw else {
        return default;
    };
    parse(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "invalid property-test profile override; using default",
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

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}
