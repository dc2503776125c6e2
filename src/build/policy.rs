//! Warning escalation policy.

/// Variable CI services set to signal an unattended build.
pub const CI_ENV_VAR: &str = "CI";

/// How bundler warnings affect the build outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningPolicy {
    /// Warnings are reported and the build succeeds.
    #[default]
    Lenient,
    /// Any warning fails the build.
    Strict,
}

impl WarningPolicy {
    /// Derive the policy from the value of `CI`.
    ///
    /// Strict when the variable is set to anything non-empty other than
    /// `false` (case-insensitive).
    ///
    /// ```
    /// use tvbuild::build::WarningPolicy;
    ///
    /// assert_eq!(WarningPolicy::from_ci_value(Some("true")), WarningPolicy::Strict);
    /// assert_eq!(WarningPolicy::from_ci_value(Some("FALSE")), WarningPolicy::Lenient);
    /// assert_eq!(WarningPolicy::from_ci_value(None), WarningPolicy::Lenient);
    /// ```
    pub fn from_ci_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("false") => Self::Strict,
            _ => Self::Lenient,
        }
    }

    /// Read the policy from the process environment.
    pub fn from_env() -> Self {
        Self::from_ci_value(std::env::var(CI_ENV_VAR).ok().as_deref())
    }

    /// Whether warnings are treated as errors.
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}
