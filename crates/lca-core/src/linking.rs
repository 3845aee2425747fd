//! Provider linking policy for product-system construction.

use core::fmt;
use core::str::FromStr;

/// How aggressively unlinked inputs are connected to upstream providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProviderLinking {
    /// Link providers where one exists; unresolved inputs are left dangling.
    #[default]
    Prefer,
    /// Every input must be linked to a provider.
    Always,
    /// Do not link providers at all.
    Ignore,
}

impl ProviderLinking {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderLinking::Prefer => "prefer",
            ProviderLinking::Always => "always",
            ProviderLinking::Ignore => "ignore",
        }
    }
}

impl fmt::Display for ProviderLinking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderLinking {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefer" => Ok(ProviderLinking::Prefer),
            "always" => Ok(ProviderLinking::Always),
            "ignore" => Ok(ProviderLinking::Ignore),
            _ => Err(crate::CoreError::InvalidArg {
                what: "default_providers must be prefer, always or ignore",
            }),
        }
    }
}

/// Granularity of a process in the model store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessType {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "UNIT_PROCESS"))]
    UnitProcess,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "LCI_RESULT", alias = "SYSTEM_PROCESS")
    )]
    SystemProcess,
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessType::UnitProcess => f.write_str("UNIT_PROCESS"),
            ProcessType::SystemProcess => f.write_str("SYSTEM_PROCESS"),
        }
    }
}

/// Product-system linking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkingOptions {
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_providers: ProviderLinking,
    #[cfg_attr(feature = "serde", serde(default))]
    pub preferred_type: ProcessType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_linking_parses() {
        assert_eq!(
            "Prefer".parse::<ProviderLinking>().unwrap(),
            ProviderLinking::Prefer
        );
        assert_eq!(
            " always".parse::<ProviderLinking>().unwrap(),
            ProviderLinking::Always
        );
        assert!("sometimes".parse::<ProviderLinking>().is_err());
    }

    #[test]
    fn defaults_prefer_unit_processes() {
        let opts = LinkingOptions::default();
        assert_eq!(opts.default_providers, ProviderLinking::Prefer);
        assert_eq!(opts.preferred_type, ProcessType::UnitProcess);
    }
}
