//! Target platform profiles
//!
//! A `PlatformProfile` is the immutable description of one toolchain
//! target: which compiler driver to run, which invocation rules apply, and
//! the baseline flags and libraries every build on that platform gets.
//! Variants are derived by copy-with-override, never by mutating a base
//! profile in place.

use std::fmt;

/// Invocation-construction rules a platform's toolchain follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolsetFamily {
    /// MSVC `cl.exe`-style driver (`/I`, `/link`, `/libpath:`)
    Cl,
    /// GCC/Clang-style driver; selecting a platform that uses it is
    /// rejected as unsupported until invocation rules exist for it
    #[allow(dead_code)]
    Gnu,
}

impl fmt::Display for ToolsetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolsetFamily::Cl => write!(f, "CL"),
            ToolsetFamily::Gnu => write!(f, "GNU"),
        }
    }
}

/// Immutable description of one target platform
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformProfile {
    /// Platform identifier, unique within the catalog
    pub name: String,
    /// Compiler driver executable
    pub compiler: String,
    /// Which invocation-construction rules apply
    pub toolset: ToolsetFamily,
    /// Baseline compiler flags; order matters, the toolchain lets later
    /// flags override earlier ones
    pub compiler_flags: Vec<String>,
    /// System libraries linked on every build for this platform
    pub libs: Vec<String>,
    /// Baseline linker flags
    pub linker_flags: Vec<String>,
}

/// How a sequence field changes in a derived variant
#[derive(Debug, Clone)]
pub enum FlagOverride {
    /// Drop the base sequence and use this one
    Replace(Vec<String>),
    /// Keep the base sequence and append these after it
    Extend(Vec<String>),
}

impl FlagOverride {
    fn apply(self, base: &[String]) -> Vec<String> {
        match self {
            FlagOverride::Replace(flags) => flags,
            FlagOverride::Extend(extra) => {
                let mut flags = base.to_vec();
                flags.extend(extra);
                flags
            }
        }
    }
}

/// Partial field set for deriving a platform variant
#[derive(Debug, Default)]
pub struct PlatformOverrides {
    pub name: Option<String>,
    pub compiler: Option<String>,
    pub toolset: Option<ToolsetFamily>,
    pub compiler_flags: Option<FlagOverride>,
    pub libs: Option<FlagOverride>,
    pub linker_flags: Option<FlagOverride>,
}

impl PlatformProfile {
    /// Derive a variant of this platform, overriding a subset of fields.
    ///
    /// Fields absent from `overrides` are copied from `self`. Sequence
    /// fields state explicitly whether they replace the base list or
    /// extend it; there is no implicit merge.
    pub fn derive(&self, overrides: PlatformOverrides) -> PlatformProfile {
        PlatformProfile {
            name: overrides.name.unwrap_or_else(|| self.name.clone()),
            compiler: overrides.compiler.unwrap_or_else(|| self.compiler.clone()),
            toolset: overrides.toolset.unwrap_or(self.toolset),
            compiler_flags: match overrides.compiler_flags {
                Some(change) => change.apply(&self.compiler_flags),
                None => self.compiler_flags.clone(),
            },
            libs: match overrides.libs {
                Some(change) => change.apply(&self.libs),
                None => self.libs.clone(),
            },
            linker_flags: match overrides.linker_flags {
                Some(change) => change.apply(&self.linker_flags),
                None => self.linker_flags.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PlatformProfile {
        PlatformProfile {
            name: "base".to_string(),
            compiler: "cc.exe".to_string(),
            toolset: ToolsetFamily::Cl,
            compiler_flags: vec!["-a".to_string(), "-b".to_string()],
            libs: vec!["one.lib".to_string()],
            linker_flags: vec!["/x".to_string()],
        }
    }

    #[test]
    fn test_derive_copies_unset_fields() {
        let variant = base().derive(PlatformOverrides {
            name: Some("variant".to_string()),
            ..Default::default()
        });

        assert_eq!(variant.name, "variant");
        assert_eq!(variant.compiler, "cc.exe");
        assert_eq!(variant.toolset, ToolsetFamily::Cl);
        assert_eq!(variant.compiler_flags, base().compiler_flags);
        assert_eq!(variant.libs, base().libs);
        assert_eq!(variant.linker_flags, base().linker_flags);
    }

    #[test]
    fn test_derive_extend_appends_after_base() {
        let variant = base().derive(PlatformOverrides {
            compiler_flags: Some(FlagOverride::Extend(vec!["-c".to_string()])),
            ..Default::default()
        });

        assert_eq!(variant.compiler_flags, vec!["-a", "-b", "-c"]);
    }

    #[test]
    fn test_derive_replace_discards_base() {
        let variant = base().derive(PlatformOverrides {
            libs: Some(FlagOverride::Replace(vec!["two.lib".to_string()])),
            ..Default::default()
        });

        assert_eq!(variant.libs, vec!["two.lib"]);
    }

    #[test]
    fn test_derive_leaves_base_untouched() {
        let original = base();
        let snapshot = original.clone();

        let _variant = original.derive(PlatformOverrides {
            name: Some("variant".to_string()),
            compiler: Some("other.exe".to_string()),
            compiler_flags: Some(FlagOverride::Extend(vec!["-z".to_string()])),
            libs: Some(FlagOverride::Replace(Vec::new())),
            linker_flags: Some(FlagOverride::Extend(vec!["/y".to_string()])),
            ..Default::default()
        });

        assert_eq!(original, snapshot);
    }
}
