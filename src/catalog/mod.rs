//! The fixed platform and build-config catalog
//!
//! Platforms and configs are defined once, in code, and frozen into a
//! process-wide table on first access. Lookups are pure reads of that
//! table; nothing in the catalog is created, mutated, or destroyed while
//! a run is in progress.

pub mod config;
pub mod platform;

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use anyhow::Result;

pub use config::BuildConfig;
pub use platform::{FlagOverride, PlatformOverrides, PlatformProfile, ToolsetFamily};

use crate::error::BrickbuildError;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Process-wide catalog, built on first access
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(Catalog::builtin)
}

/// Frozen table of every known platform and build config
#[derive(Debug)]
pub struct Catalog {
    platforms: Vec<Arc<PlatformProfile>>,
    configs: Vec<BuildConfig>,
    /// Index into `configs` selected when no token is given
    default: usize,
}

impl Catalog {
    /// All known platforms
    pub fn platforms(&self) -> &[Arc<PlatformProfile>] {
        &self.platforms
    }

    /// All known build configs
    pub fn configs(&self) -> &[BuildConfig] {
        &self.configs
    }

    /// Config selected when the command line names none
    pub fn default_config(&self) -> &BuildConfig {
        &self.configs[self.default]
    }

    /// Check the catalog-definition invariants.
    ///
    /// Selector aliases must be pairwise disjoint across all configs and
    /// platform names must be unique. A violation is a mistake in this
    /// table, not a runtime condition, so the orchestrator checks once at
    /// startup and refuses to run.
    pub fn validate(&self) -> Result<()> {
        let mut aliases = HashSet::new();
        for config in self.configs() {
            for alias in &config.aliases {
                if !aliases.insert(alias.as_str()) {
                    return Err(BrickbuildError::catalog_definition(format!(
                        "selector '{}' is claimed by more than one config",
                        alias
                    ))
                    .into());
                }
            }
        }

        let mut names = HashSet::new();
        for platform in self.platforms() {
            if !names.insert(platform.name.as_str()) {
                return Err(BrickbuildError::catalog_definition(format!(
                    "platform '{}' is defined twice",
                    platform.name
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Resolve a selector token to its build config.
    ///
    /// `None` selects the declared default. An unknown token is a hard
    /// usage error, never a silent fallback to the default.
    pub fn resolve(&self, token: Option<&str>) -> Result<&BuildConfig> {
        let Some(token) = token else {
            return Ok(self.default_config());
        };

        self.configs
            .iter()
            .find(|config| config.matches(token))
            .ok_or_else(|| {
                let known: Vec<&str> = self
                    .configs
                    .iter()
                    .flat_map(|config| config.aliases.iter().map(String::as_str))
                    .collect();
                BrickbuildError::usage(
                    format!("unknown build config '{}'", token),
                    format!("known selectors: {}", known.join(", ")),
                )
                .into()
            })
    }

    /// The bricks project's platform and config table
    fn builtin() -> Self {
        let win = Arc::new(PlatformProfile {
            name: "win".to_string(),
            compiler: "cl.exe".to_string(),
            toolset: ToolsetFamily::Cl,
            compiler_flags: strings(&[
                "-nologo",
                "-FC",
                "-Oi",
                "-GR-",
                "-EHa-",
                "-Wall",
                "-WX",
                "-D_HAS_EXCEPTIONS=0",
                "-D_CRT_SECURE_NO_WARNINGS",
                "-wd4061", // Unhandled enum case in switch
                "-wd4062", // Unhandled enum case in switch
                "-wd4100", // Unreferenced parameter
                "-wd4101", // Unused local variable
                "-wd4189", // Initialized but unreferenced local variable
                "-wd4200", // Zero-sized array in struct
                "-wd4201", // Nameless struct/union
                "-wd4312", // Conversion from int to pointer
                "-wd4426", // Optimizations changed
                "-wd4464", // Relative include path contains '..'
                "-wd4505", // Unreferenced function
                "-wd4514", // Unreferenced inline function removed
                "-wd4577", // Exception handling model mismatch
                "-wd4582", // Constructor is not implicitly called
                "-wd4623", // Default constructor implicitly deleted
                "-wd4625", // Copy constructor implicitly deleted
                "-wd4626", // Assignment operator implicitly deleted
                "-wd4668", // Undefined preprocessor macro
                "-wd4710", // Function not inlined
                "-wd4711", // Function inlined
                "-wd4820", // Padding added
                "-wd5026", // Move constructor implicitly deleted
                "-wd5027", // Move assignment implicitly deleted
                "-wd5045", // Spectre mitigations
            ]),
            libs: strings(&[
                "dbghelp.lib",
                "ws2_32.lib",
                "advapi32.lib",
                "shlwapi.lib",
            ]),
            linker_flags: strings(&["/opt:ref", "/incremental:no"]),
        });

        // clang-cl accepts the CL flag set; the extras quiet what it
        // additionally warns about.
        let win_clang = Arc::new(win.derive(PlatformOverrides {
            name: Some("win_clang".to_string()),
            compiler: Some("clang-cl.exe".to_string()),
            compiler_flags: Some(FlagOverride::Extend(strings(&[
                "-fno-exceptions",
                "-fno-rtti",
                "-fdiagnostics-absolute-paths",
                "-Wno-missing-braces",
                "-Wno-unused-variable",
                "-Wno-unused-function",
                "-Wno-missing-field-initializers",
            ]))),
            ..Default::default()
        }));

        let configs = vec![
            BuildConfig {
                name: "Debug".to_string(),
                platform: Arc::clone(&win),
                aliases: strings(&["d", "dbg", "debug"]),
                compiler_flags: strings(&["-DCONFIG_DEBUG=1", "-Z7", "-MTd", "-Od"]),
                // /debug:full keeps hot reloading and RemedyBG debugging working
                linker_flags: strings(&["/debug:full"]),
            },
            // Faster non-release build for day-to-day work when Debug is
            // too slow to iterate with.
            BuildConfig {
                name: "Develop".to_string(),
                platform: Arc::clone(&win),
                aliases: strings(&["dev", "develop"]),
                compiler_flags: strings(&["-DCONFIG_DEVELOP=1", "-Z7", "-MT", "-O2", "-GL"]),
                linker_flags: strings(&["/debug:full", "/LTCG"]),
            },
            BuildConfig {
                name: "Release".to_string(),
                platform: Arc::clone(&win),
                aliases: strings(&["r", "rel", "release"]),
                compiler_flags: strings(&["-DCONFIG_RELEASE=1", "-Z7", "-MT", "-O2", "-GL"]),
                linker_flags: strings(&["/debug:full", "/LTCG"]),
            },
        ];

        Catalog {
            platforms: vec![win, win_clang],
            configs,
            default: 0,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
