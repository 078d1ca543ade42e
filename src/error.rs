//! Error types and helpers for user-friendly error messages
//!
//! Fatal errors end the run with a distinct exit code, so they carry enough
//! context (and where possible an actionable hint) to be fixed without
//! reading the source.

use thiserror::Error;

/// Errors that abort a run outside the build steps themselves
#[derive(Error, Debug)]
pub enum BrickbuildError {
    /// Bad selection from the command line
    #[error("Usage error: {message}")]
    Usage { message: String, hint: String },

    /// The fixed platform/config table violates one of its own invariants
    #[error("Invalid build catalog: {message}")]
    CatalogDefinition { message: String },

    /// A platform was selected whose toolset has no invocation rules
    #[error("Unsupported toolset '{family}' for platform '{platform}'")]
    UnsupportedToolset { family: String, platform: String },

    /// Tool/executable not found or misconfigured
    #[error("Missing tool: {tool} (required for {required_for})")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// The filesystem refused something the run cannot continue without
    #[error("Environment error: {message}")]
    Environment {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl BrickbuildError {
    /// Create a usage error with a hint
    pub fn usage(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create a catalog definition error
    pub fn catalog_definition(message: impl Into<String>) -> Self {
        Self::CatalogDefinition {
            message: message.into(),
        }
    }

    /// Create an unsupported toolset error
    pub fn unsupported_toolset(
        family: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self::UnsupportedToolset {
            family: family.into(),
            platform: platform.into(),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create an environment error wrapping its cause
    pub fn environment(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Environment {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            BrickbuildError::Usage { hint, .. }
            | BrickbuildError::MissingTool { hint, .. } => {
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            BrickbuildError::UnsupportedToolset { .. } => {
                eprintln!(
                    "\n{} {}",
                    style("HINT:").yellow().bold(),
                    "Only CL-family platforms can be built; pick a config that targets one."
                );
            }
            BrickbuildError::Environment {
                source: Some(source),
                ..
            } => {
                eprintln!("  caused by: {:#}", source);
            }
            _ => {}
        }

        eprintln!();
    }
}

/// Common error hints for missing tools
pub mod hints {
    /// Get hint for missing Visual Studio
    pub fn visual_studio() -> &'static str {
        "Install Visual Studio with C++ support:\n\
         1. Download from https://visualstudio.microsoft.com/\n\
         2. Select 'Desktop development with C++' workload\n\
         3. Install\n\
         \n\
         Or use Visual Studio Build Tools for CI/headless environments.\n\
         Run from a developer prompt so the compiler is on PATH."
    }
}
