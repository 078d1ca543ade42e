//! Compiler/linker invocation construction
//!
//! Expands one build step against a resolved (platform, config) pair into
//! the full ordered argument list for a CL-style toolchain. Order is part
//! of the contract: the toolchain applies later flags over earlier ones,
//! so the builder never reorders, merges, or deduplicates anything it is
//! given.

use std::path::Path;

use anyhow::Result;

use crate::catalog::{BuildConfig, PlatformProfile, ToolsetFamily};
use crate::error::BrickbuildError;
use crate::pipeline::BuildStep;

/// Prefix for include-path arguments
const INCLUDE_FLAG: &str = "/I";
/// Prefix for library-search-path arguments
const LIBPATH_FLAG: &str = "/libpath:";
/// Separator between the compiler and linker argument sections
const LINK_SEPARATOR: &str = "/link";
/// Subsystem selection passed to every link
const SUBSYSTEM_FLAG: &str = "-subsystem:console,5.2";

/// Builds argument lists for one resolved (platform, config) pair
pub struct InvocationBuilder<'a> {
    platform: &'a PlatformProfile,
    config: &'a BuildConfig,
    project_root: &'a Path,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(
        platform: &'a PlatformProfile,
        config: &'a BuildConfig,
        project_root: &'a Path,
    ) -> Self {
        InvocationBuilder {
            platform,
            config,
            project_root,
        }
    }

    /// Produce the full argument list for one build step.
    ///
    /// Pure with respect to its inputs: the same step against the same
    /// pair always yields the same list. Relative paths are absolutized
    /// against the project root; nothing else is consulted.
    pub fn build(&self, step: &BuildStep) -> Result<Vec<String>> {
        match self.platform.toolset {
            ToolsetFamily::Cl => Ok(self.build_cl(step)),
            family => Err(BrickbuildError::unsupported_toolset(
                family.to_string(),
                self.platform.name.as_str(),
            )
            .into()),
        }
    }

    fn build_cl(&self, step: &BuildStep) -> Vec<String> {
        let mut args = Vec::new();

        args.push(self.platform.compiler.clone());
        args.extend(self.platform.compiler_flags.iter().cloned());
        args.extend(self.config.compiler_flags.iter().cloned());
        for dir in &step.include_dirs {
            args.push(format!("{}{}", INCLUDE_FLAG, self.absolute(dir)));
        }
        args.push(self.absolute(&step.entry));
        if let Some(output) = &step.output_name {
            args.push(format!("-Fe{}", output));
        }

        args.push(LINK_SEPARATOR.to_string());
        args.extend(self.platform.linker_flags.iter().cloned());
        args.extend(self.config.linker_flags.iter().cloned());
        args.push(SUBSYSTEM_FLAG.to_string());
        for dir in &step.lib_dirs {
            args.push(format!("{}{}", LIBPATH_FLAG, self.absolute(dir)));
        }
        args.extend(self.platform.libs.iter().cloned());
        for lib in &step.libs {
            args.push(self.absolute(lib));
        }

        args
    }

    fn absolute(&self, path: &Path) -> String {
        self.project_root.join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::catalog::catalog;

    fn tiny_platform(toolset: ToolsetFamily) -> Arc<PlatformProfile> {
        Arc::new(PlatformProfile {
            name: "tiny".to_string(),
            compiler: "cc.exe".to_string(),
            toolset,
            compiler_flags: vec!["-p1".to_string(), "-p2".to_string()],
            libs: vec!["sys.lib".to_string()],
            linker_flags: vec!["/l1".to_string()],
        })
    }

    fn tiny_config(platform: Arc<PlatformProfile>) -> BuildConfig {
        BuildConfig {
            name: "Tiny".to_string(),
            platform,
            aliases: vec!["t".to_string()],
            compiler_flags: vec!["-c1".to_string()],
            linker_flags: vec!["/l2".to_string()],
        }
    }

    fn step() -> BuildStep {
        BuildStep {
            label: "Test suite".to_string(),
            message: "Building test suite...".to_string(),
            entry: PathBuf::from("test/test.cpp"),
            include_dirs: vec![PathBuf::from("src")],
            lib_dirs: vec![PathBuf::from("bench/benchmark")],
            libs: vec![PathBuf::from("libs/user.lib")],
            output_name: None,
        }
    }

    #[test]
    fn test_cl_argument_order_is_exact() {
        let platform = tiny_platform(ToolsetFamily::Cl);
        let config = tiny_config(Arc::clone(&platform));
        let root = PathBuf::from("/proj");
        let builder = InvocationBuilder::new(&platform, &config, &root);

        let args = builder.build(&step()).unwrap();

        let abs = |p: &str| root.join(p).display().to_string();
        let expected = vec![
            "cc.exe".to_string(),
            "-p1".to_string(),
            "-p2".to_string(),
            "-c1".to_string(),
            format!("/I{}", abs("src")),
            abs("test/test.cpp"),
            "/link".to_string(),
            "/l1".to_string(),
            "/l2".to_string(),
            "-subsystem:console,5.2".to_string(),
            format!("/libpath:{}", abs("bench/benchmark")),
            "sys.lib".to_string(),
            abs("libs/user.lib"),
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn test_output_name_slots_in_after_the_entry() {
        let platform = tiny_platform(ToolsetFamily::Cl);
        let config = tiny_config(Arc::clone(&platform));
        let root = PathBuf::from("/proj");
        let builder = InvocationBuilder::new(&platform, &config, &root);

        let mut with_output = step();
        with_output.output_name = Some("do.exe".to_string());
        let args = builder.build(&with_output).unwrap();

        let entry = root.join("test/test.cpp").display().to_string();
        let entry_at = args.iter().position(|a| *a == entry).unwrap();
        assert_eq!(args[entry_at + 1], "-Fedo.exe");
        assert_eq!(args[entry_at + 2], "/link");
    }

    #[test]
    fn test_duplicate_flags_pass_through_verbatim() {
        let platform = tiny_platform(ToolsetFamily::Cl);
        let mut config = tiny_config(Arc::clone(&platform));
        // Same flag on both layers must appear twice, in layer order
        config.compiler_flags = vec!["-p2".to_string()];
        let root = PathBuf::from("/proj");
        let builder = InvocationBuilder::new(&platform, &config, &root);

        let args = builder.build(&step()).unwrap();

        assert_eq!(args.iter().filter(|a| *a == "-p2").count(), 2);
        assert_eq!(args[2], "-p2");
        assert_eq!(args[3], "-p2");
    }

    #[test]
    fn test_no_libpath_without_lib_dirs() {
        let platform = tiny_platform(ToolsetFamily::Cl);
        let config = tiny_config(Arc::clone(&platform));
        let root = PathBuf::from("/proj");
        let builder = InvocationBuilder::new(&platform, &config, &root);

        let mut bare = step();
        bare.lib_dirs.clear();
        let args = builder.build(&bare).unwrap();

        assert!(!args.iter().any(|a| a.starts_with("/libpath:")));
    }

    #[test]
    fn test_gnu_toolset_is_rejected() {
        let platform = tiny_platform(ToolsetFamily::Gnu);
        let config = tiny_config(Arc::clone(&platform));
        let root = PathBuf::from("/proj");
        let builder = InvocationBuilder::new(&platform, &config, &root);

        let err = builder.build(&step()).unwrap_err();
        let err = err.downcast::<crate::error::BrickbuildError>().unwrap();
        assert!(matches!(
            err,
            crate::error::BrickbuildError::UnsupportedToolset { .. }
        ));
    }

    #[test]
    fn test_catalog_pairs_build_deterministically() {
        let root = PathBuf::from("/proj");
        for config in catalog().configs() {
            let builder = InvocationBuilder::new(&config.platform, config, &root);
            for step in crate::pipeline::default_steps(true) {
                let first = builder.build(&step).unwrap();
                let second = builder.build(&step).unwrap();
                assert_eq!(first, second, "step '{}'", step.label);
            }
        }
    }
}
