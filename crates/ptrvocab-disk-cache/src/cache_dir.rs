//! # Cache Directory Resolution

use std::{
    env,
    path::{Path, PathBuf},
};

use directories_next::ProjectDirs;

use crate::PTRVOCAB_CACHE_DIR;

/// Static description of where a cache directory may live.
#[derive(Debug, Clone, Copy)]
pub struct CacheDirResolver {
    /// The qualifier for [`ProjectDirs`].
    pub qualifier: &'static str,

    /// The organization for [`ProjectDirs`].
    pub organization: &'static str,

    /// The application for [`ProjectDirs`].
    pub application: &'static str,

    /// Environment overrides, highest priority first.
    pub env_vars: &'static [&'static str],
}

/// The default [`CacheDirResolver`] for ptrvocab.
pub const PTRVOCAB_CACHE_DIRS: CacheDirResolver = CacheDirResolver {
    qualifier: "io.crates.ptrvocab",
    organization: "",
    application: "ptrvocab",
    env_vars: &[PTRVOCAB_CACHE_DIR],
};

impl CacheDirResolver {
    /// Get the [`ProjectDirs`] for this resolver.
    pub fn project_dirs(&self) -> Option<ProjectDirs> {
        ProjectDirs::from(self.qualifier, self.organization, self.application)
    }

    /// Resolve the cache directory.
    ///
    /// Resolution Order:
    /// 1. `explicit`, if present.
    /// 2. ``env[$VAR]`` for each of `self.env_vars`; in order.
    /// 3. `self.project_dirs().cache_dir()`, if present.
    /// 4. `None`
    pub fn resolve<P: AsRef<Path>>(
        &self,
        explicit: Option<P>,
    ) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.as_ref().to_path_buf());
        }

        self.env_vars
            .iter()
            .find_map(|var| env::var_os(var).map(PathBuf::from))
            .or_else(|| self.project_dirs().map(|pds| pds.cache_dir().to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const ENV_HI: &str = "_PTRVOCAB_TEST_CACHE_HI";
    const ENV_LO: &str = "_PTRVOCAB_TEST_CACHE_LO";

    const TEST_RESOLVER: CacheDirResolver = CacheDirResolver {
        qualifier: "io",
        organization: "crates",
        application: "ptrvocab-test",
        env_vars: &[ENV_HI, ENV_LO],
    };

    #[test]
    #[serial]
    fn test_resolution_order() {
        let no_path: Option<PathBuf> = None;
        let explicit = PathBuf::from("/tmp/ptrvocab/explicit");

        unsafe {
            env::remove_var(ENV_HI);
            env::remove_var(ENV_LO);
        }

        let pds = TEST_RESOLVER.project_dirs().expect("project dirs");
        assert_eq!(
            TEST_RESOLVER.resolve(no_path.clone()),
            Some(pds.cache_dir().to_path_buf())
        );

        unsafe {
            env::set_var(ENV_LO, "/tmp/ptrvocab/lo");
        }
        assert_eq!(
            TEST_RESOLVER.resolve(no_path.clone()),
            Some(PathBuf::from("/tmp/ptrvocab/lo"))
        );

        unsafe {
            env::set_var(ENV_HI, "/tmp/ptrvocab/hi");
        }
        assert_eq!(
            TEST_RESOLVER.resolve(no_path.clone()),
            Some(PathBuf::from("/tmp/ptrvocab/hi"))
        );
        assert_eq!(TEST_RESOLVER.resolve(Some(&explicit)), Some(explicit.clone()));

        unsafe {
            env::remove_var(ENV_HI);
            env::remove_var(ENV_LO);
        }
    }
}
