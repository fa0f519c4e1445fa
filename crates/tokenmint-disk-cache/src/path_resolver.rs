//! # Cache Path Resolver
//!
//! Static library defaults for cache directory resolution.

use std::{
    env,
    path::{Path, PathBuf},
};

/// Static configuration for cache path resolution.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    /// The resolution order for cache directory environment variables.
    pub cache_env_vars: &'static [&'static str],

    /// The subdirectory of [`env::temp_dir`] used when nothing else is set.
    pub temp_subdir: &'static str,
}

impl PathResolver {
    /// Resolve the cache directory for this config.
    ///
    /// Resolution Order:
    /// 1. `path`, if present.
    /// 2. ``env[$VAR]`` for each `self.cache_env_vars`; in order. Empty values are skipped.
    /// 3. ``temp_dir()/self.temp_subdir``.
    pub fn resolve_cache_dir<P: AsRef<Path>>(
        &self,
        path: Option<P>,
    ) -> PathBuf {
        if let Some(path) = path.as_ref() {
            return path.as_ref().to_path_buf();
        }

        for env_var in self.cache_env_vars {
            if let Ok(path) = env::var(env_var)
                && !path.is_empty()
            {
                return PathBuf::from(path);
            }
        }

        env::temp_dir().join(self.temp_subdir)
    }
}
