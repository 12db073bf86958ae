//! # Pretrained Resource Disk Cache

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use downloader::{Download, Downloader};

use crate::PTRVOCAB_CACHE_DIRS;

/// Options for [`PtrVocabDiskCache`].
#[derive(Clone, Default, Debug)]
pub struct PtrVocabDiskCacheOptions {
    /// Optional path to the cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Never download; only serve files already cached.
    pub offline: bool,

    /// Optional [`Downloader`] builder.
    pub downloader: Option<fn() -> Downloader>,
}

impl PtrVocabDiskCacheOptions {
    /// Set the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(
        mut self,
        cache_dir: Option<P>,
    ) -> Self {
        self.cache_dir = cache_dir.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Set offline mode.
    pub fn with_offline(
        mut self,
        offline: bool,
    ) -> Self {
        self.offline = offline;
        self
    }

    /// Set the downloader builder.
    pub fn with_downloader(
        mut self,
        downloader: Option<fn() -> Downloader>,
    ) -> Self {
        self.downloader = downloader;
        self
    }
}

/// Disk cache for downloaded vocabulary resources.
///
/// Files live at ``<cache_dir>/<context..>/<file>``.
pub struct PtrVocabDiskCache {
    cache_dir: PathBuf,
    offline: bool,
    downloader: Downloader,
}

impl PtrVocabDiskCache {
    /// Construct a new [`PtrVocabDiskCache`].
    pub fn new(options: PtrVocabDiskCacheOptions) -> anyhow::Result<Self> {
        let cache_dir = PTRVOCAB_CACHE_DIRS
            .resolve(options.cache_dir)
            .context("failed to resolve cache directory")?;

        let downloader = match options.downloader {
            Some(builder) => builder(),
            None => Downloader::builder().build()?,
        };

        Ok(Self {
            cache_dir,
            offline: options.offline,
            downloader,
        })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Is the cache offline?
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Get the cache path for a file.
    ///
    /// Does not check that the path exists.
    pub fn cache_path<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> PathBuf
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        let mut path = self.cache_dir.clone();
        path.extend(context.iter().map(|c| c.as_ref()));
        path.push(file.as_ref());
        path
    }

    /// Load a cached file, downloading it from `urls` on a miss.
    ///
    /// # Arguments
    /// * `context` - sub-directories between the cache dir and the file.
    /// * `urls` - mirror URLs; the file name is taken from the URL.
    /// * `download` - whether a miss may be downloaded.
    ///
    /// # Errors
    /// * the file is not cached, and `download` is false or the cache is offline.
    /// * the download fails.
    pub fn load_cached_path<C, S>(
        &mut self,
        context: &[C],
        urls: &[S],
        download: bool,
    ) -> anyhow::Result<PathBuf>
    where
        C: AsRef<Path>,
        S: AsRef<str>,
    {
        let urls: Vec<&str> = urls.iter().map(|s| s.as_ref()).collect();
        let mut dl = Download::new_mirrored(&urls);
        let path = self.cache_path(context, &dl.file_name);
        dl.file_name = path.clone();

        if path.exists() {
            return Ok(path);
        }

        if !download || self.offline {
            anyhow::bail!("cached file not found: {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        for summary in self.downloader.download(&[dl])? {
            summary.with_context(|| format!("failed to download {}", urls.join(", ")))?;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;
    use crate::PTRVOCAB_CACHE_DIR;

    #[test]
    #[serial]
    fn test_cache_dir_env_override() {
        let orig = env::var(PTRVOCAB_CACHE_DIR);

        unsafe {
            env::set_var(PTRVOCAB_CACHE_DIR, "/tmp/ptrvocab/env_cache");
        }
        let cache = PtrVocabDiskCache::new(PtrVocabDiskCacheOptions::default()).unwrap();
        assert_eq!(cache.cache_dir(), Path::new("/tmp/ptrvocab/env_cache"));

        let cache = PtrVocabDiskCache::new(
            PtrVocabDiskCacheOptions::default().with_cache_dir(Some("/tmp/ptrvocab/user")),
        )
        .unwrap();
        assert_eq!(cache.cache_dir(), Path::new("/tmp/ptrvocab/user"));

        match orig {
            Ok(original) => unsafe { env::set_var(PTRVOCAB_CACHE_DIR, original) },
            Err(_) => unsafe { env::remove_var(PTRVOCAB_CACHE_DIR) },
        }
    }

    #[test]
    fn test_cache_path() {
        let cache = PtrVocabDiskCache::new(
            PtrVocabDiskCacheOptions::default().with_cache_dir(Some("/tmp/ptrvocab")),
        )
        .unwrap();
        assert_eq!(
            cache.cache_path(&["facebook", "bart-base"], "tokenizer.json"),
            PathBuf::from("/tmp/ptrvocab/facebook/bart-base/tokenizer.json")
        );
    }

    #[test]
    fn test_offline_hit_and_miss() {
        tempdir::TempDir::new("ptrvocab_cache")
            .and_then(|dir| {
                let mut cache = PtrVocabDiskCache::new(
                    PtrVocabDiskCacheOptions::default()
                        .with_cache_dir(Some(dir.path()))
                        .with_offline(true),
                )
                .unwrap();
                assert!(cache.is_offline());

                let urls = ["https://example.invalid/models/tokenizer.json"];
                assert!(cache.load_cached_path(&["models"], &urls, true).is_err());

                let expected = cache.cache_path(&["models"], "tokenizer.json");
                fs::create_dir_all(expected.parent().unwrap())?;
                fs::write(&expected, "{}")?;

                let path = cache.load_cached_path(&["models"], &urls, true).unwrap();
                assert_eq!(path, expected);

                dir.close()
            })
            .unwrap();
    }
}
