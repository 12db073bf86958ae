use ptrvocab::disk_cache::{PtrVocabDiskCache, PtrVocabDiskCacheOptions};

/// Disk cache argument group.
#[derive(clap::Args, Debug)]
pub struct DiskCacheArgs {
    /// Cache directory; defaults to `$PTRVOCAB_CACHE_DIR`, then the user cache dir.
    #[arg(long, default_value = None)]
    cache_dir: Option<String>,

    /// Never download; only use already cached files.
    #[arg(long)]
    offline: bool,
}

impl DiskCacheArgs {
    /// Initialize the disk cache.
    pub fn init_disk_cache(&self) -> Result<PtrVocabDiskCache, Box<dyn std::error::Error>> {
        let options = PtrVocabDiskCacheOptions::default()
            .with_cache_dir(self.cache_dir.as_ref())
            .with_offline(self.offline);

        Ok(PtrVocabDiskCache::new(options)?)
    }
}
