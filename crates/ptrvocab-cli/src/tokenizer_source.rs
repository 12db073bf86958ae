use std::path::PathBuf;

use ptrvocab::{PointerTokenizer, PointerTokenizerOptions, tokenizer::DEFAULT_PRETRAINED};

use crate::disk_cache::DiskCacheArgs;

/// Options for extending a pretrained vocabulary.
#[derive(clap::Args, Debug)]
pub struct BuildOptionArgs {
    /// Pretrained identifier, or a directory holding a `tokenizer.json`.
    #[arg(long, default_value = DEFAULT_PRETRAINED)]
    pretrained: String,

    /// Ontology JSON source.
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Dataset selector.
    #[arg(long, default_value = "TOPv2")]
    dataset: String,

    /// Number of pointer tokens; defaults to the model max length.
    #[arg(long)]
    max_seq_len: Option<usize>,

    /// Span-closing delimiter token.
    #[arg(long, default_value = ptrvocab::tokenizer::DEFAULT_SPAN_CLOSE_TOKEN)]
    span_close_token: String,

    /// Pointer token prefix.
    #[arg(long, default_value = ptrvocab::pointers::DEFAULT_POINTER_PREFIX)]
    pointer_prefix: String,

    /// Do not build the pointer-space remapper.
    #[arg(long)]
    no_pointer_remap: bool,
}

impl BuildOptionArgs {
    /// Convert to [`PointerTokenizerOptions`].
    pub fn options(&self) -> Result<PointerTokenizerOptions, Box<dyn std::error::Error>> {
        let ontology = self
            .ontology
            .as_ref()
            .ok_or("--ontology is required to build a pointer tokenizer")?;

        Ok(PointerTokenizerOptions::new(&self.pretrained, ontology)
            .with_dataset(&self.dataset)
            .with_max_seq_len(self.max_seq_len)
            .with_span_close_token(&self.span_close_token)
            .with_pointer_prefix(&self.pointer_prefix)
            .with_pointer_remap(!self.no_pointer_remap))
    }
}

/// Where to get a pointer tokenizer: a saved directory, or a fresh build.
#[derive(clap::Args, Debug)]
pub struct TokenizerSourceArgs {
    /// Load a tokenizer saved by the `build` command.
    #[arg(long)]
    saved: Option<PathBuf>,

    #[command(flatten)]
    build: BuildOptionArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,
}

impl TokenizerSourceArgs {
    /// Load or build the tokenizer.
    pub fn load(&self) -> Result<PointerTokenizer, Box<dyn std::error::Error>> {
        if let Some(dir) = &self.saved {
            log::info!("Loading pointer tokenizer from {}", dir.display());
            return Ok(PointerTokenizer::from_saved(dir)?);
        }

        let options = self.build.options()?;
        let mut disk_cache = self.disk_cache.init_disk_cache()?;
        Ok(PointerTokenizer::from_options_with_cache(&options, &mut disk_cache)?)
    }
}
