use std::path::PathBuf;

use ptrvocab::PointerTokenizer;

use crate::{disk_cache::DiskCacheArgs, tokenizer_source::BuildOptionArgs};

/// Args for the build command.
#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    build: BuildOptionArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

impl BuildArgs {
    /// Run the build command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let options = self.build.options()?;
        let mut disk_cache = self.disk_cache.init_disk_cache()?;

        let tokenizer = PointerTokenizer::from_options_with_cache(&options, &mut disk_cache)?;
        tokenizer.save_pretrained(&self.out)?;

        log::info!(
            "Saved pointer tokenizer ({} tokens, {} in the output vocabulary) to {}",
            tokenizer.vocab_size(),
            tokenizer.output_vocab_size(),
            self.out.display()
        );
        Ok(())
    }
}
