use std::io::Write;

use ptrvocab::{EncodeOptions, PaddingPolicy, TruncationPolicy};

use crate::{
    input_output::{InputArgs, OutputArgs, read_lines, write_id_rows},
    tokenizer_source::TokenizerSourceArgs,
};

/// Args for the encode command.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    source: TokenizerSourceArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Emit full vocabulary ids instead of compact pointer-space ids.
    #[arg(long)]
    full: bool,

    /// Lines per batch.
    #[arg(long, default_value_t = 64)]
    batch_size: usize,

    /// Maximum encoded length.
    #[arg(long)]
    max_length: Option<usize>,

    /// Padding policy.
    #[arg(long, default_value = "do_not_pad")]
    padding: PaddingPolicy,

    /// Truncation policy.
    #[arg(long, default_value = "do_not_truncate")]
    truncation: TruncationPolicy,

    /// Do not add the model's begin/end tokens.
    #[arg(long)]
    no_special_tokens: bool,
}

impl EncodeArgs {
    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions::default()
            .with_max_length(self.max_length)
            .with_padding(self.padding)
            .with_truncation(self.truncation)
            .with_add_special_tokens(!self.no_special_tokens)
    }

    /// Run the encode command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let tokenizer = self.source.load()?;
        let options = self.encode_options();

        let lines = read_lines(&mut *self.input.open_reader()?)?;
        let mut writer = self.output.open_writer()?;

        for batch in lines.chunks(self.batch_size.max(1)) {
            let rows: Vec<Vec<u32>> = if self.full {
                tokenizer
                    .encode_batch(batch, &options)?
                    .iter()
                    .map(|e| e.get_ids().to_vec())
                    .collect()
            } else {
                tokenizer.try_batch_encode_to_pointer_space(batch, &options)?.ids
            };
            write_id_rows(&mut *writer, &rows)?;
        }
        writer.flush()?;
        Ok(())
    }
}
