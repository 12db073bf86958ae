use std::io::Write;

use crate::{
    input_output::{InputArgs, OutputArgs, parse_id_row, read_lines},
    tokenizer_source::TokenizerSourceArgs,
};

/// Args for the decode command.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    source: TokenizerSourceArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Read full vocabulary ids instead of compact pointer-space ids.
    #[arg(long)]
    full: bool,

    /// Drop the model's special tokens (begin, end, pad, unknown).
    #[arg(long)]
    skip_special_tokens: bool,
}

impl DecodeArgs {
    /// Run the decode command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let tokenizer = self.source.load()?;

        let rows = read_lines(&mut *self.input.open_reader()?)?
            .iter()
            .map(|line| parse_id_row(line))
            .collect::<Result<Vec<_>, _>>()?;

        let texts = if self.full {
            rows.iter()
                .map(|row| tokenizer.decode(row, self.skip_special_tokens))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            tokenizer.try_batch_decode_from_pointer_space(&rows, self.skip_special_tokens)?
        };

        let mut writer = self.output.open_writer()?;
        for text in texts {
            writeln!(writer, "{text}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
