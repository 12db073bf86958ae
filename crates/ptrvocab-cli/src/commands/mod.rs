use crate::commands::{
    build::BuildArgs,
    decode::DecodeArgs,
    encode::EncodeArgs,
    inspect::InspectArgs,
    list_models::ListModelsArgs,
};

pub mod build;
pub mod decode;
pub mod encode;
pub mod inspect;
pub mod list_models;

/// Subcommands for ptrvocab.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Extend a pretrained vocabulary with an ontology and pointers, and save it.
    Build(BuildArgs),

    /// Encode text lines into pointer-space id rows.
    Encode(EncodeArgs),

    /// Decode pointer-space id rows into text lines.
    Decode(DecodeArgs),

    /// List available pretrained vocabularies.
    ListModels(ListModelsArgs),

    /// Print vocabulary sizes and special ids.
    Inspect(InspectArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Build(cmd) => cmd.run(),
            Commands::Encode(cmd) => cmd.run(),
            Commands::Decode(cmd) => cmd.run(),
            Commands::ListModels(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
        }
    }
}
