/// Args for the model listing command.
#[derive(clap::Args, Debug)]
pub struct ListModelsArgs {
    /// Also list aliases.
    #[arg(long)]
    aliases: bool,
}

impl ListModelsArgs {
    /// Run the model listing command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        for name in ptrvocab::pretrained::list_models(false) {
            let model = ptrvocab::pretrained::resolve_pretrained(&name)?;
            println!("\"{}\" - model max length {}", model.name(), model.model_max_length);

            if self.aliases {
                for alias in &model.aliases[1..] {
                    println!("  * \"{alias}\"");
                }
            }
        }
        Ok(())
    }
}
