use crate::tokenizer_source::TokenizerSourceArgs;

/// Args for the inspect command.
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    source: TokenizerSourceArgs,

    /// Also list every intent and slot with its id.
    #[arg(long)]
    names: bool,
}

impl InspectArgs {
    /// Run the inspect command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let tok = self.source.load()?;

        println!("vocab_size: {}", tok.vocab_size());
        println!("output_vocab_size: {}", tok.output_vocab_size());
        println!("ontology_vocab_size: {}", tok.ontology_vocab_size());
        println!("pointer_set_size: {}", tok.pointer_set_size());
        println!("num_intents: {}", tok.num_intents());
        println!("num_slots: {}", tok.num_slots());
        println!("bos_id: {}", tok.bos_id());
        println!("eos_id: {}", tok.eos_id());
        println!("pad_id: {}", tok.pad_id());
        println!("unk_id: {}", tok.unk_id());
        println!("span_close: {:?} = {}", tok.span_close_token(), tok.span_close_id());
        println!("pointer_remap: {}", tok.remapper().is_some());

        if self.names {
            for intent in tok.ontology().intents() {
                println!("intent {intent} = {:?}", tok.intent_id(intent));
            }
            for slot in tok.ontology().slots() {
                println!("slot {slot} = {:?}", tok.slot_id(slot));
            }
        }
        Ok(())
    }
}
