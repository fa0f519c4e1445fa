use tokenmint::pretrained::{MODEL_PREFIX_TO_ENCODING, MODEL_TO_ENCODING, openai::OPENAI_ENCODINGS};

/// Args for the list command.
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Also list the model table.
    #[arg(long)]
    models: bool,
}

impl ListArgs {
    /// Run the list command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        for (name, _) in OPENAI_ENCODINGS {
            println!("{name}");
        }

        if self.models {
            println!();
            for (model, encoding) in MODEL_TO_ENCODING {
                println!("{model:<32} {encoding}");
            }
            for (prefix, encoding) in MODEL_PREFIX_TO_ENCODING {
                println!("{:<32} {encoding}", format!("{prefix}*"));
            }
        }

        Ok(())
    }
}
