use std::io::Read;

use crate::{
    commands::encode::SpecialArgs,
    disk_cache::DiskCacheArgs,
    encoding_selector::EncodingSelectorArgs,
    input_output::InputArgs,
};

/// Args for the count command.
#[derive(clap::Args, Debug)]
pub struct CountArgs {
    #[command(flatten)]
    selector: EncodingSelectorArgs,

    #[command(flatten)]
    specials: SpecialArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,
}

impl CountArgs {
    /// Run the count command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let registry = self.disk_cache.init_registry()?;
        let enc = self.selector.load(&registry)?;

        let mut text = String::new();
        self.input.open_reader()?.read_to_string(&mut text)?;

        println!("{}", enc.count_tokens(&text, &self.specials.policy())?);
        Ok(())
    }
}
