use std::io::{BufRead, Write};

use tokenmint::{DecodeErrors, Encoding};

use crate::{
    disk_cache::DiskCacheArgs,
    encoding_selector::EncodingSelectorArgs,
    input_output::{InputArgs, OutputArgs},
};

/// Args for the decode command.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    selector: EncodingSelectorArgs,

    /// How to treat token sequences which are not valid UTF-8.
    #[arg(long, default_value = "replace")]
    errors: DecodeErrors,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,
}

impl DecodeArgs {
    /// Run the decode command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let registry = self.disk_cache.init_registry()?;
        let enc = self.selector.load(&registry)?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        run_decode(&mut reader, &mut writer, &enc, self.errors)
    }
}

fn run_decode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    enc: &Encoding<u32>,
    errors: DecodeErrors,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let tokens = line?
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()?;

        let text = enc.decode(&tokens, errors)?;

        write!(writer, "{text}")?;
        writer.flush()?;
    }
    Ok(())
}
