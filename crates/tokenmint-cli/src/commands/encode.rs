use std::io::{BufRead, Write};

use tokenmint::{Encoding, SpecialPolicy};

use crate::{
    disk_cache::DiskCacheArgs,
    encoding_selector::EncodingSelectorArgs,
    input_output::{InputArgs, OutputArgs},
};

/// Special token handling arg group.
#[derive(clap::Args, Debug)]
pub struct SpecialArgs {
    /// Encode this special token as its reserved rank; may be repeated.
    #[arg(long = "allow-special", value_name = "TOKEN")]
    allow_special: Vec<String>,

    /// Encode every special token as its reserved rank.
    #[arg(long, conflicts_with = "allow_special")]
    allow_all_special: bool,
}

impl SpecialArgs {
    /// The policy described by these args.
    ///
    /// Special tokens which are not allowed are an error.
    pub fn policy(&self) -> SpecialPolicy {
        if self.allow_all_special {
            SpecialPolicy::allow_all()
        } else {
            SpecialPolicy::default().with_allowed_tokens(self.allow_special.iter().cloned())
        }
    }
}

/// Args for the encode command.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    selector: EncodingSelectorArgs,

    #[command(flatten)]
    specials: SpecialArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,
}

impl EncodeArgs {
    /// Run the encode command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let registry = self.disk_cache.init_registry()?;
        let enc = self.selector.load(&registry)?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        run_encode(&mut reader, &mut writer, &enc, &self.specials.policy())
    }
}

fn run_encode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    enc: &Encoding<u32>,
    policy: &SpecialPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    // Keep the end-of-line characters, so that decode reproduces the input.
    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        let tokens = enc.encode(&line, policy)?;

        for (idx, token) in tokens.iter().enumerate() {
            write!(writer, "{}{}", if idx == 0 { "" } else { " " }, token)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        line.clear();
    }
    Ok(())
}
