use crate::commands::{count::CountArgs, decode::DecodeArgs, encode::EncodeArgs, list::ListArgs};

pub mod count;
pub mod decode;
pub mod encode;
pub mod list;

/// Subcommands for tokenmint.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Encode each input line to space separated token ranks.
    Encode(EncodeArgs),

    /// Decode each input line of token ranks back to text.
    Decode(DecodeArgs),

    /// Count the tokens of the whole input.
    Count(CountArgs),

    /// List the encodings and the model table.
    List(ListArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Encode(cmd) => cmd.run(),
            Commands::Decode(cmd) => cmd.run(),
            Commands::Count(cmd) => cmd.run(),
            Commands::List(cmd) => cmd.run(),
        }
    }
}
