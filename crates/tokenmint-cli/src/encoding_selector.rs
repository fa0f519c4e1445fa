use tokenmint::{EncodingRegistry, registry::SharedEncoding};

/// The encoding used when neither `--encoding` nor `--model` is given.
const DEFAULT_ENCODING: &str = "cl100k_base";

/// Encoding selector arg group.
#[derive(clap::Args, Debug)]
#[group(required = false, multiple = false)]
pub struct EncodingSelectorArgs {
    /// Encoding to use, e.g. "`cl100k_base`".
    #[arg(long)]
    encoding: Option<String>,

    /// Model whose encoding to use, e.g. "gpt-4".
    #[arg(long)]
    model: Option<String>,
}

impl EncodingSelectorArgs {
    /// Load the selected encoding.
    pub fn load(
        &self,
        registry: &EncodingRegistry,
    ) -> Result<SharedEncoding, Box<dyn std::error::Error>> {
        let enc = match (&self.encoding, &self.model) {
            (_, Some(model)) => registry.encoding_for_model(model)?,
            (Some(name), None) => registry.get_encoding(name)?,
            (None, None) => registry.get_encoding(DEFAULT_ENCODING)?,
        };
        log::info!("using encoding {}", enc.name());
        Ok(enc)
    }
}
