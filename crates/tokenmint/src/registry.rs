//! # Encoding Registry
//!
//! Name-keyed, build-once access to shared [`Encoding`]s.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    encoders::Encoding,
    errors::{TMResult, TokenmintError},
    pretrained::{EncodingConstructor, encoding_name_for_model, openai::OPENAI_ENCODINGS},
    resources::BlobLoader,
    types::{Rank, TMHashMap},
};

/// A shared encoding.
pub type SharedEncoding = Arc<Encoding<Rank>>;

/// Builds each named encoding at most once and shares it.
///
/// Lookups take the read lock only. A miss builds the encoding with no lock
/// held, then takes the write lock just long enough to check and insert; if
/// another thread inserted first, its encoding is returned and the local
/// build is dropped.
pub struct EncodingRegistry {
    loader: Arc<dyn BlobLoader>,
    constructors: RwLock<TMHashMap<String, EncodingConstructor>>,
    encodings: RwLock<TMHashMap<String, SharedEncoding>>,
}

impl core::fmt::Debug for EncodingRegistry {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("EncodingRegistry")
            .field("names", &self.encoding_names())
            .field("loaded", &self.encodings.read().len())
            .finish()
    }
}

impl EncodingRegistry {
    /// A registry of the `OpenAI` encodings, reading blobs through `loader`.
    pub fn new(loader: Arc<dyn BlobLoader>) -> Self {
        Self::with_constructors(loader, OPENAI_ENCODINGS.iter().copied())
    }

    /// A registry of custom constructors.
    pub fn with_constructors<I, S>(
        loader: Arc<dyn BlobLoader>,
        constructors: I,
    ) -> Self
    where
        I: IntoIterator<Item = (S, EncodingConstructor)>,
        S: Into<String>,
    {
        Self {
            loader,
            constructors: RwLock::new(
                constructors
                    .into_iter()
                    .map(|(name, ctor)| (name.into(), ctor))
                    .collect(),
            ),
            encodings: RwLock::new(TMHashMap::default()),
        }
    }

    /// Add (or replace) a constructor.
    ///
    /// An encoding already built under `name` is kept.
    pub fn register<S: Into<String>>(
        &self,
        name: S,
        constructor: EncodingConstructor,
    ) {
        self.constructors.write().insert(name.into(), constructor);
    }

    /// The blob loader.
    pub fn loader(&self) -> &Arc<dyn BlobLoader> {
        &self.loader
    }

    /// The registered encoding names, sorted.
    pub fn encoding_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get (building on first use) the encoding called `name`.
    ///
    /// ## Errors
    /// * [`TokenmintError::UnknownEncodingName`] if no constructor is registered.
    /// * whatever the constructor or [`Encoding::new`] fail with; nothing is cached.
    pub fn get_encoding(
        &self,
        name: &str,
    ) -> TMResult<SharedEncoding> {
        if let Some(enc) = self.encodings.read().get(name) {
            log::debug!("returning cached encoding {name}");
            return Ok(enc.clone());
        }

        let constructor = self
            .constructors
            .read()
            .get(name)
            .copied()
            .ok_or_else(|| TokenmintError::UnknownEncodingName {
                name: name.to_string(),
            })?;

        let built = Arc::new(Encoding::new(constructor(self.loader.as_ref())?)?);

        let mut encodings = self.encodings.write();
        if let Some(winner) = encodings.get(name) {
            log::warn!("encoding {name} was built concurrently; discarding duplicate");
            return Ok(winner.clone());
        }
        encodings.insert(name.to_string(), built.clone());
        Ok(built)
    }

    /// Get the encoding for a model name.
    ///
    /// ## Errors
    /// [`TokenmintError::UnknownModel`] if the model table has no match.
    pub fn encoding_for_model(
        &self,
        model: &str,
    ) -> TMResult<SharedEncoding> {
        self.get_encoding(encoding_name_for_model(model)?)
    }
}

#[cfg(feature = "download")]
mod default_registry {
    use std::sync::Arc;

    use once_cell::sync::Lazy;

    use super::{EncodingRegistry, SharedEncoding};
    use crate::{
        disk_cache::{BlobCacheOptions, BlobDiskCache},
        errors::{TMResult, TokenmintError},
    };

    static DEFAULT_REGISTRY: Lazy<Result<EncodingRegistry, String>> = Lazy::new(|| {
        let cache = BlobDiskCache::new(BlobCacheOptions::default()).map_err(|e| format!("{e:#}"))?;
        log::debug!("default registry caching in {}", cache.cache_dir().display());
        Ok(EncodingRegistry::new(Arc::new(cache)))
    });

    /// The process-wide registry, backed by the default [`BlobDiskCache`].
    pub fn default_registry() -> TMResult<&'static EncodingRegistry> {
        DEFAULT_REGISTRY
            .as_ref()
            .map_err(|e| TokenmintError::External(e.clone()))
    }

    /// Get an encoding from the process-wide registry.
    pub fn get_encoding(name: &str) -> TMResult<SharedEncoding> {
        default_registry()?.get_encoding(name)
    }

    /// Get the encoding for a model from the process-wide registry.
    pub fn encoding_for_model(model: &str) -> TMResult<SharedEncoding> {
        default_registry()?.encoding_for_model(model)
    }
}

#[cfg(feature = "download")]
pub use default_registry::{default_registry, encoding_for_model, get_encoding};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encoders::EncodingDefinition,
        pretrained::openai::{OA_CL100K_BASE_PATTERN, resources::OA_CL100K_BASE_TIKTOKEN_URL},
        resources::MemoryBlobLoader,
        vocab::{io::read_base64_span_map, testing::build_test_tiktoken_blob},
    };

    fn test_loader() -> Arc<dyn BlobLoader> {
        Arc::new(
            MemoryBlobLoader::new()
                .with_blob(OA_CL100K_BASE_TIKTOKEN_URL, build_test_tiktoken_blob(&["hi"]))
                .with_blob("toy.tiktoken", build_test_tiktoken_blob(&["ab", "abc"])),
        )
    }

    fn toy(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
        Ok(EncodingDefinition {
            name: "toy".to_string(),
            pattern: OA_CL100K_BASE_PATTERN.into(),
            mergeable_ranks: read_base64_span_map(loader.read_blob("toy.tiktoken")?.as_slice())?,
            special_tokens: vec![],
            explicit_n_vocab: Some(258),
        })
    }

    #[test]
    fn test_openai_names() {
        let registry = EncodingRegistry::new(test_loader());
        assert_eq!(
            registry.encoding_names(),
            vec!["cl100k_base", "gpt2", "p50k_base", "p50k_edit", "r50k_base"]
        );
    }

    #[test]
    fn test_get_encoding_shared() {
        let registry = EncodingRegistry::new(test_loader());

        let a = registry.get_encoding("cl100k_base").unwrap();
        let b = registry.get_encoding("cl100k_base").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.encode_ordinary("hi").unwrap(), vec![256]);

        let c = registry.encoding_for_model("gpt-4-turbo").unwrap();
        assert!(Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_errors() {
        let registry = EncodingRegistry::new(test_loader());
        assert!(matches!(
            registry.get_encoding("nope"),
            Err(TokenmintError::UnknownEncodingName { .. })
        ));
        assert!(matches!(
            registry.encoding_for_model("nope"),
            Err(TokenmintError::UnknownModel { .. })
        ));

        // The blob is missing; nothing is cached, the next call fails again.
        assert!(matches!(
            registry.get_encoding("r50k_base"),
            Err(TokenmintError::External(_))
        ));
        assert!(registry.get_encoding("r50k_base").is_err());
    }

    #[test]
    fn test_custom_constructors() {
        let registry = EncodingRegistry::with_constructors(
            test_loader(),
            [("toy", toy as EncodingConstructor)],
        );
        assert_eq!(registry.encoding_names(), vec!["toy"]);

        let enc = registry.get_encoding("toy").unwrap();
        assert_eq!(enc.encode_ordinary("abc").unwrap(), vec![257]);

        registry.register("toy2", toy);
        assert_eq!(registry.encoding_names(), vec!["toy", "toy2"]);
        assert!(!Arc::ptr_eq(
            &enc,
            &registry.get_encoding("toy2").unwrap()
        ));
    }
}
