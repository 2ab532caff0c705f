//! Model artifact loading.
//!
//! Artifacts are decoded by an ordered list of codecs over one file handle,
//! rewinding to the start before each attempt. The first codec that produces a
//! structurally valid artifact wins.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bincode::Options;
use tracing::{debug, info, warn};

use super::bundle::{ModelArtifact, ModelBundle};
use crate::error::AppError;
use crate::fs_manager::PortablePathManager;

/// One serialization encoding of [`ModelArtifact`].
pub trait ArtifactCodec: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes one artifact. `limit` is the size of the source in bytes; no
    /// codec may allocate more than that for length-prefixed data.
    fn decode(&self, reader: &mut dyn Read, limit: u64) -> Result<ModelArtifact, String>;

    fn encode(&self, artifact: &ModelArtifact, writer: &mut dyn Write) -> Result<(), String>;
}

/// Primary encoding.
pub struct JsonCodec;

impl ArtifactCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, reader: &mut dyn Read, _limit: u64) -> Result<ModelArtifact, String> {
        serde_json::from_reader(reader).map_err(|e| e.to_string())
    }

    fn encode(&self, artifact: &ModelArtifact, writer: &mut dyn Write) -> Result<(), String> {
        serde_json::to_writer_pretty(writer, artifact).map_err(|e| e.to_string())
    }
}

/// Compact binary fallback encoding.
///
/// Same wire layout as `bincode::serialize` (fixed-width integers, little
/// endian), but decoding is bounded so a corrupt length prefix fails instead
/// of allocating.
pub struct BincodeCodec;

fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

impl ArtifactCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn decode(&self, reader: &mut dyn Read, limit: u64) -> Result<ModelArtifact, String> {
        bincode_options()
            .with_limit(limit)
            .deserialize_from(reader)
            .map_err(|e| e.to_string())
    }

    fn encode(&self, artifact: &ModelArtifact, writer: &mut dyn Write) -> Result<(), String> {
        bincode_options()
            .serialize_into(writer, artifact)
            .map_err(|e| e.to_string())
    }
}

/// Codecs in the order they are tried.
pub fn default_codecs() -> Vec<Box<dyn ArtifactCodec>> {
    vec![Box::new(JsonCodec), Box::new(BincodeCodec)]
}

/// Loads model artifacts from a fixed directory. Nothing is cached: every call
/// re-reads and re-decodes the file.
pub struct ModelLoader {
    model_dir: PathBuf,
    codecs: Vec<Box<dyn ArtifactCodec>>,
}

impl ModelLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self::with_codecs(model_dir, default_codecs())
    }

    pub fn with_codecs(model_dir: impl Into<PathBuf>, codecs: Vec<Box<dyn ArtifactCodec>>) -> Self {
        Self {
            model_dir: model_dir.into(),
            codecs,
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.model_dir.join(name)
    }

    pub fn load(&self, name: &str) -> Result<ModelBundle, AppError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(AppError::NotFound { path });
        }

        let load_error = |cause: String| AppError::Load {
            name: name.to_string(),
            cause,
        };

        let mut file = File::open(&path).map_err(|e| load_error(e.to_string()))?;
        let file_len = file
            .metadata()
            .map_err(|e| load_error(e.to_string()))?
            .len();
        let mut failures = Vec::with_capacity(self.codecs.len());

        for codec in &self.codecs {
            file.seek(SeekFrom::Start(0))
                .map_err(|e| load_error(format!("rewind failed: {}", e)))?;
            let mut reader = BufReader::new(&mut file);

            let outcome = codec
                .decode(&mut reader, file_len)
                .and_then(|artifact| artifact.validate().map(|_| artifact));

            match outcome {
                Ok(artifact) => {
                    info!("Loaded model '{}' with {} codec", name, codec.name());
                    return Ok(artifact.into_bundle(name));
                }
                Err(e) => {
                    debug!("Codec {} could not decode '{}': {}", codec.name(), name, e);
                    failures.push(format!("{}: {}", codec.name(), e));
                }
            }
        }

        warn!("No codec could decode model '{}'", name);
        Err(load_error(failures.join("; ")))
    }

    /// Writes an artifact with the codec named `codec_name`.
    pub fn save(
        &self,
        name: &str,
        artifact: &ModelArtifact,
        codec_name: &str,
    ) -> Result<PathBuf, AppError> {
        let codec = self
            .codecs
            .iter()
            .find(|c| c.name() == codec_name)
            .ok_or_else(|| AppError::Config(format!("Unknown codec: {}", codec_name)))?;

        artifact.validate().map_err(AppError::Validation)?;

        std::fs::create_dir_all(&self.model_dir)?;
        let path = self.path_for(name);
        let mut file = File::create(&path)?;
        codec
            .encode(artifact, &mut file)
            .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
        file.flush()?;
        Ok(path)
    }
}

/// Loads `name` from the default model directory next to the executable.
pub fn load_model(name: &str) -> Result<ModelBundle, AppError> {
    ModelLoader::new(PortablePathManager::models_dir()).load(name)
}
