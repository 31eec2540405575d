//! Fitted artifact files
//!
//! Both the classifier and the encoder are stored as serde JSON documents
//! carrying a `format_version`. They are loaded once at start, checked
//! against each other and fingerprinted with SHA-256.

use crate::encoding::{EncodingScheme, FeaturePipeline};
use crate::error::{Result, StaywiseError};
use crate::model::{Classifier, ClassifierArtifact};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

/// Artifact layout version this build reads and writes
pub const FORMAT_VERSION: u32 = 1;

/// Serialized classifier plus the feature order it was fitted on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub feature_names: Vec<String>,
    pub classes: Vec<f64>,
    pub classifier: ClassifierArtifact,
}

impl ModelArtifact {
    pub fn new(name: impl Into<String>, feature_names: Vec<String>, classifier: ClassifierArtifact) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            name: name.into(),
            description: None,
            classes: classifier.classes().to_vec(),
            feature_names,
            classifier,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn check(&self, path: &Path) -> Result<()> {
        check_version(path, self.format_version)?;
        self.classifier
            .validate()
            .map_err(|e| StaywiseError::artifact(path, e.to_string()))?;
        if self.classifier.n_features() != self.feature_names.len() {
            return Err(StaywiseError::artifact(
                path,
                format!(
                    "classifier takes {} features but {} feature names are listed",
                    self.classifier.n_features(),
                    self.feature_names.len()
                ),
            ));
        }
        if self.classifier.classes() != self.classes.as_slice() {
            return Err(StaywiseError::artifact(
                path,
                format!(
                    "declared classes {:?} differ from the classifier's {:?}",
                    self.classes,
                    self.classifier.classes()
                ),
            ));
        }
        Ok(())
    }

    /// Load and check a model artifact, returning it with its file digest
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, String)> {
        let path = path.as_ref();
        let (artifact, digest): (Self, String) = read_json(path)?;
        artifact.check(path)?;
        Ok((artifact, digest))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}

/// Serialized encoding scheme plus the frozen column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub format_version: u32,
    pub expected_columns: Vec<String>,
    pub scheme: EncodingScheme,
}

impl EncoderArtifact {
    pub fn new(scheme: EncodingScheme, expected_columns: Vec<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            expected_columns,
            scheme,
        }
    }

    /// Load an encoder artifact and build its pipeline
    pub fn load(path: impl AsRef<Path>) -> Result<(FeaturePipeline, String)> {
        let path = path.as_ref();
        let (artifact, digest): (Self, String) = read_json(path)?;
        check_version(path, artifact.format_version)?;
        let pipeline = FeaturePipeline::new(artifact.scheme, artifact.expected_columns)
            .map_err(|e| StaywiseError::artifact(path, e.to_string()))?;
        Ok((pipeline, digest))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}

fn check_version(path: &Path, version: u32) -> Result<()> {
    if version != FORMAT_VERSION {
        return Err(StaywiseError::artifact(
            path,
            format!(
                "unsupported format_version {} (expected {})",
                version, FORMAT_VERSION
            ),
        ));
    }
    Ok(())
}

/// Hex SHA-256 of a byte buffer
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<(T, String)> {
    let bytes = std::fs::read(path).map_err(|e| StaywiseError::artifact(path, e.to_string()))?;
    let digest = sha256_hex(&bytes);
    let value = serde_json::from_slice(&bytes)
        .map_err(|e| StaywiseError::artifact(path, format!("malformed artifact: {}", e)))?;
    Ok((value, digest))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Provenance of the loaded artifacts, reported by health endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub model_name: String,
    pub model_kind: &'static str,
    pub model_path: PathBuf,
    pub model_sha256: String,
    pub encoder_path: PathBuf,
    pub encoder_sha256: String,
    pub scheme: &'static str,
    pub n_features: usize,
}

/// Model and encoder, loaded and checked against each other
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub model: ModelArtifact,
    pub pipeline: FeaturePipeline,
    pub info: ArtifactInfo,
}

impl ArtifactBundle {
    pub fn load(model_path: impl AsRef<Path>, encoder_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let encoder_path = encoder_path.as_ref();

        let (model, model_sha256) = ModelArtifact::load(model_path)?;
        let (pipeline, encoder_sha256) = EncoderArtifact::load(encoder_path)?;

        if model.feature_names.as_slice() != pipeline.expected_columns() {
            let first_difference = model
                .feature_names
                .iter()
                .zip(pipeline.expected_columns())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| model.feature_names.len().min(pipeline.n_features()));
            return Err(StaywiseError::artifact(
                model_path,
                format!(
                    "feature names do not match the encoder's expected columns \
                     ({} vs {} columns, first difference at position {})",
                    model.feature_names.len(),
                    pipeline.n_features(),
                    first_difference
                ),
            ));
        }

        let info = ArtifactInfo {
            model_name: model.name.clone(),
            model_kind: model.classifier.kind(),
            model_path: model_path.to_path_buf(),
            model_sha256,
            encoder_path: encoder_path.to_path_buf(),
            encoder_sha256,
            scheme: pipeline.scheme().kind(),
            n_features: pipeline.n_features(),
        };
        info!(
            model = %info.model_name,
            kind = info.model_kind,
            model_sha256 = %info.model_sha256,
            encoder_sha256 = %info.encoder_sha256,
            scheme = info.scheme,
            n_features = info.n_features,
            "Loaded artifacts"
        );

        Ok(Self { model, pipeline, info })
    }
}
