//! Asset tree layout and emission
//!
//! Everything lives under an installation root:
//!
//! ```text
//! markers/<name>.png
//! models/<name>/model.config
//! models/<name>/model.sdf
//! models/<name>/materials/textures/<name>.png
//! models/<name>/materials/scripts/<name>.material
//! ```
//!
//! Files are overwritten without checks, so re-running with the same request
//! reproduces the same bytes. There is no rollback: a failure mid-way leaves
//! whatever was already written.

use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::descriptor::{DescriptorError, ModelConfig, ModelMetadata, SdfDocument, MODEL_SDF_FILE};
use crate::marker::MarkerImage;
use crate::material::{render_material_script, texture_file_name};
use crate::request::MarkerName;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to encode marker image: {0}")]
    ImageError(#[from] image::ImageError),
    #[error(transparent)]
    DescriptorError(#[from] DescriptorError),
    #[error("Marker was not confirmed: {0}")]
    NotConfirmed(String),
}

/// Paths of the generated asset tree
#[derive(Debug, Clone)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Installation root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Flat directory of raw marker images
    pub fn markers_dir(&self) -> PathBuf {
        self.root.join("markers")
    }

    pub fn marker_image_path(&self, name: &MarkerName) -> PathBuf {
        self.markers_dir().join(texture_file_name(name))
    }

    /// Directory of the simulator model for a marker
    pub fn model_dir(&self, name: &MarkerName) -> PathBuf {
        self.root.join("models").join(name.as_str())
    }

    pub fn textures_dir(&self, name: &MarkerName) -> PathBuf {
        self.model_dir(name).join("materials").join("textures")
    }

    pub fn scripts_dir(&self, name: &MarkerName) -> PathBuf {
        self.model_dir(name).join("materials").join("scripts")
    }

    pub fn texture_path(&self, name: &MarkerName) -> PathBuf {
        self.textures_dir(name).join(texture_file_name(name))
    }

    pub fn material_script_path(&self, name: &MarkerName) -> PathBuf {
        self.scripts_dir(name).join(format!("{}.material", name))
    }

    pub fn model_config_path(&self, name: &MarkerName) -> PathBuf {
        self.model_dir(name).join("model.config")
    }

    pub fn model_sdf_path(&self, name: &MarkerName) -> PathBuf {
        self.model_dir(name).join(MODEL_SDF_FILE)
    }
}

/// Blocking confirmation step between writing the marker image and
/// generating the model
pub trait ConfirmGate {
    /// Called once the marker image exists at `image_path`. Returning an
    /// error stops emission before the model directory is created.
    fn confirm(&mut self, marker: &MarkerImage, image_path: &Path) -> Result<(), EmitError>;
}

/// Gate that confirms immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn confirm(&mut self, _marker: &MarkerImage, _image_path: &Path) -> Result<(), EmitError> {
        Ok(())
    }
}

/// Paths written by one emission
#[derive(Debug, Clone)]
pub struct EmittedAssets {
    pub marker_image: PathBuf,
    pub model_dir: PathBuf,
    pub texture: PathBuf,
    pub material_script: PathBuf,
    pub model_config: PathBuf,
    pub model_sdf: PathBuf,
}

impl EmittedAssets {
    /// Every file written, in write order
    pub fn files(&self) -> [&Path; 5] {
        [
            &self.marker_image,
            &self.texture,
            &self.material_script,
            &self.model_config,
            &self.model_sdf,
        ]
    }
}

/// Writes the marker image and simulator model for a marker
#[derive(Debug, Clone)]
pub struct AssetEmitter {
    layout: AssetLayout,
    metadata: ModelMetadata,
}

impl AssetEmitter {
    pub fn new(layout: AssetLayout, metadata: ModelMetadata) -> Self {
        Self { layout, metadata }
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Write the full asset tree, pausing at `gate` after the marker image
    pub fn emit(
        &self,
        name: &MarkerName,
        marker: &MarkerImage,
        size: f64,
        gate: &mut dyn ConfirmGate,
    ) -> Result<EmittedAssets, EmitError> {
        let marker_image = self.write_marker_image(name, marker)?;
        gate.confirm(marker, &marker_image)?;
        self.write_model(name, marker, size)?;

        Ok(EmittedAssets {
            marker_image,
            model_dir: self.layout.model_dir(name),
            texture: self.layout.texture_path(name),
            material_script: self.layout.material_script_path(name),
            model_config: self.layout.model_config_path(name),
            model_sdf: self.layout.model_sdf_path(name),
        })
    }

    /// Write `markers/<name>.png`, creating the markers directory if needed
    pub fn write_marker_image(&self, name: &MarkerName, marker: &MarkerImage) -> Result<PathBuf, EmitError> {
        std::fs::create_dir_all(self.layout.markers_dir())?;
        let path = self.layout.marker_image_path(name);
        marker.bitmap.save_with_format(&path, ImageFormat::Png)?;
        info!(path = %path.display(), "Wrote marker image");
        Ok(path)
    }

    /// Write the model directory: texture, material script, model.config
    /// and model.sdf
    pub fn write_model(&self, name: &MarkerName, marker: &MarkerImage, size: f64) -> Result<PathBuf, EmitError> {
        let model_dir = self.layout.model_dir(name);
        std::fs::create_dir_all(self.layout.textures_dir(name))?;
        std::fs::create_dir_all(self.layout.scripts_dir(name))?;

        let texture = self.layout.texture_path(name);
        marker.bitmap.save_with_format(&texture, ImageFormat::Png)?;
        debug!(path = %texture.display(), "Wrote texture");

        let script = self.layout.material_script_path(name);
        std::fs::write(&script, render_material_script(name))?;
        debug!(path = %script.display(), "Wrote material script");

        ModelConfig::new(name, &self.metadata).to_file(&self.layout.model_config_path(name))?;
        SdfDocument::tile(name, size).to_file(&self.layout.model_sdf_path(name))?;

        info!(model = %name, dir = %model_dir.display(), "Wrote simulator model");
        Ok(model_dir)
    }
}
