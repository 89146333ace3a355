//! Image rendition formats attached to every request.
//!
//! A [`FormatRegistry`] holds the "size" and "user size" renditions a caller
//! wants the service to produce, plus at most one preview rendition. The
//! registry is serialized into the options of each request until it is
//! cleared.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::query::{join_values, QueryOptions};

/// Default JPEG quality for a rendition.
pub const DEFAULT_QUALITY: u8 = 75;

/// Dimensions and processing options of one rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Rendition {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Crop to exactly fill the box
    #[serde(default = "default_true")]
    pub crop: bool,
    /// JPEG quality, 0 to 100
    #[validate(range(max = 100))]
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Apply sharpening after resizing
    #[serde(default = "default_true")]
    pub sharpening: bool,
}

const fn default_true() -> bool {
    true
}

const fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl Rendition {
    /// Create a rendition with the default crop, quality and sharpening.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            crop: true,
            quality: DEFAULT_QUALITY,
            sharpening: true,
        }
    }

    /// Set cropping.
    #[must_use]
    pub const fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    /// Set quality.
    #[must_use]
    pub const fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set sharpening.
    #[must_use]
    pub const fn with_sharpening(mut self, sharpening: bool) -> Self {
        self.sharpening = sharpening;
        self
    }

    /// `width,height,crop,quality,sharpening`
    #[must_use]
    pub fn encode(&self) -> String {
        join_values([
            self.width,
            self.height,
            u32::from(self.crop),
            u32::from(self.quality),
            u32::from(self.sharpening),
        ])
    }

    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid format: {e}")))
    }
}

/// A named rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Name the service reports the rendition under
    pub name: String,
    /// Rendition settings
    #[serde(flatten)]
    pub rendition: Rendition,
}

impl FormatSpec {
    /// Create a named format with default crop, quality and sharpening.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            rendition: Rendition::new(width, height),
        }
    }

    /// Set cropping.
    #[must_use]
    pub fn with_crop(mut self, crop: bool) -> Self {
        self.rendition = self.rendition.with_crop(crop);
        self
    }

    /// Set quality.
    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.rendition = self.rendition.with_quality(quality);
        self
    }

    /// Set sharpening.
    #[must_use]
    pub fn with_sharpening(mut self, sharpening: bool) -> Self {
        self.rendition = self.rendition.with_sharpening(sharpening);
        self
    }

    /// `name,width,height,crop,quality,sharpening`
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{},{}", self.name, self.rendition.encode())
    }
}

/// Formats applied to every request made by one client.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatRegistry {
    sizes: Vec<FormatSpec>,
    user_sizes: Vec<FormatSpec>,
    preview: Option<Rendition>,
}

impl FormatRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sizes: Vec::new(),
            user_sizes: Vec::new(),
            preview: None,
        }
    }

    /// Append a content size format.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality is above 100.
    pub fn add_size(&mut self, spec: FormatSpec) -> Result<()> {
        spec.rendition.check()?;
        self.sizes.push(spec);
        Ok(())
    }

    /// Append a user avatar size format.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality is above 100.
    pub fn add_user_size(&mut self, spec: FormatSpec) -> Result<()> {
        spec.rendition.check()?;
        self.user_sizes.push(spec);
        Ok(())
    }

    /// Set the preview format, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality is above 100.
    pub fn set_preview(&mut self, rendition: Rendition) -> Result<()> {
        rendition.check()?;
        self.preview = Some(rendition);
        Ok(())
    }

    /// Remove every format.
    pub fn clear(&mut self) {
        self.sizes.clear();
        self.user_sizes.clear();
        self.preview = None;
    }

    /// Size formats in insertion order.
    #[must_use]
    pub fn sizes(&self) -> &[FormatSpec] {
        &self.sizes
    }

    /// User size formats in insertion order.
    #[must_use]
    pub fn user_sizes(&self) -> &[FormatSpec] {
        &self.user_sizes
    }

    /// The preview format, if set.
    #[must_use]
    pub const fn preview(&self) -> Option<&Rendition> {
        self.preview.as_ref()
    }

    /// Returns true if no format of any kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty() && self.user_sizes.is_empty() && self.preview.is_none()
    }

    /// Write `size[i]`, `user_size[i]` (1-indexed) and `preview` into `options`.
    pub fn apply_to(&self, options: &mut QueryOptions) {
        for (i, spec) in self.sizes.iter().enumerate() {
            options.insert(format!("size[{}]", i + 1), spec.encode());
        }

        for (i, spec) in self.user_sizes.iter().enumerate() {
            options.insert(format!("user_size[{}]", i + 1), spec.encode());
        }

        if let Some(preview) = &self.preview {
            options.insert("preview", preview.encode());
        }
    }
}
