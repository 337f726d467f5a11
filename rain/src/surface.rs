//! Locating and parameterising the rendering surface.
//!
//! The animation itself is produced by an external renderer. This module
//! only knows where its entry documents live and which query parameters tune
//! it for a given launch mode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::args::LaunchMode;
use crate::effect::Effect;
use crate::error::{Error, Result};

/// Entry document for the animation.
pub const RAIN_DOCUMENT: &str = "index.html";

/// Entry document for the settings page.
pub const CONFIG_DOCUMENT: &str = "config.html";

/// Environment variable that replaces the primary asset directory.
pub const ASSET_DIR_ENV: &str = "RAIN_ASSET_DIR";

/// Query parameters understood by the renderer.
///
/// Unset fields are left out of the locator so the renderer's own defaults
/// apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceParams {
    #[serde(rename = "version")]
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_speed: Option<f32>,
    #[serde(default)]
    pub skip_intro: bool,
    #[serde(default)]
    pub suppress_warnings: bool,
}

impl SurfaceParams {
    /// Renderer defaults for an interactive window.
    pub fn windowed(effect: Effect) -> Self {
        Self {
            effect,
            num_columns: None,
            fall_speed: None,
            animation_speed: None,
            skip_intro: false,
            suppress_warnings: false,
        }
    }

    /// Calmer, denser-looking rain with no intro and no warning overlays.
    pub fn screensaver(effect: Effect) -> Self {
        Self {
            effect,
            num_columns: Some(120),
            fall_speed: Some(0.4),
            animation_speed: Some(0.8),
            skip_intro: true,
            suppress_warnings: true,
        }
    }

    /// Parameters for a rain window opened in `mode`.
    pub fn for_mode(mode: LaunchMode, effect: Effect) -> Self {
        if mode.is_screensaver() {
            Self::screensaver(effect)
        } else {
            Self::windowed(effect)
        }
    }

    pub fn query(&self) -> String {
        let mut pairs = vec![format!("version={}", self.effect.name())];
        if let Some(columns) = self.num_columns {
            pairs.push(format!("numColumns={}", columns));
        }
        if let Some(speed) = self.fall_speed {
            pairs.push(format!("fallSpeed={}", speed));
        }
        if let Some(speed) = self.animation_speed {
            pairs.push(format!("animationSpeed={}", speed));
        }
        if self.skip_intro {
            pairs.push("skipIntro=true".to_string());
        }
        if self.suppress_warnings {
            pairs.push("suppressWarnings=true".to_string());
        }
        pairs.join("&")
    }
}

/// Where a surface document can be loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLocator {
    pub path: PathBuf,
    pub query: Option<String>,
}

impl SurfaceLocator {
    pub fn url(&self) -> String {
        let path = self.path.to_string_lossy().replace('\\', "/");
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        match &self.query {
            Some(query) => format!("file://{}?{}", path, query),
            None => format!("file://{}", path),
        }
    }
}

impl std::fmt::Display for SurfaceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}

/// The two directories searched for surface documents, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRoots {
    pub primary: PathBuf,
    pub alternate: PathBuf,
}

impl AssetRoots {
    /// Primary is the parent of the executable's directory, alternate is the
    /// executable's directory. `RAIN_ASSET_DIR` replaces the primary.
    pub fn from_exe_dir(exe_dir: &Path, override_dir: Option<PathBuf>) -> Self {
        let primary = override_dir.unwrap_or_else(|| exe_dir.join(".."));
        Self {
            primary,
            alternate: exe_dir.to_path_buf(),
        }
    }

    pub fn from_environment() -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
        let override_dir = std::env::var_os(ASSET_DIR_ENV).map(PathBuf::from);
        Ok(Self::from_exe_dir(exe_dir, override_dir))
    }

    /// Find `file`, falling back to the alternate root. Missing from both is
    /// fatal for the session.
    pub fn locate(&self, file: &'static str) -> Result<PathBuf> {
        let primary = self.primary.join(file);
        if primary.is_file() {
            return Ok(primary);
        }

        let alternate = self.alternate.join(file);
        if alternate.is_file() {
            log::warn!(
                "{} not found at {}, using {}",
                file,
                primary.display(),
                alternate.display()
            );
            return Ok(alternate);
        }

        Err(Error::SurfaceNotFound {
            file,
            primary,
            alternate,
        })
    }

    pub fn rain_surface(&self, params: &SurfaceParams) -> Result<SurfaceLocator> {
        Ok(SurfaceLocator {
            path: self.locate(RAIN_DOCUMENT)?,
            query: Some(params.query()),
        })
    }

    pub fn config_surface(&self) -> Result<SurfaceLocator> {
        Ok(SurfaceLocator {
            path: self.locate(CONFIG_DOCUMENT)?,
            query: None,
        })
    }
}
