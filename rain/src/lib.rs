//! Launch resolution and session logic for the digital rain screensaver.
//!
//! Nothing here touches a windowing toolkit; the desktop binary feeds
//! displays, pointer samples and input events in and acts on the results.

pub mod args;
pub mod display;
pub mod effect;
pub mod error;
pub mod help;
pub mod menu;
pub mod settings;
pub mod surface;
pub mod watch;

pub use args::{resolve, ArgWarning, Launch, LaunchMode, Resolution};
pub use display::{plan_screensaver_windows, DisplaySurface, WindowPlan};
pub use effect::Effect;
pub use error::{Error, Result};
pub use surface::{AssetRoots, SurfaceLocator, SurfaceParams};
pub use watch::{ExitTrigger, ExitWatch, FocusTracker, PointerPosition, SessionState};
