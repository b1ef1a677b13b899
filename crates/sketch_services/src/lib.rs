//! Sketch Services Layer
//!
//! Platform-facing plumbing shared by the host and the runtime binary:
//! settings, input state and logging.

pub mod input;
pub mod logging;
pub mod settings;

pub use input::{InputState, MouseButton};
pub use logging::{init_logging, LogError};
pub use settings::{Settings, SettingsError};
