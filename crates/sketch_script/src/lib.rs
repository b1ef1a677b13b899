//! Sketch Script Host
//!
//! Runs user-submitted JavaScript against a fixed native capability
//! surface through QuickJS.
//!
//! ## Architecture
//!
//! - **Registry:** every function, method, type, enum and constant scripts
//!   may use, declared once per host with typed thunks
//! - **Marshaling:** [`FromScript`]/[`IntoScript`] convert between QuickJS
//!   values and native types; resources cross as epoch-checked handles
//! - **Arena:** sole owner of script-created resources, reset on reload
//! - **Loader:** fresh context per load, sections linked into one script,
//!   ten well-known entry points resolved by name
//! - **Dispatch:** every call is caught; lifecycle faults become
//!   diagnostics and the next frame runs again
//!
//! [`ScriptHost`] ties these together for the embedding environment.

mod bindings;
pub mod arena;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod host;
pub mod loader;
pub mod marshal;
pub mod registry;
pub mod runtime;
pub mod services;

pub use arena::{Arena, ArenaStats, Resource};
pub use diagnostics::{Diagnostic, DiagnosticLog, Severity};
pub use dispatch::{Fault, HookArgs};
pub use error::{MarshalError, RegistrationError, ScriptError};
pub use handle::{Handle, RawHandle, ResourceKind};
pub use host::ScriptHost;
pub use loader::{EntryPoint, ModuleState, ScriptSection, ScriptSource};
pub use marshal::{FromScript, IntoScript, TypeSpec, ValueKind};
pub use registry::{CapabilityDescriptor, Registry};
pub use services::HostServices;

pub use rquickjs;
