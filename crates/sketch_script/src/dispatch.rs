//! Calling into a loaded module
//!
//! Every call is caught. Whatever a script throws comes back as a [`Fault`]
//! and never unwinds into the host.

use rquickjs::{CatchResultExt, CaughtError, Ctx, Function, Persistent, Value};
use std::fmt;

/// Positional arguments for an entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HookArgs {
    None,
    Pointer { x: f32, y: f32, button: i32 },
    Position { x: f32, y: f32 },
    Key(i32),
    Size { width: i32, height: i32 },
}

impl HookArgs {
    pub fn len(&self) -> usize {
        match self {
            HookArgs::None => 0,
            HookArgs::Key(_) => 1,
            HookArgs::Position { .. } | HookArgs::Size { .. } => 2,
            HookArgs::Pointer { .. } => 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A script-side failure, located when the engine reports where it
/// happened. Line and column are 1-based; 0 means unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn from_caught(caught: CaughtError<'_>) -> Self {
        match caught {
            CaughtError::Exception(exception) => {
                let name = exception
                    .as_object()
                    .get::<_, Option<String>>("name")
                    .ok()
                    .flatten();
                let message = exception.message().unwrap_or_default();
                let message = match name {
                    Some(name) if message.is_empty() => name,
                    Some(name) => format!("{name}: {message}"),
                    None => message,
                };
                // Syntax errors carry their own position; runtime errors only
                // have a backtrace.
                let (line, column) = match exception.line() {
                    Some(line) if line > 0 => (line as u32, 0),
                    _ => exception
                        .stack()
                        .as_deref()
                        .and_then(stack_location)
                        .unwrap_or((0, 0)),
                };
                Self {
                    message,
                    line,
                    column,
                }
            }
            CaughtError::Value(value) => Self::new(format!("uncaught {}", thrown_value(&value))),
            CaughtError::Error(error) => Self::new(error.to_string()),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.message, self.line, self.column)
    }
}

impl From<rquickjs::Error> for Fault {
    fn from(error: rquickjs::Error) -> Self {
        Self::new(error.to_string())
    }
}

fn thrown_value(value: &Value<'_>) -> String {
    if let Some(text) = value.as_string().and_then(|s| s.to_string().ok()) {
        return format!("\"{text}\"");
    }
    if let Some(number) = value.as_number() {
        return number.to_string();
    }
    if let Some(flag) = value.as_bool() {
        return flag.to_string();
    }
    crate::marshal::describe(value)
}

/// First script frame of a QuickJS backtrace, as `(line, column)`.
///
/// Frames read `at name (file:line)` or `at name (file:line:column)`;
/// native frames read `at name (native)` and are skipped.
pub fn stack_location(stack: &str) -> Option<(u32, u32)> {
    stack.lines().find_map(|frame| {
        let frame = frame.trim();
        let location = frame
            .rsplit_once('(')
            .map_or(frame, |(_, rest)| rest)
            .trim_end_matches(')');
        if location == "native" {
            return None;
        }
        parse_location(location)
    })
}

fn parse_location(location: &str) -> Option<(u32, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next()?.parse::<u32>().ok()?;
    match parts.next().map(str::parse::<u32>) {
        Some(Ok(line)) => Some((line, last)),
        Some(Err(_)) => Some((last, 0)),
        None => None,
    }
}

/// Call `function` with `args` and contain whatever it throws.
pub fn invoke<'js>(
    ctx: &Ctx<'js>,
    function: &Persistent<Function<'static>>,
    args: HookArgs,
) -> Result<(), Fault> {
    let function = function.clone().restore(ctx)?;
    let result = match args {
        HookArgs::None => function.call::<_, Value>(()),
        HookArgs::Pointer { x, y, button } => function.call::<_, Value>((x, y, button)),
        HookArgs::Position { x, y } => function.call::<_, Value>((x, y)),
        HookArgs::Key(key) => function.call::<_, Value>((key,)),
        HookArgs::Size { width, height } => function.call::<_, Value>((width, height)),
    };
    result.catch(ctx).map(drop).map_err(Fault::from_caught)
}
