//! Module loader
//!
//! Turns named source sections into a live module: a fresh QuickJS context
//! with the capability surface installed, every section linked into one
//! script and evaluated, and the ten well-known entry points looked up.
//!
//! The linked script is parsed as a whole before any of it runs, so a
//! syntax error in any section leaves no side effects behind and function
//! declarations are visible to every section regardless of order.

use crate::diagnostics::{Diagnostic, Severity};
use crate::dispatch::Fault;
use crate::registry::Registry;
use crate::runtime::ScriptRuntime;
use crate::services::HostServices;
use rquickjs::{CatchResultExt, Context, Ctx, Function, Persistent, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Section name used when a script is submitted as one piece of text.
pub const DEFAULT_SECTION: &str = "script";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSection {
    pub name: String,
    pub source: String,
}

/// Ordered sections making up one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSource {
    sections: Vec<ScriptSection>,
}

impl ScriptSource {
    pub fn single(source: impl Into<String>) -> Self {
        Self::from_sections([(DEFAULT_SECTION, source)])
    }

    pub fn from_sections<N, S>(sections: impl IntoIterator<Item = (N, S)>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            sections: sections
                .into_iter()
                .map(|(name, source)| ScriptSection {
                    name: name.into(),
                    source: source.into(),
                })
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sections.push(ScriptSection {
            name: name.into(),
            source: source.into(),
        });
    }

    pub fn sections(&self) -> &[ScriptSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Goes between linked sections. The lone `;` ends a statement left open
/// by automatic semicolon insertion.
const SECTION_SEPARATOR: &str = "\n;\n";

/// Where each section starts inside the linked script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    starts: Vec<(String, u32)>,
}

impl SectionMap {
    /// Join `source` into one script, recording each section's first line.
    pub fn link(source: &ScriptSource) -> (String, Self) {
        let mut unit = String::new();
        let mut starts = Vec::with_capacity(source.len());
        let mut line = 1u32;
        for (i, section) in source.sections().iter().enumerate() {
            if i > 0 {
                unit.push_str(SECTION_SEPARATOR);
                line += 2;
            }
            starts.push((section.name.clone(), line));
            unit.push_str(&section.source);
            line += section.source.matches('\n').count() as u32;
        }
        (unit, Self { starts })
    }

    /// Section name and section-relative line for a line of the linked
    /// script. Line 0 (unknown) maps to the first section.
    pub fn locate(&self, line: u32) -> (&str, u32) {
        let index = self
            .starts
            .partition_point(|(_, start)| *start <= line)
            .saturating_sub(1);
        match self.starts.get(index) {
            Some((name, start)) if line >= *start => (name.as_str(), line - start + 1),
            Some((name, _)) => (name.as_str(), line),
            None => (DEFAULT_SECTION, line),
        }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

impl From<&str> for ScriptSource {
    fn from(source: &str) -> Self {
        Self::single(source)
    }
}

impl From<String> for ScriptSource {
    fn from(source: String) -> Self {
        Self::single(source)
    }
}

/// The fixed hooks a script may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryPoint {
    Setup,
    Update,
    Draw,
    MousePressed,
    MouseReleased,
    MouseMoved,
    MouseDragged,
    KeyPressed,
    KeyReleased,
    WindowResized,
}

impl EntryPoint {
    pub const COUNT: usize = 10;

    pub const ALL: [EntryPoint; Self::COUNT] = [
        EntryPoint::Setup,
        EntryPoint::Update,
        EntryPoint::Draw,
        EntryPoint::MousePressed,
        EntryPoint::MouseReleased,
        EntryPoint::MouseMoved,
        EntryPoint::MouseDragged,
        EntryPoint::KeyPressed,
        EntryPoint::KeyReleased,
        EntryPoint::WindowResized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntryPoint::Setup => "setup",
            EntryPoint::Update => "update",
            EntryPoint::Draw => "draw",
            EntryPoint::MousePressed => "mousePressed",
            EntryPoint::MouseReleased => "mouseReleased",
            EntryPoint::MouseMoved => "mouseMoved",
            EntryPoint::MouseDragged => "mouseDragged",
            EntryPoint::KeyPressed => "keyPressed",
            EntryPoint::KeyReleased => "keyReleased",
            EntryPoint::WindowResized => "windowResized",
        }
    }

    /// Parameter types the host passes.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            EntryPoint::Setup | EntryPoint::Update | EntryPoint::Draw => &[],
            EntryPoint::MousePressed | EntryPoint::MouseReleased | EntryPoint::MouseDragged => {
                &["float", "float", "int"]
            }
            EntryPoint::MouseMoved => &["float", "float"],
            EntryPoint::KeyPressed | EntryPoint::KeyReleased => &["int"],
            EntryPoint::WindowResized => &["int", "int"],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }

    /// `setup`, `update` and `draw` run every frame; faults there are
    /// reported. Event hooks are best effort.
    pub fn is_lifecycle(self) -> bool {
        matches!(self, EntryPoint::Setup | EntryPoint::Update | EntryPoint::Draw)
    }

    pub fn signature(self) -> String {
        format!("void {}({})", self.name(), self.params().join(", "))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a global with a hook's name was not taken as that hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    NotCallable,
    TooManyParams(u32),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::NotCallable => f.write_str("is not a function"),
            Mismatch::TooManyParams(n) => write!(f, "declares {n} parameters"),
        }
    }
}

/// Resolved hooks of one module. Absent entries are skipped by dispatch.
#[derive(Default)]
pub struct EntryPointTable {
    slots: [Option<Persistent<Function<'static>>>; EntryPoint::COUNT],
}

impl EntryPointTable {
    /// Look up every hook among the globals of `ctx`. Lexical declarations
    /// (`const draw = () => {}`) count as well as function declarations.
    pub fn resolve(ctx: &Ctx<'_>) -> (Self, Vec<(EntryPoint, Mismatch)>) {
        let mut table = Self::default();
        let mut mismatches = Vec::new();
        for entry in EntryPoint::ALL {
            match resolve_entry(ctx, entry) {
                Ok(Some(function)) => {
                    table.slots[entry.index()] = Some(Persistent::save(ctx, function));
                }
                Ok(None) => {}
                Err(mismatch) => mismatches.push((entry, mismatch)),
            }
        }
        (table, mismatches)
    }

    pub fn get(&self, entry: EntryPoint) -> Option<&Persistent<Function<'static>>> {
        self.slots[entry.index()].as_ref()
    }

    pub fn contains(&self, entry: EntryPoint) -> bool {
        self.slots[entry.index()].is_some()
    }

    pub fn resolved(&self) -> Vec<EntryPoint> {
        EntryPoint::ALL
            .into_iter()
            .filter(|entry| self.contains(*entry))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EntryPointTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.resolved()).finish()
    }
}

/// The value bound to `name` at global scope, `undefined` when unbound.
fn lookup<'js>(ctx: &Ctx<'js>, name: &'static str) -> Value<'js> {
    match ctx.globals().get::<_, Value>(name) {
        Ok(value) if !value.is_undefined() => value,
        // `let`/`const` bindings live in the global lexical scope, not on
        // the global object.
        _ => ctx
            .eval::<Value, _>(name)
            .catch(ctx)
            .unwrap_or_else(|_| Value::new_undefined(ctx.clone())),
    }
}

fn resolve_entry<'js>(ctx: &Ctx<'js>, entry: EntryPoint) -> Result<Option<Function<'js>>, Mismatch> {
    let value = lookup(ctx, entry.name());
    if value.is_undefined() {
        return Ok(None);
    }
    let function = value.into_function().ok_or(Mismatch::NotCallable)?;
    let length: u32 = function.get("length").map_err(|_| Mismatch::NotCallable)?;
    if length as usize > entry.arity() {
        return Err(Mismatch::TooManyParams(length));
    }
    Ok(Some(function))
}

/// Where a module is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Unloaded,
    Compiling,
    Ready { setup_done: bool },
    Failed,
}

impl ModuleState {
    pub fn is_ready(self) -> bool {
        matches!(self, ModuleState::Ready { .. })
    }
}

/// A compiled module. Entry points are declared first so they are released
/// before the context that owns them.
pub struct LoadedModule {
    pub entry_points: EntryPointTable,
    pub sections: SectionMap,
    pub context: Context,
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("entry_points", &self.entry_points)
            .field("sections", &self.sections.len())
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful compile: the module plus warnings about globals
/// that look like hooks but do not fit.
pub struct Compiled {
    pub module: LoadedModule,
    pub warnings: Vec<Diagnostic>,
}

/// Build a module from `source`. A failure is reported against the section
/// holding the faulting line.
pub fn compile(
    runtime: &ScriptRuntime,
    registry: &Registry,
    services: &Rc<RefCell<HostServices>>,
    source: &ScriptSource,
) -> Result<Compiled, Diagnostic> {
    let host_section = source
        .sections()
        .first()
        .map_or(DEFAULT_SECTION, |s| s.name.as_str());
    let (unit, sections) = SectionMap::link(source);
    let context = runtime
        .new_context()
        .map_err(|err| Diagnostic::new(host_section, Severity::Error, err.to_string()))?;

    let (entry_points, warnings) = context.with(|ctx| {
        registry
            .install(&ctx, services)
            .catch(&ctx)
            .map_err(|caught| {
                let fault = Fault::from_caught(caught);
                Diagnostic::new(
                    host_section,
                    Severity::Error,
                    format!("installing capabilities failed: {}", fault.message),
                )
            })?;

        tracing::debug!(sections = sections.len(), bytes = unit.len(), "evaluating module");
        ctx.eval::<(), _>(unit).catch(&ctx).map_err(|caught| {
            let fault = Fault::from_caught(caught);
            let (section, line) = sections.locate(fault.line);
            Diagnostic::new(section, Severity::Error, fault.message).at(line, fault.column)
        })?;

        let (table, mismatches) = EntryPointTable::resolve(&ctx);
        let warnings = mismatches
            .into_iter()
            .map(|(entry, mismatch)| {
                tracing::warn!(entry = entry.name(), %mismatch, "global ignored as entry point");
                Diagnostic::new(
                    entry.name(),
                    Severity::Warning,
                    format!("`{}` {mismatch}; expected {}", entry.name(), entry.signature()),
                )
            })
            .collect::<Vec<_>>();
        Ok::<_, Diagnostic>((table, warnings))
    })?;

    Ok(Compiled {
        module: LoadedModule {
            entry_points,
            sections,
            context,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rquickjs::Runtime;

    #[test]
    fn signatures_follow_the_hook_table() {
        assert_eq!(EntryPoint::Setup.signature(), "void setup()");
        assert_eq!(
            EntryPoint::MousePressed.signature(),
            "void mousePressed(float, float, int)"
        );
        assert_eq!(EntryPoint::WindowResized.signature(), "void windowResized(int, int)");
        assert_eq!(EntryPoint::ALL.len(), 10);
    }

    #[test]
    fn single_source_uses_the_default_section() {
        let source = ScriptSource::single("function draw() {}");
        assert_eq!(source.len(), 1);
        assert_eq!(source.sections()[0].name, DEFAULT_SECTION);
    }

    #[test]
    fn linked_lines_map_back_to_sections() {
        let source = ScriptSource::from_sections([
            ("a.js", "var a = 1;\nvar b = 2;"),
            ("b.js", "one();"),
            ("c.js", "\n\nthree();"),
        ]);
        let (unit, sections) = SectionMap::link(&source);
        assert_eq!(unit, "var a = 1;\nvar b = 2;\n;\none();\n;\n\n\nthree();");
        assert_eq!(sections.locate(2), ("a.js", 2));
        assert_eq!(sections.locate(4), ("b.js", 1));
        assert_eq!(sections.locate(8), ("c.js", 3));
        assert_eq!(sections.locate(0), ("a.js", 0));
        assert_eq!(SectionMap::link(&ScriptSource::default()).1.locate(3), (DEFAULT_SECTION, 3));
    }

    fn resolve(source: &str) -> (Vec<EntryPoint>, Vec<(EntryPoint, Mismatch)>) {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();
        context.with(|ctx| {
            ctx.eval::<(), _>(source).unwrap();
            let (table, mismatches) = EntryPointTable::resolve(&ctx);
            (table.resolved(), mismatches)
        })
    }

    #[test]
    fn resolves_declarations_and_lexical_bindings() {
        let (resolved, mismatches) = resolve(
            "function setup() {}\nconst draw = () => {};\nlet keyPressed = function (k) {};",
        );
        assert_eq!(
            resolved,
            vec![EntryPoint::Setup, EntryPoint::Draw, EntryPoint::KeyPressed]
        );
        assert!(mismatches.is_empty());
    }

    #[test]
    fn hooks_with_wrong_shape_are_absent() {
        let (resolved, mismatches) =
            resolve("var update = 5;\nfunction draw(a, b) {}\nfunction mouseMoved(x) {}");
        assert_eq!(resolved, vec![EntryPoint::MouseMoved]);
        assert_eq!(
            mismatches,
            vec![
                (EntryPoint::Update, Mismatch::NotCallable),
                (EntryPoint::Draw, Mismatch::TooManyParams(2)),
            ]
        );
    }
}
