//! Script host
//!
//! [`ScriptHost`] is the one object an embedding environment talks to. It
//! owns the capability registry, the QuickJS runtime, the native services
//! capabilities act on, the current module and its diagnostics.
//!
//! ```ignore
//! let mut host = ScriptHost::new(&Settings::default())?;
//! if !host.load_script("function draw() { clear(0.2); }") {
//!     eprintln!("{}", host.last_error());
//! }
//! loop {
//!     host.frame();
//!     present(host.take_frame());
//! }
//! ```

use crate::arena::ArenaStats;
use crate::diagnostics::{Diagnostic, DiagnosticLog, Severity};
use crate::dispatch::{self, Fault, HookArgs};
use crate::error::ScriptError;
use crate::handle::ResourceKind;
use crate::loader::{self, EntryPoint, LoadedModule, ModuleState, ScriptSource};
use crate::registry::Registry;
use crate::runtime::ScriptRuntime;
use crate::services::HostServices;
use sketch_audio::Sound;
use sketch_core::math::{Color, Vec2};
use sketch_metrics::HookProfiler;
use sketch_render::Frame;
use sketch_services::Settings;
use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;

const IDLE_MESSAGE: &str = "Waiting for script...";
const FALLBACK_ERROR: &str = "script failed to load";
const PROFILER_WINDOW: usize = 120;

pub struct ScriptHost {
    // Released before the runtime below.
    module: Option<LoadedModule>,
    registry: Registry,
    services: Rc<RefCell<HostServices>>,
    diagnostics: DiagnosticLog,
    state: ModuleState,
    pending: Option<ScriptSource>,
    profiler: HookProfiler,
    runtime: ScriptRuntime,
}

impl ScriptHost {
    /// Build the capability surface and an engine. Fails only on a
    /// registration bug or when QuickJS cannot start.
    pub fn new(settings: &Settings) -> Result<Self, ScriptError> {
        let registry = Registry::build()?;
        let runtime = ScriptRuntime::new(&settings.script)?;
        tracing::info!(
            capabilities = registry.len(),
            types = registry.type_names().len(),
            "script host ready"
        );
        Ok(Self {
            module: None,
            registry,
            services: Rc::new(RefCell::new(HostServices::new(settings))),
            diagnostics: DiagnosticLog::new(settings.script.max_diagnostics),
            state: ModuleState::Unloaded,
            pending: None,
            profiler: HookProfiler::new(PROFILER_WINDOW),
            runtime,
        })
    }

    // Loading

    /// Replace the current module with `source` as a single section.
    pub fn load_script(&mut self, source: &str) -> bool {
        self.load(ScriptSource::single(source))
    }

    /// Replace the current module with ordered `(name, source)` sections.
    pub fn load_sections<N, S>(&mut self, sections: impl IntoIterator<Item = (N, S)>) -> bool
    where
        N: Into<String>,
        S: Into<String>,
    {
        self.load(ScriptSource::from_sections(sections))
    }

    /// Read each file as one section named after the file.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> bool {
        let mut source = ScriptSource::default();
        let mut unreadable = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            match std::fs::read_to_string(path) {
                Ok(text) => source.push(name, text),
                Err(err) => {
                    tracing::error!(path = %path.display(), %err, "cannot read script file");
                    unreadable.push(Diagnostic::new(
                        name,
                        Severity::Error,
                        format!("cannot read file: {err}"),
                    ));
                }
            }
        }

        if unreadable.is_empty() {
            return self.load(source);
        }
        self.pending = None;
        self.unload();
        for diagnostic in unreadable {
            self.diagnostics.push(diagnostic);
        }
        self.state = ModuleState::Failed;
        false
    }

    /// Tear down the current module and build a new one from `source`.
    /// Returns whether the new module is ready to run.
    pub fn load(&mut self, source: ScriptSource) -> bool {
        self.pending = None;
        self.unload();
        self.state = ModuleState::Compiling;

        match loader::compile(&self.runtime, &self.registry, &self.services, &source) {
            Ok(compiled) => {
                let resolved = compiled.module.entry_points.resolved();
                tracing::info!(
                    sections = source.len(),
                    entry_points = ?resolved.iter().map(|e| e.name()).collect::<Vec<_>>(),
                    "script loaded"
                );
                for warning in compiled.warnings {
                    self.diagnostics.push(warning);
                }
                self.module = Some(compiled.module);
                self.state = ModuleState::Ready { setup_done: false };
                true
            }
            Err(diagnostic) => {
                tracing::error!(
                    section = %diagnostic.section,
                    line = diagnostic.line,
                    column = diagnostic.column,
                    "script failed to compile: {}",
                    diagnostic.message
                );
                self.diagnostics.push(diagnostic);
                self.state = ModuleState::Failed;
                false
            }
        }
    }

    /// Queue `source` to replace the module at the next frame boundary.
    /// A later request replaces an earlier one.
    pub fn request_reload(&mut self, source: impl Into<ScriptSource>) {
        self.pending = Some(source.into());
    }

    pub fn has_pending_reload(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a queued reload, if any. `None` when nothing was queued.
    pub fn apply_pending_reload(&mut self) -> Option<bool> {
        let source = self.pending.take()?;
        Some(self.load(source))
    }

    /// Drop the module, destroy every resource it created and forget its
    /// diagnostics.
    pub fn unload(&mut self) {
        let had_module = self.module.take().is_some();
        let destroyed = self.services.borrow_mut().reset_for_reload();
        self.runtime.collect_garbage();
        self.diagnostics.clear();
        self.state = ModuleState::Unloaded;
        if had_module || destroyed > 0 {
            tracing::debug!(destroyed, "module unloaded");
        }
    }

    // Queries

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Every error of the current batch, one per line. Empty after a clean
    /// load.
    pub fn last_error(&self) -> String {
        let text = self.diagnostics.last_error();
        if text.is_empty() && self.state == ModuleState::Failed {
            return FALLBACK_ERROR.to_string();
        }
        text
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn resolved_entry_points(&self) -> Vec<EntryPoint> {
        self.module
            .as_ref()
            .map(|module| module.entry_points.resolved())
            .unwrap_or_default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Signature of every registered capability.
    pub fn capabilities(&self) -> Vec<String> {
        self.registry.signatures()
    }

    pub fn services(&self) -> Ref<'_, HostServices> {
        self.services.borrow()
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.services.borrow().arena.stats()
    }

    pub fn resource_count(&self, kind: ResourceKind) -> usize {
        self.services.borrow().arena.count(kind)
    }

    /// Precondition faults the drawing library has absorbed so far.
    pub fn render_faults(&self) -> u64 {
        self.services.borrow().renderer.fault_count()
    }

    pub fn profiler(&self) -> &HookProfiler {
        &self.profiler
    }

    // Frame driving

    /// Run `setup` if it has not run for the current module. A faulting
    /// `setup` still counts as run.
    pub fn call_setup(&mut self) {
        if let ModuleState::Ready { setup_done: false } = self.state {
            self.state = ModuleState::Ready { setup_done: true };
            self.invoke(EntryPoint::Setup, HookArgs::None);
        }
    }

    /// Advance the frame clock and run `update`.
    pub fn call_update(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.services.borrow_mut().clock.tick();
        self.call_setup();
        self.invoke(EntryPoint::Update, HookArgs::None);
    }

    pub fn call_draw(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.call_setup();
        self.invoke(EntryPoint::Draw, HookArgs::None);
    }

    /// One frame: apply a queued reload, then `update` and `draw`. Returns
    /// whether a module is running.
    pub fn frame(&mut self) -> bool {
        self.apply_pending_reload();
        self.call_update();
        self.call_draw();
        self.is_ready()
    }

    /// Placeholder frame for when no module is running.
    pub fn draw_idle_screen(&mut self) {
        let mut services = self.services.borrow_mut();
        services.renderer.clear(Color::gray(0.12));
        services.renderer.set_color(Color::gray(0.5));
        services.renderer.draw_text(IDLE_MESSAGE, Vec2::new(20.0, 30.0));
    }

    /// Drain the draw commands recorded since the last call.
    pub fn take_frame(&mut self) -> Frame {
        self.services.borrow_mut().renderer.take_frame()
    }

    /// Mix every playing sound into interleaved stereo `out`.
    pub fn render_audio(&mut self, out: &mut [f32]) {
        let mut guard = self.services.borrow_mut();
        let services = &mut *guard;
        services.mixer.mix(services.arena.iter_mut::<Sound>(), out);
    }

    // Events

    pub fn mouse_pressed(&mut self, x: f32, y: f32, button: i32) {
        self.services.borrow_mut().input.press_button(x, y, button);
        self.invoke_event(EntryPoint::MousePressed, HookArgs::Pointer { x, y, button });
    }

    pub fn mouse_released(&mut self, x: f32, y: f32, button: i32) {
        self.services.borrow_mut().input.release_button(x, y, button);
        self.invoke_event(EntryPoint::MouseReleased, HookArgs::Pointer { x, y, button });
    }

    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        self.services.borrow_mut().input.move_to(x, y);
        self.invoke_event(EntryPoint::MouseMoved, HookArgs::Position { x, y });
    }

    pub fn mouse_dragged(&mut self, x: f32, y: f32, button: i32) {
        self.services.borrow_mut().input.move_to(x, y);
        self.invoke_event(EntryPoint::MouseDragged, HookArgs::Pointer { x, y, button });
    }

    /// Tracked for queries only; scripts have no wheel hook.
    pub fn mouse_scrolled(&mut self, dx: f32, dy: f32) {
        self.services.borrow_mut().input.scroll(dx, dy);
    }

    pub fn key_pressed(&mut self, key: i32) {
        self.services.borrow_mut().input.press_key(key);
        self.invoke_event(EntryPoint::KeyPressed, HookArgs::Key(key));
    }

    pub fn key_released(&mut self, key: i32) {
        self.services.borrow_mut().input.release_key(key);
        self.invoke_event(EntryPoint::KeyReleased, HookArgs::Key(key));
    }

    pub fn window_resized(&mut self, width: i32, height: i32) {
        self.services
            .borrow_mut()
            .renderer
            .set_viewport(width.max(1) as u32, height.max(1) as u32);
        self.invoke_event(EntryPoint::WindowResized, HookArgs::Size { width, height });
    }

    // Dispatch

    /// Events reach a module only once its `setup` has run.
    fn invoke_event(&mut self, entry: EntryPoint, args: HookArgs) {
        if self.state == (ModuleState::Ready { setup_done: true }) {
            self.invoke(entry, args);
        }
    }

    fn invoke(&mut self, entry: EntryPoint, args: HookArgs) {
        let Some(module) = &self.module else {
            return;
        };
        let Some(function) = module.entry_points.get(entry) else {
            return;
        };
        let result = self.profiler.time(entry.name(), || {
            module
                .context
                .with(|ctx| dispatch::invoke(&ctx, function, args))
        });
        if let Err(mut fault) = result {
            let (section, line) = module.sections.locate(fault.line);
            let origin = (module.sections.len() > 1).then(|| section.to_string());
            if fault.line > 0 {
                fault.line = line;
            }
            self.record_fault(entry, fault, origin);
        }
    }

    /// `origin` names the section the fault came from when the module has
    /// more than one.
    fn record_fault(&mut self, entry: EntryPoint, mut fault: Fault, origin: Option<String>) {
        if !entry.is_lifecycle() {
            tracing::debug!(hook = entry.name(), %fault, "event hook faulted");
            return;
        }
        if let Some(section) = origin {
            fault.message = format!("{} [{section}]", fault.message);
        }
        tracing::warn!(
            hook = entry.name(),
            line = fault.line,
            column = fault.column,
            "script fault: {}",
            fault.message
        );
        self.diagnostics.push(
            Diagnostic::new(entry.name(), Severity::Exception, fault.message).at(fault.line, fault.column),
        );
    }
}

impl Drop for ScriptHost {
    fn drop(&mut self) {
        self.unload();
    }
}

impl std::fmt::Debug for ScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptHost")
            .field("state", &self.state)
            .field("module", &self.module)
            .field("diagnostics", &self.diagnostics.len())
            .field("pending_reload", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> ScriptHost {
        let mut settings = Settings::default();
        settings.script.random_seed = Some(7);
        settings.script.fixed_timestep = Some(1.0 / 60.0);
        ScriptHost::new(&settings).unwrap()
    }

    #[test]
    fn starts_unloaded_and_idle() {
        let mut host = host();
        assert_eq!(host.state(), ModuleState::Unloaded);
        assert!(!host.frame());
        assert!(host.last_error().is_empty());

        host.draw_idle_screen();
        let frame = host.take_frame();
        assert_eq!(frame.texts().collect::<Vec<_>>(), vec![IDLE_MESSAGE]);
    }

    #[test]
    fn setup_runs_once() {
        let mut host = host();
        assert!(host.load_script(
            "var runs = 0;\nfunction setup() { runs++; }\nfunction draw() { clear(runs / 10); }"
        ));
        host.call_setup();
        host.frame();
        host.frame();
        assert_eq!(host.state(), ModuleState::Ready { setup_done: true });
        assert_eq!(host.take_frame().clear_color(), Some(Color::gray(0.1)));
        assert_eq!(host.profiler().report().is_empty(), !cfg!(feature = "metrics"));
    }

    #[test]
    fn events_wait_for_setup() {
        let mut host = host();
        assert!(host.load_script(
            "var presses = 0;\nfunction mousePressed(x, y, b) { presses++; }\nfunction draw() { if (presses > 0) clear(1, 0, 0); }"
        ));
        host.mouse_pressed(1.0, 1.0, 0);
        host.frame();
        assert_eq!(host.take_frame().clear_color(), None);

        host.mouse_pressed(1.0, 1.0, 0);
        host.frame();
        assert_eq!(host.take_frame().clear_color(), Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn failed_load_falls_back_to_generic_message() {
        let mut host = host();
        assert!(host.load_script("function draw() {}"));
        host.state = ModuleState::Failed;
        host.diagnostics.clear();
        assert_eq!(host.last_error(), FALLBACK_ERROR);
    }

    #[test]
    fn mismatched_hooks_warn_without_failing() {
        let mut host = host();
        assert!(host.load_script("var draw = 3;"));
        assert!(host.last_error().is_empty());
        assert!(host.diagnostics().has_severity(Severity::Warning));
        assert!(host.resolved_entry_points().is_empty());
    }
}
