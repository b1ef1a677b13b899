//! QuickJS runtime management
//!
//! One [`ScriptRuntime`] lives as long as the host. Every load gets a fresh
//! [`Context`] from it, so nothing a previous script defined survives.

use rquickjs::{Context, Runtime};
use sketch_services::settings::ScriptSettings;

pub struct ScriptRuntime {
    runtime: Runtime,
}

impl ScriptRuntime {
    pub fn new(settings: &ScriptSettings) -> rquickjs::Result<Self> {
        let runtime = Runtime::new()?;
        if settings.memory_limit_mb > 0 {
            runtime.set_memory_limit(settings.memory_limit_mb.saturating_mul(1024 * 1024));
        }
        if settings.max_stack_kb > 0 {
            runtime.set_max_stack_size(settings.max_stack_kb.saturating_mul(1024));
        }
        tracing::debug!(
            memory_limit_mb = settings.memory_limit_mb,
            max_stack_kb = settings.max_stack_kb,
            "script runtime created"
        );
        Ok(Self { runtime })
    }

    pub fn new_context(&self) -> rquickjs::Result<Context> {
        Context::full(&self.runtime)
    }

    /// Reclaim objects of contexts that have been dropped.
    pub fn collect_garbage(&self) {
        self.runtime.run_gc();
    }
}

impl std::fmt::Debug for ScriptRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRuntime").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_do_not_share_globals() {
        let runtime = ScriptRuntime::new(&ScriptSettings::default()).unwrap();
        let first = runtime.new_context().unwrap();
        first.with(|ctx| ctx.eval::<(), _>("var leaked = 1;")).unwrap();

        let second = runtime.new_context().unwrap();
        let seen: bool = second
            .with(|ctx| ctx.eval("typeof leaked !== 'undefined'"))
            .unwrap();
        assert!(!seen);
        drop(first);
        runtime.collect_garbage();
    }

    #[test]
    fn unlimited_memory_is_accepted() {
        let settings = ScriptSettings {
            memory_limit_mb: 0,
            max_stack_kb: 0,
            ..ScriptSettings::default()
        };
        assert!(ScriptRuntime::new(&settings).is_ok());
    }
}
