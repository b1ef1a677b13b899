use crate::error::RegistrationError;
use crate::registry::Registry;

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "print", |s, text: String| -> () {
        tracing::info!(target: "sketch::script", "{text}")
    });
    bind_fn!(reg, "print", |s, value: f64| -> () {
        tracing::info!(target: "sketch::script", "{value}")
    });
    bind_fn!(reg, "print", |s, value: bool| -> () {
        tracing::info!(target: "sketch::script", "{value}")
    });
    bind_fn!(reg, "log", |s, text: String| -> () {
        tracing::info!(target: "sketch::script", "{text}")
    });
    Ok(())
}
