//! Error types for the script host

use thiserror::Error;

/// A capability could not be registered. Always a host bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("`{0}` is not a valid script identifier")]
    InvalidName(String),

    #[error("type `{0}` is declared twice")]
    DuplicateType(&'static str),

    #[error("`{signature}` references `{type_name}` before it is declared")]
    UndeclaredType {
        signature: String,
        type_name: String,
    },

    #[error("`{signature}` has the same shape as an existing overload")]
    DuplicateOverload { signature: String },

    #[error("global `{0}` is already taken")]
    DuplicateGlobal(String),

    #[error("method `{signature}` must take `{owner}` as its receiver")]
    BadReceiver { signature: String, owner: String },

    #[error("enumeration `{enumeration}` repeats member `{member}`")]
    DuplicateMember {
        enumeration: String,
        member: String,
    },
}

/// A value crossing the script boundary did not have the expected shape or
/// referred to a resource that no longer exists. Surfaces in script code as
/// a `TypeError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error("expected {expected}, got {found}")]
    Mismatch { expected: String, found: String },

    #[error("missing argument {0}")]
    MissingArgument(usize),

    #[error("{type_name}.{field} is missing or not a number")]
    Field {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("{value} is not a valid {enumeration}")]
    BadEnum { enumeration: &'static str, value: i32 },

    #[error("value is not a {0} handle")]
    ForeignHandle(&'static str),

    #[error("{0} handle belongs to a previous script")]
    StaleHandle(&'static str),

    #[error("{0} handle does not refer to a live object")]
    InvalidHandle(&'static str),
}

impl MarshalError {
    pub fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        MarshalError::Mismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Raise as a script-side `TypeError`.
    pub fn throw(&self, ctx: &rquickjs::Ctx<'_>) -> rquickjs::Error {
        rquickjs::Exception::throw_type(ctx, &self.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("capability registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("script engine error: {0}")]
    Engine(#[from] rquickjs::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_errors_read_naturally() {
        let err = MarshalError::mismatch("Vec2", "number");
        assert_eq!(err.to_string(), "expected Vec2, got number");
        assert_eq!(
            MarshalError::StaleHandle("Image").to_string(),
            "Image handle belongs to a previous script"
        );
    }

    #[test]
    fn registration_error_converts_into_script_error() {
        let err: ScriptError = RegistrationError::DuplicateGlobal("PI".into()).into();
        assert!(matches!(err, ScriptError::Registration(_)));
    }
}
