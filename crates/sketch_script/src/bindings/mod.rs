//! Capability bindings
//!
//! Each submodule registers one area of the script API. Thunks are produced
//! by [`bind_fn!`] and [`bind_method!`] from a typed closure-like body:
//!
//! ```ignore
//! bind_fn!(reg, "drawCircle", |s, x: f32, y: f32, r: f32| -> () {
//!     s.renderer.draw_circle(Vec2::new(x, y), r);
//! });
//! ```
//!
//! The parameter list doubles as the descriptor's signature, so the script
//! surface and the native call can never drift apart. Inside a body `?`
//! works on [`MarshalError`](crate::error::MarshalError), which is raised in
//! script code as a `TypeError`.

use crate::error::RegistrationError;
use crate::handle::ResourceKind;
use crate::marshal::ValueKind;
use crate::registry::Registry;

macro_rules! thunk {
    (|$s:ident $(, $arg:ident : $ty:ty)*| -> $ret:ty $body:block) => {
        move |ctx, args, $s| {
            #[allow(unused_mut, unused_variables)]
            let mut cursor = $crate::marshal::ArgCursor::new(args);
            $(
                let $arg: $ty = cursor.take().map_err(|e| e.throw(ctx))?;
            )*
            let _ = &$s;
            let out: ::std::result::Result<$ret, $crate::error::MarshalError> =
                $crate::marshal::guard(|| Ok($body));
            let out = out.map_err(|e| e.throw(ctx))?;
            $crate::marshal::IntoScript::into_script(out, ctx)
        }
    };
}

macro_rules! bind_fn {
    ($reg:expr, $name:literal, |$s:ident $(, $arg:ident : $ty:ty)*| -> $ret:ty $body:block) => {
        $reg.function(
            $name,
            &[$(<$ty as $crate::marshal::FromScript>::PARAM),*],
            <$ret as $crate::marshal::IntoScript>::RETURN,
            thunk!(|$s $(, $arg: $ty)*| -> $ret $body),
        )?
    };
}

/// The first parameter is the receiver (`this`).
macro_rules! bind_method {
    ($reg:expr, $owner:literal, $name:literal, |$s:ident $(, $arg:ident : $ty:ty)*| -> $ret:ty $body:block) => {
        $reg.method(
            $owner,
            $name,
            &[$(<$ty as $crate::marshal::FromScript>::PARAM),*],
            <$ret as $crate::marshal::IntoScript>::RETURN,
            thunk!(|$s $(, $arg: $ty)*| -> $ret $body),
        )?
    };
}

mod audio;
mod camera;
mod constants;
mod environment;
mod geometry;
mod graphics;
mod math;
mod resources;
mod transform;
mod tween;
mod types;
mod utility;

/// Register the complete surface. Types and enumerations go first so every
/// signature that mentions them finds them declared.
pub fn register_all(reg: &mut Registry) -> Result<(), RegistrationError> {
    for kind in ValueKind::ALL {
        reg.declare_value_type(kind)?;
    }
    for kind in ResourceKind::ALL {
        reg.declare_resource_type(kind)?;
    }
    constants::register(reg)?;
    types::register(reg)?;
    graphics::register(reg)?;
    transform::register(reg)?;
    environment::register(reg)?;
    math::register(reg)?;
    utility::register(reg)?;
    resources::register(reg)?;
    geometry::register(reg)?;
    camera::register(reg)?;
    tween::register(reg)?;
    audio::register(reg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_surface_registers() {
        let registry = Registry::build().unwrap();
        let signatures = registry.signatures();
        for expected in [
            "void clear(float)",
            "void clear(float, float, float)",
            "void clear(float, float, float, float)",
            "void clear(Color)",
            "void drawRect(Rect)",
            "Image createImage()",
            "bool Image.load(string)",
            "Sound ChipBundle.build()",
            "void Mesh.addVertices(Vec3[])",
            "void setStrokeCap(StrokeCap)",
            "float ease(float, EaseType, EaseMode)",
            "Vec2 Vec2.add(Vec2)",
        ] {
            assert!(
                signatures.iter().any(|s| s == expected),
                "missing `{expected}`"
            );
        }
    }

    #[test]
    fn every_resource_kind_has_a_factory() {
        let registry = Registry::build().unwrap();
        for kind in ResourceKind::ALL {
            let factory = format!("create{}", kind.name());
            assert!(
                registry
                    .descriptors()
                    .iter()
                    .any(|d| d.owner.is_none() && d.name == factory),
                "no {factory}"
            );
        }
    }

    #[test]
    fn prelude_has_namespaced_round() {
        let registry = Registry::build().unwrap();
        let prelude = registry.prelude();
        assert!(prelude.contains("const StrokeCap = Object.freeze({ Butt: 0, Round: 1, Square: 2 });"));
        assert!(prelude.contains("const StrokeJoin = Object.freeze({ Miter: 0, Round: 1, Bevel: 2 });"));
        assert!(prelude.contains("const PI = "));
    }
}
