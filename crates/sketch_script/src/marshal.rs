//! Marshaling layer
//!
//! Converts between QuickJS values and the native types capabilities are
//! written against. Every parameter type implements [`FromScript`], every
//! return type [`IntoScript`]; both carry a [`TypeSpec`] so the registry can
//! describe and overload-match a capability without calling it.
//!
//! Value types travel as plain objects whose prototype carries a `__type`
//! tag. Resource handles travel as objects holding the packed handle bits in
//! `__handle`.

use crate::arena::Resource;
use crate::error::MarshalError;
use crate::handle::{Handle, RawHandle, ResourceKind};
use rquickjs::{Array, Ctx, IntoJs, Object, Value};
use sketch_audio::Waveform;
use sketch_core::easing::{EaseMode, EaseType};
use sketch_core::math::{Color, Mat4, Quat, Rect, Vec2, Vec3};
use sketch_render::{Direction, PrimitiveMode, StrokeCap, StrokeJoin};
use std::fmt;

/// Global holding one prototype object per registered type.
pub const TYPES_GLOBAL: &str = "__sketch_types";
/// Type tag stored on every prototype.
pub const TYPE_TAG: &str = "__type";
/// Packed [`RawHandle`] bits on resource objects.
pub const HANDLE_FIELD: &str = "__handle";

/// Small copyable types passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Vec2,
    Vec3,
    Color,
    Rect,
    Mat4,
    Quat,
}

impl ValueKind {
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Vec2,
        ValueKind::Vec3,
        ValueKind::Color,
        ValueKind::Rect,
        ValueKind::Mat4,
        ValueKind::Quat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Vec2 => "Vec2",
            ValueKind::Vec3 => "Vec3",
            ValueKind::Color => "Color",
            ValueKind::Rect => "Rect",
            ValueKind::Mat4 => "Mat4",
            ValueKind::Quat => "Quat",
        }
    }
}

/// Element type of an array parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemType {
    Int,
    Float,
    Value(ValueKind),
}

impl ElemType {
    fn accepts(self, value: &Value<'_>) -> bool {
        match self {
            ElemType::Int | ElemType::Float => value.as_number().is_some(),
            ElemType::Value(kind) => tag_of(value).as_deref() == Some(kind.name()),
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElemType::Int => f.write_str("int"),
            ElemType::Float => f.write_str("float"),
            ElemType::Value(kind) => f.write_str(kind.name()),
        }
    }
}

/// Script-visible type of a parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    Void,
    Bool,
    Int,
    Float,
    Str,
    /// Integer member of a named enumeration.
    Enum(&'static str),
    Value(ValueKind),
    Resource(ResourceKind),
    Array(ElemType),
}

/// What a [`TypeSpec`] looks like to JavaScript. Two specs with the same
/// shape cannot be told apart at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Void,
    Bool,
    Number,
    Str,
    Object(&'static str),
    NumberArray,
    ObjectArray(&'static str),
}

impl TypeSpec {
    fn shape(self) -> Shape {
        match self {
            TypeSpec::Void => Shape::Void,
            TypeSpec::Bool => Shape::Bool,
            TypeSpec::Int | TypeSpec::Float | TypeSpec::Enum(_) => Shape::Number,
            TypeSpec::Str => Shape::Str,
            TypeSpec::Value(kind) => Shape::Object(kind.name()),
            TypeSpec::Resource(kind) => Shape::Object(kind.name()),
            TypeSpec::Array(ElemType::Int | ElemType::Float) => Shape::NumberArray,
            TypeSpec::Array(ElemType::Value(kind)) => Shape::ObjectArray(kind.name()),
        }
    }

    pub fn same_shape(self, other: TypeSpec) -> bool {
        self.shape() == other.shape()
    }

    /// Named type this spec depends on being declared, if any.
    pub fn type_dependency(self) -> Option<&'static str> {
        match self {
            TypeSpec::Value(kind) | TypeSpec::Array(ElemType::Value(kind)) => Some(kind.name()),
            TypeSpec::Resource(kind) => Some(kind.name()),
            _ => None,
        }
    }

    pub fn accepts(self, value: &Value<'_>) -> bool {
        match self {
            TypeSpec::Void => false,
            TypeSpec::Bool => value.is_bool(),
            TypeSpec::Int | TypeSpec::Float | TypeSpec::Enum(_) => value.as_number().is_some(),
            TypeSpec::Str => value.is_string(),
            TypeSpec::Value(kind) => tag_of(value).as_deref() == Some(kind.name()),
            TypeSpec::Resource(kind) => tag_of(value).as_deref() == Some(kind.name()),
            TypeSpec::Array(elem) => value.as_array().is_some_and(|array| {
                (0..array.len()).all(|i| {
                    array
                        .get::<Value>(i)
                        .is_ok_and(|element| elem.accepts(&element))
                })
            }),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Void => f.write_str("void"),
            TypeSpec::Bool => f.write_str("bool"),
            TypeSpec::Int => f.write_str("int"),
            TypeSpec::Float => f.write_str("float"),
            TypeSpec::Str => f.write_str("string"),
            TypeSpec::Enum(name) => f.write_str(name),
            TypeSpec::Value(kind) => f.write_str(kind.name()),
            TypeSpec::Resource(kind) => f.write_str(kind.name()),
            TypeSpec::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

/// Extract a native argument from a script value.
pub trait FromScript: Sized {
    const PARAM: TypeSpec;

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError>;
}

/// Hand a native result back to script code.
pub trait IntoScript {
    const RETURN: TypeSpec;

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>>;
}

/// Rough type name for error messages.
pub fn describe(value: &Value<'_>) -> String {
    if let Some(tag) = tag_of(value) {
        return tag;
    }
    let name = if value.is_undefined() {
        "undefined"
    } else if value.is_null() {
        "null"
    } else if value.is_bool() {
        "bool"
    } else if value.as_number().is_some() {
        "number"
    } else if value.is_string() {
        "string"
    } else if value.is_array() {
        "array"
    } else if value.is_function() {
        "function"
    } else {
        "object"
    };
    name.to_string()
}

/// The `__type` tag of a value-type or resource object.
pub fn tag_of(value: &Value<'_>) -> Option<String> {
    value
        .as_object()
        .and_then(|object| object.get::<_, Option<String>>(TYPE_TAG).ok().flatten())
}

/// New empty object whose prototype is the registered prototype of
/// `type_name`.
pub fn typed_object<'js>(ctx: &Ctx<'js>, type_name: &'static str) -> rquickjs::Result<Object<'js>> {
    let types: Object = ctx.globals().get(TYPES_GLOBAL)?;
    let proto: Object = types.get(type_name)?;
    let object = Object::new(ctx.clone())?;
    object.set_prototype(Some(&proto))?;
    Ok(object)
}

/// Positional cursor over a call's arguments.
pub struct ArgCursor<'a, 'js> {
    values: &'a [Value<'js>],
    next: usize,
}

impl<'a, 'js> ArgCursor<'a, 'js> {
    pub fn new(values: &'a [Value<'js>]) -> Self {
        Self { values, next: 0 }
    }

    pub fn take<T: FromScript>(&mut self) -> Result<T, MarshalError> {
        let position = self.next;
        self.next += 1;
        let value = self
            .values
            .get(position)
            .ok_or(MarshalError::MissingArgument(position))?;
        T::from_script(value)
    }
}

/// Run a capability body, keeping `?` on [`MarshalError`] inside it.
pub fn guard<T>(body: impl FnOnce() -> Result<T, MarshalError>) -> Result<T, MarshalError> {
    body()
}

fn number(value: &Value<'_>, expected: &'static str) -> Result<f64, MarshalError> {
    value
        .as_number()
        .ok_or_else(|| MarshalError::mismatch(expected, describe(value)))
}

impl FromScript for bool {
    const PARAM: TypeSpec = TypeSpec::Bool;

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        value
            .as_bool()
            .ok_or_else(|| MarshalError::mismatch("bool", describe(value)))
    }
}

impl FromScript for f64 {
    const PARAM: TypeSpec = TypeSpec::Float;

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        number(value, "float")
    }
}

impl FromScript for f32 {
    const PARAM: TypeSpec = TypeSpec::Float;

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        Ok(number(value, "float")? as f32)
    }
}

impl FromScript for i32 {
    const PARAM: TypeSpec = TypeSpec::Int;

    // Truncates toward zero and saturates, like a C cast.
    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        Ok(number(value, "int")? as i32)
    }
}

impl FromScript for u32 {
    const PARAM: TypeSpec = TypeSpec::Int;

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        Ok(number(value, "int")?.max(0.0) as u32)
    }
}

impl FromScript for String {
    const PARAM: TypeSpec = TypeSpec::Str;

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        value
            .as_string()
            .and_then(|text| text.to_string().ok())
            .ok_or_else(|| MarshalError::mismatch("string", describe(value)))
    }
}

fn tagged<'a, 'js>(value: &'a Value<'js>, kind: ValueKind) -> Result<&'a Object<'js>, MarshalError> {
    match value.as_object() {
        Some(object) if tag_of(value).as_deref() == Some(kind.name()) => Ok(object),
        _ => Err(MarshalError::mismatch(kind.name(), describe(value))),
    }
}

fn read_fields<const N: usize>(
    value: &Value<'_>,
    kind: ValueKind,
    fields: [&'static str; N],
) -> Result<[f32; N], MarshalError> {
    let object = tagged(value, kind)?;
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = object
            .get::<_, Value>(field)
            .ok()
            .and_then(|v| v.as_number())
            .ok_or(MarshalError::Field {
                type_name: kind.name(),
                field,
            })? as f32;
    }
    Ok(out)
}

fn write_fields<'js, const N: usize>(
    ctx: &Ctx<'js>,
    kind: ValueKind,
    fields: [&'static str; N],
    values: [f32; N],
) -> rquickjs::Result<Value<'js>> {
    let object = typed_object(ctx, kind.name())?;
    for (field, value) in fields.into_iter().zip(values) {
        object.set(field, f64::from(value))?;
    }
    Ok(object.into_value())
}

const VEC2: [&str; 2] = ["x", "y"];
const VEC3: [&str; 3] = ["x", "y", "z"];
const COLOR: [&str; 4] = ["r", "g", "b", "a"];
const RECT: [&str; 4] = ["x", "y", "width", "height"];
const QUAT: [&str; 4] = ["x", "y", "z", "w"];
/// Column-major elements of a `Mat4`, as an array.
const MAT4_FIELD: &str = "m";

impl FromScript for Vec2 {
    const PARAM: TypeSpec = TypeSpec::Value(ValueKind::Vec2);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        read_fields(value, ValueKind::Vec2, VEC2).map(Vec2::from_array)
    }
}

impl IntoScript for Vec2 {
    const RETURN: TypeSpec = TypeSpec::Value(ValueKind::Vec2);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        write_fields(ctx, ValueKind::Vec2, VEC2, self.to_array())
    }
}

impl FromScript for Vec3 {
    const PARAM: TypeSpec = TypeSpec::Value(ValueKind::Vec3);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        read_fields(value, ValueKind::Vec3, VEC3).map(Vec3::from_array)
    }
}

impl IntoScript for Vec3 {
    const RETURN: TypeSpec = TypeSpec::Value(ValueKind::Vec3);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        write_fields(ctx, ValueKind::Vec3, VEC3, self.to_array())
    }
}

impl FromScript for Color {
    const PARAM: TypeSpec = TypeSpec::Value(ValueKind::Color);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        let [r, g, b, a] = read_fields(value, ValueKind::Color, COLOR)?;
        Ok(Color::new(r, g, b, a))
    }
}

impl IntoScript for Color {
    const RETURN: TypeSpec = TypeSpec::Value(ValueKind::Color);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        write_fields(ctx, ValueKind::Color, COLOR, [self.r, self.g, self.b, self.a])
    }
}

impl FromScript for Rect {
    const PARAM: TypeSpec = TypeSpec::Value(ValueKind::Rect);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        let [x, y, width, height] = read_fields(value, ValueKind::Rect, RECT)?;
        Ok(Rect::new(x, y, width, height))
    }
}

impl IntoScript for Rect {
    const RETURN: TypeSpec = TypeSpec::Value(ValueKind::Rect);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        write_fields(ctx, ValueKind::Rect, RECT, [self.x, self.y, self.width, self.height])
    }
}

impl FromScript for Quat {
    const PARAM: TypeSpec = TypeSpec::Value(ValueKind::Quat);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        read_fields(value, ValueKind::Quat, QUAT).map(Quat::from_array)
    }
}

impl IntoScript for Quat {
    const RETURN: TypeSpec = TypeSpec::Value(ValueKind::Quat);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        write_fields(ctx, ValueKind::Quat, QUAT, self.to_array())
    }
}

impl FromScript for Mat4 {
    const PARAM: TypeSpec = TypeSpec::Value(ValueKind::Mat4);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        let field = MarshalError::Field {
            type_name: "Mat4",
            field: MAT4_FIELD,
        };
        let object = tagged(value, ValueKind::Mat4)?;
        let elements: Array = object.get(MAT4_FIELD).map_err(|_| field.clone())?;
        if elements.len() != 16 {
            return Err(field);
        }
        let mut cols = [0.0f32; 16];
        for (i, slot) in cols.iter_mut().enumerate() {
            *slot = elements
                .get::<Value>(i)
                .ok()
                .and_then(|v| v.as_number())
                .ok_or_else(|| field.clone())? as f32;
        }
        Ok(Mat4::from_cols_array(&cols))
    }
}

impl IntoScript for Mat4 {
    const RETURN: TypeSpec = TypeSpec::Value(ValueKind::Mat4);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        let object = typed_object(ctx, "Mat4")?;
        let elements = Array::new(ctx.clone())?;
        for (i, value) in self.to_cols_array().into_iter().enumerate() {
            elements.set(i, f64::from(value))?;
        }
        object.set(MAT4_FIELD, elements)?;
        Ok(object.into_value())
    }
}

impl<T: Resource> FromScript for Handle<T> {
    const PARAM: TypeSpec = TypeSpec::Resource(T::KIND);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        let foreign = || MarshalError::ForeignHandle(T::KIND.name());
        if tag_of(value).as_deref() != Some(T::KIND.name()) {
            return Err(foreign());
        }
        let bits = value
            .as_object()
            .and_then(|object| object.get::<_, Value>(HANDLE_FIELD).ok())
            .and_then(|v| v.as_number())
            .ok_or_else(foreign)?;
        RawHandle::from_f64(bits)
            .and_then(Handle::from_raw)
            .ok_or_else(foreign)
    }
}

impl<T: Resource> IntoScript for Handle<T> {
    const RETURN: TypeSpec = TypeSpec::Resource(T::KIND);

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        let object = typed_object(ctx, T::KIND.name())?;
        object.set(HANDLE_FIELD, self.raw().to_f64())?;
        Ok(object.into_value())
    }
}

fn elements<'js, T>(
    value: &Value<'js>,
    expected: &'static str,
    mut convert: impl FnMut(&Value<'js>) -> Result<T, MarshalError>,
) -> Result<Vec<T>, MarshalError> {
    let array = value
        .as_array()
        .ok_or_else(|| MarshalError::mismatch(expected, describe(value)))?;
    let mut out = Vec::with_capacity(array.len());
    for i in 0..array.len() {
        let element: Value = array
            .get(i)
            .map_err(|_| MarshalError::mismatch(expected, "sparse array"))?;
        out.push(convert(&element)?);
    }
    Ok(out)
}

impl FromScript for Vec<f32> {
    const PARAM: TypeSpec = TypeSpec::Array(ElemType::Float);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        elements(value, "float[]", f32::from_script)
    }
}

impl FromScript for Vec<u32> {
    const PARAM: TypeSpec = TypeSpec::Array(ElemType::Int);

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        elements(value, "int[]", u32::from_script)
    }
}

impl FromScript for Vec<Vec3> {
    const PARAM: TypeSpec = TypeSpec::Array(ElemType::Value(ValueKind::Vec3));

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        elements(value, "Vec3[]", Vec3::from_script)
    }
}

impl FromScript for Vec<Color> {
    const PARAM: TypeSpec = TypeSpec::Array(ElemType::Value(ValueKind::Color));

    fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
        elements(value, "Color[]", Color::from_script)
    }
}

impl IntoScript for Vec<Vec3> {
    const RETURN: TypeSpec = TypeSpec::Array(ElemType::Value(ValueKind::Vec3));

    fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
        let array = Array::new(ctx.clone())?;
        for (i, v) in self.into_iter().enumerate() {
            array.set(i, v.into_script(ctx)?)?;
        }
        Ok(array.into_value())
    }
}

macro_rules! scalar_return {
    ($($ty:ty => $spec:expr, |$v:ident| $convert:expr;)*) => {$(
        impl IntoScript for $ty {
            const RETURN: TypeSpec = $spec;

            fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
                let $v = self;
                $convert.into_js(ctx)
            }
        }
    )*};
}

scalar_return! {
    () => TypeSpec::Void, |v| v;
    bool => TypeSpec::Bool, |v| v;
    i32 => TypeSpec::Int, |v| v;
    u32 => TypeSpec::Int, |v| f64::from(v);
    u64 => TypeSpec::Int, |v| v as f64;
    usize => TypeSpec::Int, |v| v as f64;
    f32 => TypeSpec::Float, |v| f64::from(v);
    f64 => TypeSpec::Float, |v| v;
    String => TypeSpec::Str, |v| v;
}

macro_rules! enum_marshal {
    ($($ty:ty => $name:literal,)*) => {$(
        impl FromScript for $ty {
            const PARAM: TypeSpec = TypeSpec::Enum($name);

            fn from_script(value: &Value<'_>) -> Result<Self, MarshalError> {
                let index = i32::from_script(value)?;
                <$ty>::from_index(index).ok_or(MarshalError::BadEnum {
                    enumeration: $name,
                    value: index,
                })
            }
        }

        impl IntoScript for $ty {
            const RETURN: TypeSpec = TypeSpec::Enum($name);

            fn into_script<'js>(self, ctx: &Ctx<'js>) -> rquickjs::Result<Value<'js>> {
                (self as i32).into_js(ctx)
            }
        }
    )*};
}

enum_marshal! {
    StrokeCap => "StrokeCap",
    StrokeJoin => "StrokeJoin",
    Direction => "Direction",
    EaseType => "EaseType",
    EaseMode => "EaseMode",
    Waveform => "Waveform",
    PrimitiveMode => "PrimitiveMode",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_float_share_a_shape() {
        assert!(TypeSpec::Int.same_shape(TypeSpec::Float));
        assert!(TypeSpec::Enum("StrokeCap").same_shape(TypeSpec::Float));
        assert!(!TypeSpec::Value(ValueKind::Vec2).same_shape(TypeSpec::Value(ValueKind::Vec3)));
        assert!(TypeSpec::Array(ElemType::Int).same_shape(TypeSpec::Array(ElemType::Float)));
        assert!(!TypeSpec::Resource(ResourceKind::Image).same_shape(TypeSpec::Value(ValueKind::Rect)));
    }

    #[test]
    fn specs_print_like_declarations() {
        assert_eq!(TypeSpec::Float.to_string(), "float");
        assert_eq!(TypeSpec::Array(ElemType::Value(ValueKind::Vec3)).to_string(), "Vec3[]");
        assert_eq!(<Handle<sketch_render::Image>>::PARAM.to_string(), "Image");
        assert_eq!(<StrokeCap as FromScript>::PARAM.to_string(), "StrokeCap");
        assert_eq!(<() as IntoScript>::RETURN.to_string(), "void");
    }

    #[test]
    fn type_dependencies() {
        assert_eq!(TypeSpec::Float.type_dependency(), None);
        assert_eq!(
            TypeSpec::Array(ElemType::Value(ValueKind::Color)).type_dependency(),
            Some("Color")
        );
        assert_eq!(TypeSpec::Resource(ResourceKind::Camera).type_dependency(), Some("Camera"));
    }
}
