//! Capability registry
//!
//! The declarative table of everything a script may call. Built once per
//! [`ScriptHost`](crate::ScriptHost) and installed into every fresh context.
//!
//! Overloads share a name and are told apart at call time by arity and
//! parameter shape; the first descriptor that accepts the arguments wins.

use crate::error::RegistrationError;
use crate::handle::ResourceKind;
use crate::marshal::{describe, TypeSpec, ValueKind, TYPES_GLOBAL, TYPE_TAG};
use crate::services::HostServices;
use rquickjs::function::{Rest, This};
use rquickjs::{Ctx, Exception, Function, Object, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

/// Type-erased calling thunk generated by the binding macros.
pub type Thunk = Rc<
    dyn for<'js> Fn(&Ctx<'js>, &[Value<'js>], &mut HostServices) -> rquickjs::Result<Value<'js>>,
>;

/// One native overload.
#[derive(Clone)]
pub struct CapabilityDescriptor {
    /// Type whose prototype carries the method; `None` for globals.
    pub owner: Option<&'static str>,
    pub name: &'static str,
    /// For methods, the receiver is parameter 0.
    pub params: Vec<TypeSpec>,
    pub ret: TypeSpec,
    thunk: Thunk,
}

impl CapabilityDescriptor {
    /// `void clear(float, float, float)` or `Vec2 Vec2.add(Vec2)`.
    pub fn signature(&self) -> String {
        let (prefix, params) = match self.owner {
            Some(owner) => (format!("{owner}."), self.params.get(1..).unwrap_or_default()),
            None => (String::new(), &self.params[..]),
        };
        let params = params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {prefix}{}({params})", self.ret, self.name)
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn accepts(&self, args: &[Value<'_>]) -> bool {
        args.len() == self.params.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| param.accepts(arg))
    }

    pub fn invoke<'js>(
        &self,
        ctx: &Ctx<'js>,
        args: &[Value<'js>],
        services: &mut HostServices,
    ) -> rquickjs::Result<Value<'js>> {
        (self.thunk)(ctx, args, services)
    }

    fn same_shape(&self, other: &CapabilityDescriptor) -> bool {
        self.owner == other.owner
            && self.name == other.name
            && self.arity() == other.arity()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.same_shape(*b))
    }
}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityDescriptor")
            .field(&self.signature())
            .finish()
    }
}

/// Named integer enumeration, emitted as a frozen object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub name: &'static str,
    pub members: Vec<(&'static str, i32)>,
}

#[derive(Default)]
pub struct Registry {
    types: Vec<&'static str>,
    descriptors: Vec<CapabilityDescriptor>,
    constants: Vec<(&'static str, f64)>,
    enums: Vec<Enumeration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full capability surface.
    pub fn build() -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        crate::bindings::register_all(&mut registry)?;
        tracing::debug!(
            descriptors = registry.descriptors.len(),
            types = registry.types.len(),
            enums = registry.enums.len(),
            "capability registry built"
        );
        Ok(registry)
    }

    pub fn declare_value_type(&mut self, kind: ValueKind) -> Result<(), RegistrationError> {
        self.declare_type(kind.name())
    }

    pub fn declare_resource_type(&mut self, kind: ResourceKind) -> Result<(), RegistrationError> {
        self.declare_type(kind.name())
    }

    fn declare_type(&mut self, name: &'static str) -> Result<(), RegistrationError> {
        if self.types.contains(&name) {
            return Err(RegistrationError::DuplicateType(name));
        }
        self.types.push(name);
        Ok(())
    }

    pub fn function<F>(
        &mut self,
        name: &'static str,
        params: &[TypeSpec],
        ret: TypeSpec,
        thunk: F,
    ) -> Result<(), RegistrationError>
    where
        F: for<'js> Fn(&Ctx<'js>, &[Value<'js>], &mut HostServices) -> rquickjs::Result<Value<'js>>
            + 'static,
    {
        self.add(CapabilityDescriptor {
            owner: None,
            name,
            params: params.to_vec(),
            ret,
            thunk: Rc::new(thunk),
        })
    }

    /// Register a method on `owner`; `params[0]` is the receiver.
    pub fn method<F>(
        &mut self,
        owner: &'static str,
        name: &'static str,
        params: &[TypeSpec],
        ret: TypeSpec,
        thunk: F,
    ) -> Result<(), RegistrationError>
    where
        F: for<'js> Fn(&Ctx<'js>, &[Value<'js>], &mut HostServices) -> rquickjs::Result<Value<'js>>
            + 'static,
    {
        self.add(CapabilityDescriptor {
            owner: Some(owner),
            name,
            params: params.to_vec(),
            ret,
            thunk: Rc::new(thunk),
        })
    }

    fn add(&mut self, descriptor: CapabilityDescriptor) -> Result<(), RegistrationError> {
        if !is_identifier(descriptor.name) {
            return Err(RegistrationError::InvalidName(descriptor.name.to_string()));
        }
        match descriptor.owner {
            Some(owner) => {
                self.require_type(&descriptor, owner)?;
                let receiver = descriptor.params.first().and_then(|spec| match spec {
                    TypeSpec::Value(kind) => Some(kind.name()),
                    TypeSpec::Resource(kind) => Some(kind.name()),
                    _ => None,
                });
                if receiver != Some(owner) {
                    return Err(RegistrationError::BadReceiver {
                        signature: descriptor.signature(),
                        owner: owner.to_string(),
                    });
                }
            }
            None => {
                if self.is_data_global(descriptor.name) {
                    return Err(RegistrationError::DuplicateGlobal(descriptor.name.to_string()));
                }
            }
        }
        for spec in descriptor.params.iter().chain([&descriptor.ret]) {
            if let Some(dependency) = spec.type_dependency() {
                self.require_type(&descriptor, dependency)?;
            }
            if let TypeSpec::Enum(enumeration) = spec {
                if !self.enums.iter().any(|e| e.name == *enumeration) {
                    return Err(RegistrationError::UndeclaredType {
                        signature: descriptor.signature(),
                        type_name: enumeration.to_string(),
                    });
                }
            }
        }
        if self.descriptors.iter().any(|d| d.same_shape(&descriptor)) {
            return Err(RegistrationError::DuplicateOverload {
                signature: descriptor.signature(),
            });
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    fn require_type(
        &self,
        descriptor: &CapabilityDescriptor,
        type_name: &str,
    ) -> Result<(), RegistrationError> {
        if self.types.iter().any(|t| *t == type_name) {
            Ok(())
        } else {
            Err(RegistrationError::UndeclaredType {
                signature: descriptor.signature(),
                type_name: type_name.to_string(),
            })
        }
    }

    /// Constants and enumerations occupy their global name exclusively.
    fn is_data_global(&self, name: &str) -> bool {
        self.constants.iter().any(|(n, _)| *n == name) || self.enums.iter().any(|e| e.name == name)
    }

    fn is_global(&self, name: &str) -> bool {
        self.is_data_global(name)
            || self.types.contains(&name)
            || self
                .descriptors
                .iter()
                .any(|d| d.owner.is_none() && d.name == name)
    }

    pub fn add_constant(&mut self, name: &'static str, value: f64) -> Result<(), RegistrationError> {
        if !is_identifier(name) {
            return Err(RegistrationError::InvalidName(name.to_string()));
        }
        if self.is_global(name) {
            return Err(RegistrationError::DuplicateGlobal(name.to_string()));
        }
        self.constants.push((name, value));
        Ok(())
    }

    pub fn add_enum(
        &mut self,
        name: &'static str,
        members: &[(&'static str, i32)],
    ) -> Result<(), RegistrationError> {
        if !is_identifier(name) {
            return Err(RegistrationError::InvalidName(name.to_string()));
        }
        if self.is_global(name) {
            return Err(RegistrationError::DuplicateGlobal(name.to_string()));
        }
        let mut seen = HashSet::new();
        for (member, _) in members {
            if !is_identifier(member) {
                return Err(RegistrationError::InvalidName(format!("{name}.{member}")));
            }
            if !seen.insert(*member) {
                return Err(RegistrationError::DuplicateMember {
                    enumeration: name.to_string(),
                    member: member.to_string(),
                });
            }
        }
        self.enums.push(Enumeration {
            name,
            members: members.to_vec(),
        });
        Ok(())
    }

    pub fn descriptors(&self) -> &[CapabilityDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn type_names(&self) -> &[&'static str] {
        &self.types
    }

    pub fn constants(&self) -> &[(&'static str, f64)] {
        &self.constants
    }

    pub fn enums(&self) -> &[Enumeration] {
        &self.enums
    }

    pub fn signatures(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.signature()).collect()
    }

    /// Every overload of `name` (on `owner`, or global), in registration
    /// order.
    pub fn overloads<'a>(
        &'a self,
        owner: Option<&'a str>,
        name: &'a str,
    ) -> impl Iterator<Item = &'a CapabilityDescriptor> + 'a {
        self.descriptors
            .iter()
            .filter(move |d| d.owner == owner && d.name == name)
    }

    /// `const` declarations for every constant and enumeration.
    pub fn prelude(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.constants {
            let _ = writeln!(out, "const {name} = {value:?};");
        }
        for enumeration in &self.enums {
            let members = enumeration
                .members
                .iter()
                .map(|(member, value)| format!("{member}: {value}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "const {} = Object.freeze({{ {members} }});",
                enumeration.name
            );
        }
        out
    }

    fn groups(&self) -> Vec<OverloadGroup> {
        let mut groups: Vec<OverloadGroup> = Vec::new();
        for descriptor in &self.descriptors {
            match groups
                .iter_mut()
                .find(|g| g.owner == descriptor.owner && g.name == descriptor.name)
            {
                Some(group) => group.overloads.push(descriptor.clone()),
                None => groups.push(OverloadGroup {
                    owner: descriptor.owner,
                    name: descriptor.name,
                    overloads: vec![descriptor.clone()],
                }),
            }
        }
        groups
    }

    /// Expose the whole surface in `ctx`: one prototype per type, one
    /// dispatching function per overload group, then the constant prelude.
    pub fn install<'js>(
        &self,
        ctx: &Ctx<'js>,
        services: &Rc<RefCell<HostServices>>,
    ) -> rquickjs::Result<()> {
        let globals = ctx.globals();
        let types = Object::new(ctx.clone())?;
        for name in &self.types {
            let proto = Object::new(ctx.clone())?;
            proto.set(TYPE_TAG, *name)?;
            types.set(*name, proto)?;
        }
        globals.set(TYPES_GLOBAL, types.clone())?;

        for group in self.groups() {
            let owner = group.owner;
            let name = group.name;
            let function = dispatcher(ctx, group, services)?;
            match owner {
                Some(owner) => {
                    let proto: Object = types.get(owner)?;
                    proto.set(name, function)?;
                }
                None => globals.set(name, function)?,
            }
        }

        ctx.eval::<(), _>(self.prelude())?;
        Ok(())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types)
            .field("descriptors", &self.descriptors.len())
            .field("constants", &self.constants.len())
            .field("enums", &self.enums.len())
            .finish()
    }
}

struct OverloadGroup {
    owner: Option<&'static str>,
    name: &'static str,
    overloads: Vec<CapabilityDescriptor>,
}

impl OverloadGroup {
    fn no_match(&self, args: &[Value<'_>]) -> String {
        let skip = usize::from(self.owner.is_some());
        let got = args
            .iter()
            .skip(skip)
            .map(describe)
            .collect::<Vec<_>>()
            .join(", ");
        let candidates = self
            .overloads
            .iter()
            .map(|d| d.signature())
            .collect::<Vec<_>>()
            .join(" | ");
        let qualified = match self.owner {
            Some(owner) => format!("{owner}.{}", self.name),
            None => self.name.to_string(),
        };
        format!("no overload of {qualified} accepts ({got}); candidates: {candidates}")
    }
}

fn dispatcher<'js>(
    ctx: &Ctx<'js>,
    group: OverloadGroup,
    services: &Rc<RefCell<HostServices>>,
) -> rquickjs::Result<Function<'js>> {
    let services = Rc::clone(services);
    let function = Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, this: This<Value<'js>>, args: Rest<Value<'js>>| {
            let mut values = args.0;
            if group.owner.is_some() {
                values.insert(0, this.0);
            }
            let Some(descriptor) = group.overloads.iter().find(|d| d.accepts(&values)) else {
                return Err(Exception::throw_type(&ctx, &group.no_match(&values)));
            };
            let Ok(mut services) = services.try_borrow_mut() else {
                return Err(Exception::throw_type(
                    &ctx,
                    "host services are already in use by another capability call",
                ));
            };
            descriptor.invoke(&ctx, &values, &mut services)
        },
    )?;
    Ok(function)
}

const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED.contains(&name)
}
