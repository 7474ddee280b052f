use std::fmt;

use crate::{ClassType, Type, TypeEnv, WildcardBound};

/// Render `ty` the way Java source spells it, using simple class names
/// (`Function<? super String, Integer>`, `int[]`, `Runnable & Serializable`).
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay { env, ty }.to_string()
}

/// [`fmt::Display`] adapter for a [`Type`] in a given environment.
pub struct TypeDisplay<'a> {
    pub env: &'a dyn TypeEnv,
    pub ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self { env, ty }
    }

    fn nested(&self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay { env: self.env, ty }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Void => f.write_str("void"),
            Type::Null => f.write_str("null"),
            Type::Unknown => f.write_str("<unknown>"),
            Type::Primitive(prim) => f.write_str(prim.keyword()),
            Type::Array(elem) => write!(f, "{}[]", self.nested(elem)),
            Type::Class(ClassType { def, args }) => {
                match self.env.class(*def) {
                    Some(class_def) => f.write_str(&simple_name(&class_def.name))?,
                    None => write!(f, "<class#{}>", def.to_raw())?,
                }
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.nested(arg))?;
                }
                f.write_str(">")
            }
            Type::TypeVar(id) => match self.env.type_param(*id) {
                Some(tp) => f.write_str(&tp.name),
                None => write!(f, "<tv#{}>", id.to_raw()),
            },
            Type::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            Type::Wildcard(WildcardBound::Extends(bound)) => {
                write!(f, "? extends {}", self.nested(bound))
            }
            Type::Wildcard(WildcardBound::Super(bound)) => {
                write!(f, "? super {}", self.nested(bound))
            }
            Type::Intersection(parts) => {
                for (idx, part) in parts.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" & ")?;
                    }
                    write!(f, "{}", self.nested(part))?;
                }
                Ok(())
            }
        }
    }
}

/// `java.util.Map$Entry` -> `Map.Entry`, `java.lang.String` -> `String`.
fn simple_name(binary_name: &str) -> String {
    let without_package = binary_name.rsplit('.').next().unwrap_or(binary_name);
    without_package.replace('$', ".")
}
