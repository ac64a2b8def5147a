use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
}

/// Reference to a type by name.
///
/// A reference with `args` is a closed generic (`Repository<User>`). A
/// reference built with [`TypeRef::open`] has no args but a non-zero arity
/// and stands for the generic definition itself (`Repository<>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub open_arity: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            open_arity: 0,
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            open_arity: 0,
        }
    }

    pub fn open(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            open_arity: arity,
        }
    }

    pub fn arity(&self) -> usize {
        if self.args.is_empty() {
            self.open_arity
        } else {
            self.args.len()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_arity > 0 && self.args.is_empty()
    }

    /// Whether `candidate` refers to this type.
    ///
    /// An open definition accepts any reference of the same name and arity,
    /// closed or open. Otherwise references must be equal.
    pub fn matches(&self, candidate: &TypeRef) -> bool {
        if self.is_open() {
            candidate.name == self.name && candidate.arity() == self.open_arity
        } else {
            self == candidate
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.is_open() {
            write!(f, "<{}>", ",".repeat(self.open_arity - 1))
        } else if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")
        } else {
            Ok(())
        }
    }
}

/// Descriptor of a type declared in a module.
///
/// Identity is `(module, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Full dotted name, without generic parameters
    pub name: String,
    /// Name of the owning module
    pub module: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub generic_arity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
}

impl TypeDescriptor {
    pub fn class(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            kind: TypeKind::Class,
            is_abstract: false,
            generic_arity: 0,
            base: None,
            interfaces: Vec::new(),
        }
    }

    pub fn interface(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::class(module, name)
        }
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.generic_arity = arity;
        self
    }

    /// Reference to this type's own definition.
    pub fn to_type_ref(&self) -> TypeRef {
        if self.generic_arity > 0 {
            TypeRef::open(self.name.clone(), self.generic_arity)
        } else {
            TypeRef::new(self.name.clone())
        }
    }

    pub fn is_concrete_class(&self) -> bool {
        self.kind == TypeKind::Class && !self.is_abstract
    }

    /// Name followed by the owning module, e.g. `zoo.Dog,animals`.
    pub fn qualified_name(&self) -> String {
        format!("{},{}", self.name, self.module)
    }

    /// Short name (last dotted segment).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A base type fixed at compile time.
///
/// Implemented by zero-sized marker types and used to parameterize
/// derived-type finders.
pub trait TypeKey: Send + Sync + 'static {
    fn type_ref() -> TypeRef;

    fn kind() -> TypeKind {
        TypeKind::Class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_matches_closed_of_same_arity() {
        let open = TypeRef::open("data.Repository", 1);
        let closed = TypeRef::generic("data.Repository", vec![TypeRef::new("app.User")]);
        let wrong_arity = TypeRef::generic(
            "data.Repository",
            vec![TypeRef::new("app.User"), TypeRef::new("app.Key")],
        );

        assert!(open.matches(&closed));
        assert!(open.matches(&TypeRef::open("data.Repository", 1)));
        assert!(!open.matches(&wrong_arity));
        assert!(!open.matches(&TypeRef::new("data.Repository")));
    }

    #[test]
    fn test_closed_matches_only_equal() {
        let closed = TypeRef::generic("data.Repository", vec![TypeRef::new("app.User")]);
        let other = TypeRef::generic("data.Repository", vec![TypeRef::new("app.Order")]);
        assert!(closed.matches(&closed.clone()));
        assert!(!closed.matches(&other));
        assert!(TypeRef::new("zoo.Animal").matches(&TypeRef::new("zoo.Animal")));
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeRef::open("Map", 2).to_string(), "Map<,>");
        let closed = TypeRef::generic("Map", vec![TypeRef::new("K"), TypeRef::new("V")]);
        assert_eq!(closed.to_string(), "Map<K, V>");
    }

    #[test]
    fn test_descriptor_identity_and_names() {
        let dog = TypeDescriptor::class("animals", "zoo.Dog").extends(TypeRef::new("zoo.Animal"));
        let same = TypeDescriptor::class("animals", "zoo.Dog");
        assert_eq!(dog, same);
        assert_eq!(dog.qualified_name(), "zoo.Dog,animals");
        assert_eq!(dog.simple_name(), "Dog");
        assert!(dog.is_concrete_class());
        assert!(!TypeDescriptor::interface("animals", "zoo.Pet").is_concrete_class());
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let json =
            r#"{ "name": "zoo.Cat", "module": "animals", "base": { "name": "zoo.Animal" } }"#;
        let cat: TypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(cat.kind, TypeKind::Class);
        assert!(!cat.is_abstract);
        assert_eq!(cat.base, Some(TypeRef::new("zoo.Animal")));
    }
}
