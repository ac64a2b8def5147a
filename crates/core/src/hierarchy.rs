//! Derived-type relation.
//!
//! Determines whether a type is a strict, concrete subtype of a base type.
//! Supports:
//! - Classes (base chain)
//! - Interfaces (implemented and inherited interfaces)
//! - Open generic bases (`Repository<>` matches `Repository<User>`)

use lodestone_api::{TypeDescriptor, TypeKind, TypeRef};
use std::collections::{HashMap, HashSet, VecDeque};

/// Name lookup over a discovered type universe.
pub struct TypeIndex<'a> {
    by_name: HashMap<&'a str, Vec<&'a TypeDescriptor>>,
}

impl<'a> TypeIndex<'a> {
    pub fn new(types: &'a [TypeDescriptor]) -> Self {
        let mut by_name: HashMap<&'a str, Vec<&'a TypeDescriptor>> = HashMap::new();
        for ty in types {
            by_name.entry(ty.name.as_str()).or_default().push(ty);
        }
        Self { by_name }
    }

    /// Declarations of `reference`, matched by name and generic arity.
    pub fn resolve(&self, reference: &TypeRef) -> impl Iterator<Item = &'a TypeDescriptor> + '_ {
        let arity = reference.arity();
        self.by_name
            .get(reference.name.as_str())
            .into_iter()
            .flatten()
            .copied()
            .filter(move |ty| ty.generic_arity == arity)
    }
}

/// Whether `candidate` is a concrete class strictly deriving from `base`.
///
/// Ancestors are walked breadth-first through `index`; references to types
/// outside the universe end their branch. Interface edges are only followed
/// when `base_kind` is [`TypeKind::Interface`].
pub fn derives_from(
    candidate: &TypeDescriptor,
    base: &TypeRef,
    base_kind: TypeKind,
    index: &TypeIndex<'_>,
) -> bool {
    if !candidate.is_concrete_class() {
        return false;
    }
    if base.matches(&candidate.to_type_ref()) {
        return false;
    }

    let follow_interfaces = base_kind == TypeKind::Interface;
    let mut visited: HashSet<(String, usize)> = HashSet::new();
    let mut queue: VecDeque<&TypeRef> = parents(candidate, follow_interfaces).collect();

    while let Some(current) = queue.pop_front() {
        if base.matches(current) {
            return true;
        }
        if !visited.insert((current.name.clone(), current.arity())) {
            continue;
        }
        for declaration in index.resolve(current) {
            queue.extend(parents(declaration, follow_interfaces));
        }
    }

    false
}

fn parents(ty: &TypeDescriptor, follow_interfaces: bool) -> impl Iterator<Item = &TypeRef> {
    let interfaces: &[TypeRef] = if follow_interfaces { &ty.interfaces } else { &[] };
    ty.base.iter().chain(interfaces.iter())
}
