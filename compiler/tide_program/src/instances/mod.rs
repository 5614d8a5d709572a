//! Instance caches.
//!
//! Instances are published into their prototype's cache as soon as they are
//! allocated, before anything about them is resolved. A re-entrant request
//! for the same key finds the in-progress instance instead of creating a
//! second one, which is what lets recursive generics terminate.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tide_ir::{CommonFlags, ElementId};
use tide_types::Type;
use tracing::{debug, trace};

use crate::element::{
    ClassData, ContextualTypes, Element, ElementData, ElementKind, FieldData, FunctionData,
    FunctionPrototypeData, IndexSignatureData, PropertyData, ResolutionState,
};
use crate::mangle::{self, MemberPosition};
use crate::Program;

type TypeStrings = SmallVec<[String; 4]>;

const INDEX_SIGNATURE: &str = "[]";

impl<'a> Program<'a> {
    /// Cache key for a list of type arguments.
    pub fn instance_key(&self, type_arguments: &[Type]) -> String {
        mangle::instance_key(&self.canonical_strings(type_arguments))
    }

    fn canonical_strings(&self, type_arguments: &[Type]) -> TypeStrings {
        type_arguments.iter().map(|ty| ty.canonical(self)).collect()
    }

    fn display_strings(&self, type_arguments: &[Type]) -> TypeStrings {
        type_arguments
            .iter()
            .map(|ty| ty.display(self).to_string())
            .collect()
    }

    /// Cached instance of a class or function prototype.
    pub fn cached_instance(&self, prototype: ElementId, key: &str) -> Option<ElementId> {
        match &self.element(prototype).data {
            ElementData::ClassPrototype(data) => data.instances.get(key).copied(),
            ElementData::FunctionPrototype(data) => data.instances.get(key).copied(),
            _ => None,
        }
    }

    /// Number of instances created from a prototype.
    pub fn instance_count(&self, prototype: ElementId) -> usize {
        match &self.element(prototype).data {
            ElementData::ClassPrototype(data) => data.instances.len(),
            ElementData::FunctionPrototype(data) => data.instances.len(),
            _ => 0,
        }
    }

    /// Allocate a class or interface instance and publish it in the
    /// prototype's cache. Nothing is resolved yet.
    pub fn publish_class_instance(
        &mut self,
        prototype: ElementId,
        type_arguments: Vec<Type>,
        ctx_types: ContextualTypes,
    ) -> ElementId {
        let canonical = self.canonical_strings(&type_arguments);
        let display = self.display_strings(&type_arguments);
        let key = mangle::instance_key(&canonical);

        let proto = self.element(prototype);
        let kind = if proto.kind == ElementKind::InterfacePrototype {
            ElementKind::Interface
        } else {
            ElementKind::Class
        };
        let name = self.intern(&mangle::with_type_arguments(self.str(proto.name), &display));
        let internal_name = mangle::with_type_arguments(&proto.internal_name, &canonical);
        let mut element = Element::new(
            kind,
            name,
            internal_name,
            ElementData::Class(ClassData {
                prototype,
                type_arguments,
                ctx_types,
                base: None,
                interfaces: Vec::new(),
                fields: Vec::new(),
                next_memory_offset: 0,
                constructor: None,
                operators: FxHashMap::default(),
                index_signature: None,
                state: ResolutionState::Pending,
            }),
        )
        .with_flags(proto.flags - CommonFlags::GENERIC, proto.decorators)
        .with_span(proto.span);
        element.parent = proto.parent;

        let id = self.alloc(element);
        if let Some(data) = self.class_prototype_mut(prototype) {
            data.instances.insert(key, id);
        }
        debug!(instance = %self.internal_name(id), "class instance published");
        id
    }

    /// Allocate a function instance and publish it in the prototype's
    /// cache. The signature is filled in by the resolver.
    pub fn publish_function_instance(
        &mut self,
        prototype: ElementId,
        type_arguments: Vec<Type>,
        ctx_types: ContextualTypes,
    ) -> ElementId {
        let canonical = self.canonical_strings(&type_arguments);
        let display = self.display_strings(&type_arguments);
        let key = mangle::instance_key(&canonical);

        let proto = self.element(prototype);
        let name = self.intern(&mangle::with_type_arguments(self.str(proto.name), &display));
        let internal_name = mangle::with_type_arguments(&proto.internal_name, &canonical);
        let mut element = Element::new(
            ElementKind::Function,
            name,
            internal_name,
            ElementData::Function(FunctionData {
                prototype,
                type_arguments,
                ctx_types,
                signature: None,
                params: Vec::new(),
                local_count: 0,
                state: ResolutionState::Pending,
            }),
        )
        .with_flags(proto.flags - CommonFlags::GENERIC, proto.decorators)
        .with_span(proto.span);
        element.parent = proto.parent;

        let id = self.alloc(element);
        if let Some(data) = self.function_prototype_mut(prototype) {
            data.instances.insert(key, id);
        }
        debug!(instance = %self.internal_name(id), "function instance published");
        id
    }

    /// Allocate a laid-out field of a class instance and make it an
    /// instance member.
    pub fn add_field(&mut self, class: ElementId, prototype: ElementId, ty: Type, offset: u32) -> ElementId {
        let proto = self.element(prototype);
        let (name, flags, decorators, span) = (proto.name, proto.flags, proto.decorators, proto.span);
        let internal_name = mangle::member(self.internal_name(class), MemberPosition::Instance, self.str(name));
        let element = Element::new(
            ElementKind::Field,
            name,
            internal_name,
            ElementData::Field(FieldData { prototype, ty, offset }),
        )
        .with_parent(class)
        .with_flags(flags, decorators)
        .with_span(span);
        let id = self.alloc(element);
        self.element_mut(class).members.insert(name, id);
        if let Some(data) = self.class_mut(class) {
            data.fields.push(id);
        }
        trace!(field = %self.internal_name(id), offset, "field laid out");
        id
    }

    /// Allocate the index signature of a class instance with a `[]`
    /// operator.
    pub fn add_index_signature(&mut self, class: ElementId) -> ElementId {
        let name = self.intern(INDEX_SIGNATURE);
        let internal_name = mangle::member(self.internal_name(class), MemberPosition::Instance, INDEX_SIGNATURE);
        let span = self.element(class).span;
        let element = Element::new(
            ElementKind::IndexSignature,
            name,
            internal_name,
            ElementData::IndexSignature(IndexSignatureData { class }),
        )
        .with_parent(class)
        .with_span(span);
        let id = self.alloc(element);
        if let Some(data) = self.class_mut(class) {
            data.index_signature = Some(id);
        }
        id
    }

    /// Bind an instance member prototype (method, accessor or property) to
    /// a class instance. Memoized per `(prototype, class)`.
    ///
    /// Binding a method binds its whole overload set. Returns `None` for
    /// elements that are not bindable.
    pub fn bind_prototype(&mut self, prototype: ElementId, class: ElementId) -> Option<ElementId> {
        let bound = match &self.element(prototype).data {
            ElementData::FunctionPrototype(data) => data.bound.get(&class).copied(),
            ElementData::PropertyPrototype(data) => data.bound.get(&class).copied(),
            _ => return None,
        };
        if let Some(bound) = bound {
            trace!(prototype = %self.internal_name(prototype), "bound prototype cache hit");
            return Some(bound);
        }

        let proto = self.element(prototype);
        let parent_name = proto
            .parent
            .map_or("", |parent| self.internal_name(parent));
        let suffix = mangle::member_suffix(&proto.internal_name, parent_name);
        let internal_name = mangle::member(self.internal_name(class), MemberPosition::Instance, suffix);
        let (name, flags, decorators, span) = (proto.name, proto.flags, proto.decorators, proto.span);

        match proto.data.clone() {
            ElementData::FunctionPrototype(data) => {
                let overloads = data.overloads.clone();
                let element = Element::new(
                    ElementKind::FunctionPrototype,
                    name,
                    internal_name,
                    ElementData::FunctionPrototype(FunctionPrototypeData {
                        decl: data.decl,
                        class_prototype: data.class_prototype,
                        bound_class: Some(class),
                        unbound: Some(prototype),
                        bound: FxHashMap::default(),
                        instances: FxHashMap::default(),
                        overloads: Vec::new(),
                    }),
                )
                .with_parent(class)
                .with_flags(flags, decorators)
                .with_span(span);
                let id = self.alloc(element);
                if let Some(data) = self.function_prototype_mut(prototype) {
                    data.bound.insert(class, id);
                }

                if !overloads.is_empty() {
                    let bound_overloads: Vec<ElementId> = overloads
                        .iter()
                        .filter_map(|&overload| {
                            if overload == prototype {
                                Some(id)
                            } else {
                                self.bind_prototype(overload, class)
                            }
                        })
                        .collect();
                    if let Some(data) = self.function_prototype_mut(id) {
                        data.overloads = bound_overloads;
                    }
                }
                Some(id)
            }
            ElementData::PropertyPrototype(data) => {
                let getter = data.getter.and_then(|getter| self.bind_prototype(getter, class));
                let setter = data.setter.and_then(|setter| self.bind_prototype(setter, class));
                let element = Element::new(
                    ElementKind::Property,
                    name,
                    internal_name,
                    ElementData::Property(PropertyData {
                        prototype,
                        getter,
                        setter,
                    }),
                )
                .with_parent(class)
                .with_flags(flags, decorators)
                .with_span(span);
                let id = self.alloc(element);
                if let Some(data) = self.property_prototype_mut(prototype) {
                    data.bound.insert(class, id);
                }
                Some(id)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
