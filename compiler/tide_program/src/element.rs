//! Program elements.
//!
//! Every named construct of a program is an [`Element`] in the program's
//! arena, addressed by [`ElementId`]. Prototypes borrow their declarations
//! from the syntax tree for `'a`; instances carry resolved types only.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tide_ir::{
    ClassDecl, CommonFlags, DecoratorFlags, ElementId, EnumDecl, EnumValueDecl, ExprId,
    FieldDecl, FunctionDecl, Name, NamespaceDecl, OperatorKind, Parameter, Source, Span,
    TypeAliasDecl, TypeNode, VariableDecl,
};
use tide_types::{SignatureId, Type};

/// Type-parameter bindings in scope during a resolution.
///
/// Ordered so that cloning and iteration are deterministic.
pub type ContextualTypes = BTreeMap<Name, Type>;

/// Element kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementKind {
    Global,
    Local,
    Enum,
    EnumValue,
    FunctionPrototype,
    Function,
    ClassPrototype,
    Class,
    InterfacePrototype,
    Interface,
    FieldPrototype,
    Field,
    PropertyPrototype,
    Property,
    Namespace,
    File,
    TypeDefinition,
    IndexSignature,
}

impl ElementKind {
    /// Class or interface prototype.
    #[inline]
    pub fn is_class_prototype(self) -> bool {
        matches!(self, ElementKind::ClassPrototype | ElementKind::InterfacePrototype)
    }

    /// Class or interface instance.
    #[inline]
    pub fn is_class(self) -> bool {
        matches!(self, ElementKind::Class | ElementKind::Interface)
    }

    /// Whether elements of this kind can be referenced as a type name.
    #[inline]
    pub fn is_type(self) -> bool {
        matches!(
            self,
            ElementKind::ClassPrototype
                | ElementKind::InterfacePrototype
                | ElementKind::Class
                | ElementKind::Interface
                | ElementKind::TypeDefinition
                | ElementKind::Enum
        )
    }
}

/// Progress of a lazily resolved element.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ResolutionState {
    /// Published, nothing resolved yet.
    #[default]
    Pending,
    /// Resolving the base class. Reaching this state again is a cycle.
    ResolvingBase,
    /// Base resolved; resolving fields and methods.
    ResolvingMembers,
    Resolved,
    /// Resolution reported an error. The element stays cached.
    Failed,
}

impl ResolutionState {
    /// Whether resolution has started and not yet finished.
    #[inline]
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            ResolutionState::ResolvingBase | ResolutionState::ResolvingMembers
        )
    }
}

/// A named program element.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    pub kind: ElementKind,
    /// Simple name. For instances this includes type arguments, e.g.
    /// `Box<i32>`.
    pub name: Name,
    /// Program-unique mangled name.
    pub internal_name: String,
    /// Owner. `None` only for files and builtins.
    pub parent: Option<ElementId>,
    pub flags: CommonFlags,
    pub decorators: DecoratorFlags,
    /// Named children. For class prototypes these are the static members;
    /// for class instances the bound instance members, inherited included.
    pub members: FxHashMap<Name, ElementId>,
    /// Declaration name span, for diagnostics.
    pub span: Span,
    pub data: ElementData<'a>,
}

impl<'a> Element<'a> {
    pub fn new(kind: ElementKind, name: Name, internal_name: String, data: ElementData<'a>) -> Self {
        Element {
            kind,
            name,
            internal_name,
            parent: None,
            flags: CommonFlags::empty(),
            decorators: DecoratorFlags::empty(),
            members: FxHashMap::default(),
            span: Span::DUMMY,
            data,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CommonFlags, decorators: DecoratorFlags) -> Self {
        self.flags = flags;
        self.decorators = decorators;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn is(&self, flags: CommonFlags) -> bool {
        self.flags.contains(flags)
    }

    #[inline]
    pub fn is_instance_member(&self) -> bool {
        self.flags.contains(CommonFlags::INSTANCE)
    }
}

/// Kind-specific element data.
#[derive(Clone, Debug)]
pub enum ElementData<'a> {
    Global(GlobalData<'a>),
    Local(LocalData),
    Enum(EnumData<'a>),
    EnumValue(EnumValueData<'a>),
    FunctionPrototype(FunctionPrototypeData<'a>),
    Function(FunctionData),
    ClassPrototype(ClassPrototypeData<'a>),
    Class(ClassData),
    FieldPrototype(FieldPrototypeData<'a>),
    Field(FieldData),
    PropertyPrototype(PropertyPrototypeData),
    Property(PropertyData),
    Namespace(NamespaceData<'a>),
    File(FileData<'a>),
    TypeDefinition(TypeDefinitionData<'a>),
    IndexSignature(IndexSignatureData),
}

/// Declaration behind a global.
#[derive(Copy, Clone, Debug)]
pub enum GlobalDecl<'a> {
    Variable(&'a VariableDecl),
    /// Static class field.
    StaticField(&'a FieldDecl),
}

impl<'a> GlobalDecl<'a> {
    pub fn type_node(self) -> Option<&'a TypeNode> {
        match self {
            GlobalDecl::Variable(decl) => decl.ty.as_ref(),
            GlobalDecl::StaticField(decl) => decl.ty.as_ref(),
        }
    }

    pub fn initializer(self) -> Option<ExprId> {
        match self {
            GlobalDecl::Variable(decl) => decl.initializer,
            GlobalDecl::StaticField(decl) => decl.initializer,
        }
    }
}

/// A module-level variable or static field, typed lazily.
#[derive(Clone, Debug)]
pub struct GlobalData<'a> {
    pub decl: GlobalDecl<'a>,
    pub ty: Option<Type>,
    /// `ResolvingMembers` while the initializer is being typed.
    pub state: ResolutionState,
}

/// A function parameter or block-scoped variable.
#[derive(Clone, Debug)]
pub struct LocalData {
    pub ty: Type,
    /// Slot index within the function.
    pub index: u32,
}

#[derive(Clone, Debug)]
pub struct EnumData<'a> {
    pub decl: &'a EnumDecl,
}

#[derive(Clone, Debug)]
pub struct EnumValueData<'a> {
    pub decl: &'a EnumValueDecl,
    pub value: i64,
}

/// An unresolved function, method or accessor.
#[derive(Clone, Debug)]
pub struct FunctionPrototypeData<'a> {
    pub decl: &'a FunctionDecl,
    /// Class prototype declaring this method.
    pub class_prototype: Option<ElementId>,
    /// Class instance this prototype is bound to.
    pub bound_class: Option<ElementId>,
    /// Unbound prototype this one was bound from.
    pub unbound: Option<ElementId>,
    /// Bound copies, keyed by class instance.
    pub bound: FxHashMap<ElementId, ElementId>,
    /// Instance cache, keyed by canonical type arguments.
    pub instances: FxHashMap<String, ElementId>,
    /// Every overload sharing this name, declaration order. Only the first
    /// overload (the one registered in the parent) carries the list.
    pub overloads: Vec<ElementId>,
}

impl FunctionPrototypeData<'_> {
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.decl.type_params.is_empty()
    }
}

/// A resolved function instance.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub prototype: ElementId,
    pub type_arguments: Vec<Type>,
    /// Bindings visible inside the function, class bindings included.
    pub ctx_types: ContextualTypes,
    /// Set once parameter and return types are resolved.
    pub signature: Option<SignatureId>,
    /// Parameter locals, `this` excluded.
    pub params: Vec<ElementId>,
    /// Number of locals allocated so far, parameters included.
    pub local_count: u32,
    pub state: ResolutionState,
}

/// An unresolved class or interface.
#[derive(Clone, Debug)]
pub struct ClassPrototypeData<'a> {
    pub decl: &'a ClassDecl,
    /// Instance member prototypes (fields, methods, properties).
    pub instance_members: FxHashMap<Name, ElementId>,
    /// Instance member prototypes in declaration order. Overloads are
    /// represented by their first declaration.
    pub member_order: Vec<ElementId>,
    pub constructor: Option<ElementId>,
    /// Operator overload method prototypes.
    pub operators: FxHashMap<OperatorKind, ElementId>,
    /// Instance cache, keyed by canonical type arguments.
    pub instances: FxHashMap<String, ElementId>,
}

impl ClassPrototypeData<'_> {
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.decl.type_params.is_empty()
    }
}

/// A resolved class or interface instance.
#[derive(Clone, Debug)]
pub struct ClassData {
    pub prototype: ElementId,
    pub type_arguments: Vec<Type>,
    pub ctx_types: ContextualTypes,
    pub base: Option<ElementId>,
    pub interfaces: Vec<ElementId>,
    /// Own fields in memory-layout order.
    pub fields: Vec<ElementId>,
    /// First free byte after the last field, inherited fields included.
    pub next_memory_offset: u32,
    pub constructor: Option<ElementId>,
    /// Bound operator overload prototypes, inherited included.
    pub operators: FxHashMap<OperatorKind, ElementId>,
    pub index_signature: Option<ElementId>,
    pub state: ResolutionState,
}

/// Declaration behind a field prototype.
#[derive(Copy, Clone, Debug)]
pub enum FieldSource<'a> {
    Field(&'a FieldDecl),
    /// Constructor parameter property.
    Parameter(&'a Parameter),
}

impl<'a> FieldSource<'a> {
    pub fn type_node(self) -> Option<&'a TypeNode> {
        match self {
            FieldSource::Field(decl) => decl.ty.as_ref(),
            FieldSource::Parameter(param) => param.ty.as_ref(),
        }
    }

    pub fn initializer(self) -> Option<ExprId> {
        match self {
            FieldSource::Field(decl) => decl.initializer,
            FieldSource::Parameter(param) => param.initializer,
        }
    }

    /// Whether the constructor is known to assign the field.
    pub fn is_definitely_assigned(self) -> bool {
        match self {
            FieldSource::Field(decl) => decl.flags.contains(CommonFlags::DEFINITELY_ASSIGNED),
            FieldSource::Parameter(_) => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldPrototypeData<'a> {
    pub decl: FieldSource<'a>,
    pub class_prototype: ElementId,
}

/// A field of a class instance.
#[derive(Clone, Debug)]
pub struct FieldData {
    pub prototype: ElementId,
    pub ty: Type,
    /// Byte offset within the instance.
    pub offset: u32,
}

/// A getter/setter pair.
#[derive(Clone, Debug)]
pub struct PropertyPrototypeData {
    pub getter: Option<ElementId>,
    pub setter: Option<ElementId>,
    pub class_prototype: ElementId,
    /// Bound properties, keyed by class instance.
    pub bound: FxHashMap<ElementId, ElementId>,
}

/// A property of a class instance with bound accessor prototypes.
#[derive(Clone, Debug)]
pub struct PropertyData {
    pub prototype: ElementId,
    pub getter: Option<ElementId>,
    pub setter: Option<ElementId>,
}

#[derive(Clone, Debug)]
pub struct NamespaceData<'a> {
    /// Every merged declaration.
    pub decls: Vec<&'a NamespaceDecl>,
}

#[derive(Clone, Debug)]
pub struct FileData<'a> {
    pub source: &'a Source,
    /// Exported name to element.
    pub exports: FxHashMap<Name, ElementId>,
    /// Files re-exported with `export *`.
    pub export_stars: Vec<ElementId>,
}

#[derive(Clone, Debug)]
pub struct TypeDefinitionData<'a> {
    pub decl: &'a TypeAliasDecl,
}

/// The `[]` access of a class instance.
#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub class: ElementId,
}
