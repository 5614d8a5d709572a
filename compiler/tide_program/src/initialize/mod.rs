//! Registration of declarations as prototypes.
//!
//! [`Program::initialize`] walks every source once, creating a file element
//! per source and a prototype per declaration, then links imports and
//! re-exports. Nothing is resolved here: types, base classes and
//! signatures are left to the resolver.

use rustc_hash::FxHashMap;
use tide_diagnostic::Diagnostic;
use tide_ir::{
    ClassDecl, ClassMember, CommonFlags, DecoratorFlags, ElementId, EnumDecl, ExportDecl,
    ExportMember, ExprId, ExprKind, FieldDecl, FunctionDecl, ImportDecl, ImportMember, Item, Literal,
    Name, NamespaceDecl, Parameter, Source, Span, TypeAliasDecl, UnaryOp, VariableDecl,
};
use tracing::{debug, trace};

use crate::element::{
    ClassPrototypeData, Element, ElementData, ElementKind, EnumData, EnumValueData,
    FieldPrototypeData, FieldSource, FileData, FunctionPrototypeData, GlobalData, GlobalDecl,
    NamespaceData, PropertyPrototypeData, ResolutionState, TypeDefinitionData,
};
use crate::mangle::{self, MemberPosition};
use crate::{Program, RegisterError};

/// Name given to function and class expressions without one.
const ANONYMOUS: &str = "anonymous";

/// An import or export waiting for the element it names.
#[derive(Copy, Clone, Debug)]
enum PendingLink<'a> {
    Import {
        file: ElementId,
        foreign: ElementId,
        path: &'a str,
        member: &'a ImportMember,
    },
    ExportLocal {
        file: ElementId,
        member: &'a ExportMember,
    },
    ReExport {
        file: ElementId,
        foreign: ElementId,
        path: &'a str,
        member: &'a ExportMember,
    },
}

impl<'a> Program<'a> {
    /// Register every declaration of every source, then link imports and
    /// exports. Registration errors become diagnostics; calling this twice
    /// is a no-op.
    #[tracing::instrument(level = "debug", skip_all, fields(files = self.sources().len()))]
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let sources = self.sources();
        let files: Vec<ElementId> = sources.iter().map(|source| self.register_file(source)).collect();

        let mut links = Vec::new();
        for (&file, source) in files.iter().zip(sources) {
            for item in &source.items {
                self.register_item(file, item, &mut links);
            }
        }
        self.link(links);
        debug!(elements = self.element_count(), "program initialized");
    }

    fn register_file(&mut self, source: &'a Source) -> ElementId {
        let name = self.intern(&source.path);
        let element = Element::new(
            ElementKind::File,
            name,
            source.path.clone(),
            ElementData::File(FileData {
                source,
                exports: FxHashMap::default(),
                export_stars: Vec::new(),
            }),
        );
        if let Some(existing) = self.file(&source.path) {
            self.report(
                RegisterError::Duplicate {
                    name: source.path.clone(),
                    span: Span::DUMMY,
                    previous: Span::DUMMY,
                }
                .into(),
            );
            return existing;
        }
        let id = self.alloc(element);
        self.insert_file(&source.path, id);
        id
    }

    /// Register one item under `parent`, reporting failures.
    fn register_item(&mut self, parent: ElementId, item: &'a Item, links: &mut Vec<PendingLink<'a>>) {
        let result = match item {
            Item::Class(decl) => self.register_class(parent, decl).map(|_| ()),
            Item::Function(decl) => self.register_function(parent, decl).map(|_| ()),
            Item::Variable(decl) => self.register_variable(parent, decl).map(|_| ()),
            Item::Enum(decl) => self.register_enum(parent, decl).map(|_| ()),
            Item::Namespace(decl) => self.register_namespace(parent, decl, links),
            Item::TypeAlias(decl) => self.register_type_alias(parent, decl).map(|_| ()),
            Item::Import(decl) => self.queue_import(parent, decl, links),
            Item::Export(decl) => self.queue_export(parent, decl, links),
            Item::ExportStar(decl) => self.add_export_star(parent, &decl.path, decl.span),
            Item::Statement(_) => Ok(()),
        };
        if let Err(err) = result {
            self.report(err.into());
        }
    }

    // === Member registration ===

    /// Where a new child of `parent` sits, for mangling.
    fn position_in(&self, parent: ElementId, flags: CommonFlags) -> MemberPosition {
        match self.kind(parent) {
            ElementKind::File => MemberPosition::TopLevel,
            ElementKind::Function | ElementKind::FunctionPrototype => MemberPosition::Inner,
            _ if flags.contains(CommonFlags::INSTANCE) => MemberPosition::Instance,
            _ => MemberPosition::Static,
        }
    }

    /// Mangled name of a child of `parent` with the given suffix.
    pub(crate) fn child_internal_name(&self, parent: ElementId, flags: CommonFlags, suffix: &str) -> String {
        mangle::member(self.internal_name(parent), self.position_in(parent, flags), suffix)
    }

    /// The element `name` already names in the member namespace selected by
    /// `flags`.
    fn existing_member(&self, parent: ElementId, name: Name, flags: CommonFlags) -> Option<ElementId> {
        if flags.contains(CommonFlags::INSTANCE) {
            if let Some(proto) = self.class_prototype(parent) {
                return proto.instance_members.get(&name).copied();
            }
        }
        self.element(parent).members.get(&name).copied()
    }

    fn insert_member(&mut self, parent: ElementId, name: Name, id: ElementId, flags: CommonFlags) {
        if flags.contains(CommonFlags::INSTANCE) {
            if let Some(proto) = self.class_prototype_mut(parent) {
                proto.instance_members.insert(name, id);
                proto.member_order.push(id);
                return;
            }
        }
        self.element_mut(parent).members.insert(name, id);
    }

    /// Register a prototype under `parent`.
    ///
    /// The element's internal name is derived from `parent`. A function
    /// whose name is taken by another function with a different parameter
    /// shape joins that function's overload set; any other clash is a
    /// duplicate.
    pub fn register_prototype(
        &mut self,
        parent: ElementId,
        mut element: Element<'a>,
    ) -> Result<ElementId, RegisterError> {
        let name = element.name;
        let flags = element.flags;
        element.parent = Some(parent);

        if let Some(existing) = self.existing_member(parent, name, flags) {
            if let Some(index) = self.overload_index(existing, &element)? {
                let suffix = mangle::indexed(self.str(name), index);
                element.internal_name = self.child_internal_name(parent, flags, &suffix);
                let id = self.alloc(element);
                if let Some(head) = self.function_prototype_mut(existing) {
                    if head.overloads.is_empty() {
                        head.overloads.push(existing);
                    }
                    head.overloads.push(id);
                }
                trace!(name = self.str(name), index, "overload registered");
                return Ok(id);
            }
            return Err(self.duplicate(existing, &element));
        }

        element.internal_name = self.child_internal_name(parent, flags, self.str(name));
        let exported = element.flags.contains(CommonFlags::EXPORT);
        let global = element.decorators.contains(DecoratorFlags::GLOBAL);
        let id = self.alloc(element);
        self.insert_member(parent, name, id, flags);

        if exported {
            if let Some(file) = self.file_data_mut(parent) {
                file.exports.insert(name, id);
            }
        }
        if global {
            if let Some(&previous) = self.global_scope().get(&name) {
                let previous_span = self.element(previous).span;
                return Err(RegisterError::Duplicate {
                    name: self.str(name).to_owned(),
                    span: self.element(id).span,
                    previous: previous_span,
                });
            }
            self.global_scope_mut().insert(name, id);
        }
        Ok(id)
    }

    /// Overload index for `element` if it can join `existing`'s overload
    /// set, `None` if the two are not both plain functions.
    fn overload_index(&self, existing: ElementId, element: &Element<'a>) -> Result<Option<usize>, RegisterError> {
        let (Some(head), ElementData::FunctionPrototype(new)) =
            (self.function_prototype(existing), &element.data)
        else {
            return Ok(None);
        };
        if head.decl.flags.is_accessor() || new.decl.flags.is_accessor() {
            return Ok(None);
        }
        let overloads = if head.overloads.is_empty() {
            std::slice::from_ref(&existing)
        } else {
            head.overloads.as_slice()
        };
        for &overload in overloads {
            let Some(other) = self.function_prototype(overload) else {
                continue;
            };
            if same_function_shape(other.decl, new.decl) {
                return Err(self.duplicate(overload, element));
            }
        }
        Ok(Some(overloads.len()))
    }

    fn duplicate(&self, existing: ElementId, element: &Element<'a>) -> RegisterError {
        RegisterError::Duplicate {
            name: self.str(element.name).to_owned(),
            span: element.span,
            previous: self.element(existing).span,
        }
    }

    // === Declarations ===

    fn register_class(&mut self, parent: ElementId, decl: &'a ClassDecl) -> Result<ElementId, RegisterError> {
        let kind = if decl.is_interface {
            ElementKind::InterfacePrototype
        } else {
            ElementKind::ClassPrototype
        };
        let mut flags = decl.flags;
        if !decl.type_params.is_empty() {
            flags |= CommonFlags::GENERIC;
        }
        let element = Element::new(
            kind,
            decl.name,
            String::new(),
            ElementData::ClassPrototype(ClassPrototypeData {
                decl,
                instance_members: FxHashMap::default(),
                member_order: Vec::new(),
                constructor: None,
                operators: FxHashMap::default(),
                instances: FxHashMap::default(),
            }),
        )
        .with_flags(flags, decl.decorators)
        .with_span(decl.name_span);
        let class = self.register_prototype(parent, element)?;
        self.register_class_members(class, decl);
        Ok(class)
    }

    fn register_class_members(&mut self, class: ElementId, decl: &'a ClassDecl) {
        for member in &decl.members {
            let result = match member {
                ClassMember::Field(field) => self.register_field(class, field),
                ClassMember::Method(method) => self.register_method(class, method),
            };
            if let Err(err) = result {
                self.report(err.into());
            }
        }
    }

    fn register_field(&mut self, class: ElementId, decl: &'a FieldDecl) -> Result<(), RegisterError> {
        if decl.flags.contains(CommonFlags::STATIC) {
            let element = Element::new(
                ElementKind::Global,
                decl.name,
                String::new(),
                ElementData::Global(GlobalData {
                    decl: GlobalDecl::StaticField(decl),
                    ty: None,
                    state: ResolutionState::Pending,
                }),
            )
            .with_flags(decl.flags, decl.decorators)
            .with_span(decl.name_span);
            return self.register_prototype(class, element).map(|_| ());
        }
        let element = Element::new(
            ElementKind::FieldPrototype,
            decl.name,
            String::new(),
            ElementData::FieldPrototype(FieldPrototypeData {
                decl: FieldSource::Field(decl),
                class_prototype: class,
            }),
        )
        .with_flags(decl.flags | CommonFlags::INSTANCE, decl.decorators)
        .with_span(decl.name_span);
        self.register_prototype(class, element).map(|_| ())
    }

    fn register_method(&mut self, class: ElementId, decl: &'a FunctionDecl) -> Result<(), RegisterError> {
        if decl.flags.contains(CommonFlags::CONSTRUCTOR) {
            return self.register_constructor(class, decl);
        }
        if decl.flags.is_accessor() {
            return self.register_accessor(class, decl);
        }
        let mut flags = decl.flags;
        if !flags.contains(CommonFlags::STATIC) {
            flags |= CommonFlags::INSTANCE;
        }
        let element = self.function_element(decl, flags, Some(class));
        let id = self.register_prototype(class, element)?;
        if let (Some(op), true) = (decl.operator, flags.contains(CommonFlags::INSTANCE)) {
            if let Some(proto) = self.class_prototype_mut(class) {
                proto.operators.entry(op).or_insert(id);
            }
        }
        Ok(())
    }

    fn register_constructor(&mut self, class: ElementId, decl: &'a FunctionDecl) -> Result<(), RegisterError> {
        let flags = decl.flags | CommonFlags::INSTANCE;
        let mut element = self.function_element(decl, flags, Some(class));
        if let Some(existing) = self.class_prototype(class).and_then(|proto| proto.constructor) {
            return Err(self.duplicate(existing, &element));
        }
        element.parent = Some(class);
        element.internal_name = self.child_internal_name(class, flags, "constructor");
        let ctor = self.alloc(element);
        if let Some(proto) = self.class_prototype_mut(class) {
            proto.constructor = Some(ctor);
        }

        for param in decl.params.iter().filter(|p| p.is_parameter_property()) {
            if let Err(err) = self.register_parameter_property(class, param) {
                self.report(err.into());
            }
        }
        Ok(())
    }

    fn register_parameter_property(&mut self, class: ElementId, param: &'a Parameter) -> Result<(), RegisterError> {
        let element = Element::new(
            ElementKind::FieldPrototype,
            param.name,
            String::new(),
            ElementData::FieldPrototype(FieldPrototypeData {
                decl: FieldSource::Parameter(param),
                class_prototype: class,
            }),
        )
        .with_flags(
            param.implicit_field | CommonFlags::INSTANCE | CommonFlags::PARAMETER_PROPERTY,
            DecoratorFlags::empty(),
        )
        .with_span(param.span);
        self.register_prototype(class, element).map(|_| ())
    }

    /// Getters and setters share a property prototype registered under the
    /// plain name; the accessors themselves are only reachable through it.
    fn register_accessor(&mut self, class: ElementId, decl: &'a FunctionDecl) -> Result<(), RegisterError> {
        let is_getter = decl.flags.contains(CommonFlags::GET);
        let mut flags = decl.flags;
        if !flags.contains(CommonFlags::STATIC) {
            flags |= CommonFlags::INSTANCE;
        }

        let property = match self.existing_member(class, decl.name, flags) {
            Some(existing) if self.kind(existing) == ElementKind::PropertyPrototype => existing,
            Some(existing) => {
                let element = self.function_element(decl, flags, Some(class));
                return Err(self.duplicate(existing, &element));
            }
            None => {
                let element = Element::new(
                    ElementKind::PropertyPrototype,
                    decl.name,
                    String::new(),
                    ElementData::PropertyPrototype(PropertyPrototypeData {
                        getter: None,
                        setter: None,
                        class_prototype: class,
                        bound: FxHashMap::default(),
                    }),
                )
                .with_flags(flags - CommonFlags::GET - CommonFlags::SET, DecoratorFlags::empty())
                .with_span(decl.name_span);
                self.register_prototype(class, element)?
            }
        };

        let taken = self.property_prototype(property).and_then(|p| {
            if is_getter {
                p.getter
            } else {
                p.setter
            }
        });
        let mut element = self.function_element(decl, flags, Some(class));
        if let Some(existing) = taken {
            return Err(self.duplicate(existing, &element));
        }
        element.parent = Some(class);
        let suffix = mangle::accessor(self.str(decl.name), is_getter);
        element.internal_name = self.child_internal_name(class, flags, &suffix);
        let accessor = self.alloc(element);
        if let Some(p) = self.property_prototype_mut(property) {
            if is_getter {
                p.getter = Some(accessor);
            } else {
                p.setter = Some(accessor);
            }
        }
        Ok(())
    }

    pub(crate) fn function_element(
        &self,
        decl: &'a FunctionDecl,
        mut flags: CommonFlags,
        class_prototype: Option<ElementId>,
    ) -> Element<'a> {
        if !decl.type_params.is_empty() {
            flags |= CommonFlags::GENERIC;
        }
        Element::new(
            ElementKind::FunctionPrototype,
            decl.name,
            String::new(),
            ElementData::FunctionPrototype(FunctionPrototypeData {
                decl,
                class_prototype,
                bound_class: None,
                unbound: None,
                bound: FxHashMap::default(),
                instances: FxHashMap::default(),
                overloads: Vec::new(),
            }),
        )
        .with_flags(flags, decl.decorators)
        .with_span(decl.name_span)
    }

    fn register_function(&mut self, parent: ElementId, decl: &'a FunctionDecl) -> Result<ElementId, RegisterError> {
        let element = self.function_element(decl, decl.flags, None);
        self.register_prototype(parent, element)
    }

    fn register_variable(&mut self, parent: ElementId, decl: &'a VariableDecl) -> Result<ElementId, RegisterError> {
        let element = Element::new(
            ElementKind::Global,
            decl.name,
            String::new(),
            ElementData::Global(GlobalData {
                decl: GlobalDecl::Variable(decl),
                ty: None,
                state: ResolutionState::Pending,
            }),
        )
        .with_flags(decl.flags, decl.decorators)
        .with_span(decl.name_span);
        self.register_prototype(parent, element)
    }

    fn register_enum(&mut self, parent: ElementId, decl: &'a EnumDecl) -> Result<ElementId, RegisterError> {
        let element = Element::new(ElementKind::Enum, decl.name, String::new(), ElementData::Enum(EnumData { decl }))
            .with_flags(decl.flags, DecoratorFlags::empty())
            .with_span(decl.name_span);
        let id = self.register_prototype(parent, element)?;

        let mut next = 0i64;
        for value_decl in &decl.values {
            let value = value_decl
                .initializer
                .and_then(|init| self.constant_integer(init))
                .unwrap_or(next);
            next = value.wrapping_add(1);
            let element = Element::new(
                ElementKind::EnumValue,
                value_decl.name,
                String::new(),
                ElementData::EnumValue(EnumValueData {
                    decl: value_decl,
                    value,
                }),
            )
            .with_flags(CommonFlags::CONST | CommonFlags::STATIC, DecoratorFlags::empty())
            .with_span(value_decl.name_span);
            if let Err(err) = self.register_prototype(id, element) {
                self.report(err.into());
            }
        }
        Ok(id)
    }

    /// Integer value of a literal or negated literal.
    fn constant_integer(&self, expr: ExprId) -> Option<i64> {
        match &self.arena().get(expr).kind {
            ExprKind::Literal(Literal::Integer(value)) => Some(*value),
            ExprKind::Unary {
                op: UnaryOp::Minus,
                operand,
            } => self.constant_integer(*operand).map(i64::wrapping_neg),
            ExprKind::Paren(inner) => self.constant_integer(*inner),
            _ => None,
        }
    }

    /// Namespaces merge with namespaces, and add their members to an
    /// existing class, enum or function of the same name.
    fn register_namespace(
        &mut self,
        parent: ElementId,
        decl: &'a NamespaceDecl,
        links: &mut Vec<PendingLink<'a>>,
    ) -> Result<(), RegisterError> {
        let target = match self.existing_member(parent, decl.name, decl.flags) {
            Some(existing) => match self.kind(existing) {
                ElementKind::Namespace => {
                    if let ElementData::Namespace(data) = &mut self.element_mut(existing).data {
                        data.decls.push(decl);
                    }
                    existing
                }
                ElementKind::ClassPrototype | ElementKind::Enum | ElementKind::FunctionPrototype => existing,
                _ => {
                    return Err(RegisterError::Duplicate {
                        name: self.str(decl.name).to_owned(),
                        span: decl.name_span,
                        previous: self.element(existing).span,
                    })
                }
            },
            None => {
                let element = Element::new(
                    ElementKind::Namespace,
                    decl.name,
                    String::new(),
                    ElementData::Namespace(NamespaceData { decls: vec![decl] }),
                )
                .with_flags(decl.flags, DecoratorFlags::empty())
                .with_span(decl.name_span);
                self.register_prototype(parent, element)?
            }
        };
        for item in &decl.items {
            self.register_item(target, item, links);
        }
        Ok(())
    }

    fn register_type_alias(&mut self, parent: ElementId, decl: &'a TypeAliasDecl) -> Result<ElementId, RegisterError> {
        let mut flags = decl.flags;
        if !decl.type_params.is_empty() {
            flags |= CommonFlags::GENERIC;
        }
        let element = Element::new(
            ElementKind::TypeDefinition,
            decl.name,
            String::new(),
            ElementData::TypeDefinition(TypeDefinitionData { decl }),
        )
        .with_flags(flags, DecoratorFlags::empty())
        .with_span(decl.name_span);
        self.register_prototype(parent, element)
    }

    // === Expressions ===

    /// Register the function of a function expression under `scope`, once
    /// per expression. Anonymous functions are named `anonymous|N`.
    pub fn register_function_expression(
        &mut self,
        scope: ElementId,
        expr: ExprId,
        decl: &'a FunctionDecl,
    ) -> ElementId {
        if let Some(id) = self.expression_element(expr) {
            return id;
        }
        let mut element = self.function_element(decl, decl.flags, None);
        element.internal_name = self.expression_internal_name(scope, decl.name);
        if decl.name == Name::EMPTY {
            element.name = self.intern(ANONYMOUS);
        }
        element.parent = Some(scope);
        let id = self.alloc(element);
        self.expression_elements.insert(expr, id);
        trace!(name = %self.internal_name(id), "function expression registered");
        id
    }

    /// Register the class of a class expression under `scope`, once per
    /// expression, together with its members.
    pub fn register_class_expression(&mut self, scope: ElementId, expr: ExprId, decl: &'a ClassDecl) -> ElementId {
        if let Some(id) = self.expression_element(expr) {
            return id;
        }
        let mut flags = decl.flags;
        if !decl.type_params.is_empty() {
            flags |= CommonFlags::GENERIC;
        }
        let name = if decl.name == Name::EMPTY {
            self.intern(ANONYMOUS)
        } else {
            decl.name
        };
        let internal_name = self.expression_internal_name(scope, decl.name);
        let element = Element::new(
            ElementKind::ClassPrototype,
            name,
            internal_name,
            ElementData::ClassPrototype(ClassPrototypeData {
                decl,
                instance_members: FxHashMap::default(),
                member_order: Vec::new(),
                constructor: None,
                operators: FxHashMap::default(),
                instances: FxHashMap::default(),
            }),
        )
        .with_parent(scope)
        .with_flags(flags, decl.decorators)
        .with_span(decl.name_span);
        let id = self.alloc(element);
        self.expression_elements.insert(expr, id);
        self.register_class_members(id, decl);
        id
    }

    /// `scope~name|N`, numbered per scope in registration order.
    fn expression_internal_name(&self, scope: ElementId, name: Name) -> String {
        let index = self
            .expression_elements
            .values()
            .filter(|&&id| self.element(id).parent == Some(scope))
            .count();
        let base = if name == Name::EMPTY {
            ANONYMOUS
        } else {
            self.str(name)
        };
        mangle::member(
            self.internal_name(scope),
            MemberPosition::Inner,
            &mangle::indexed(base, index),
        )
    }

    // === Imports and exports ===

    fn foreign_file(&self, path: &str, span: Span) -> Result<ElementId, RegisterError> {
        self.file(path).ok_or_else(|| RegisterError::FileNotFound {
            path: path.to_owned(),
            span,
        })
    }

    fn queue_import(
        &mut self,
        file: ElementId,
        decl: &'a ImportDecl,
        links: &mut Vec<PendingLink<'a>>,
    ) -> Result<(), RegisterError> {
        let foreign = self.foreign_file(&decl.path, decl.span)?;
        if let Some((local, span)) = decl.namespace {
            self.bind_import(file, local, foreign, span)?;
        }
        links.extend(decl.members.iter().map(|member| PendingLink::Import {
            file,
            foreign,
            path: decl.path.as_str(),
            member,
        }));
        Ok(())
    }

    fn queue_export(
        &mut self,
        file: ElementId,
        decl: &'a ExportDecl,
        links: &mut Vec<PendingLink<'a>>,
    ) -> Result<(), RegisterError> {
        match &decl.path {
            Some(path) => {
                let foreign = self.foreign_file(path, decl.span)?;
                links.extend(decl.members.iter().map(|member| PendingLink::ReExport {
                    file,
                    foreign,
                    path: path.as_str(),
                    member,
                }));
            }
            None => links.extend(
                decl.members
                    .iter()
                    .map(|member| PendingLink::ExportLocal { file, member }),
            ),
        }
        Ok(())
    }

    fn add_export_star(&mut self, file: ElementId, path: &str, span: Span) -> Result<(), RegisterError> {
        let foreign = self.foreign_file(path, span)?;
        if let Some(data) = self.file_data_mut(file) {
            if !data.export_stars.contains(&foreign) {
                data.export_stars.push(foreign);
            }
        }
        Ok(())
    }

    /// Make `target` visible in `file` as `local`.
    fn bind_import(&mut self, file: ElementId, local: Name, target: ElementId, span: Span) -> Result<(), RegisterError> {
        if let Some(&existing) = self.element(file).members.get(&local) {
            if existing == target {
                return Ok(());
            }
            return Err(RegisterError::Duplicate {
                name: self.str(local).to_owned(),
                span,
                previous: self.element(existing).span,
            });
        }
        self.element_mut(file).members.insert(local, target);
        Ok(())
    }

    /// Resolve queued links until no further progress is made; whatever is
    /// left names nothing.
    fn link(&mut self, mut pending: Vec<PendingLink<'a>>) {
        loop {
            let before = pending.len();
            let mut remaining = Vec::with_capacity(before);
            for link in pending {
                match self.try_link(link) {
                    Ok(true) => {}
                    Ok(false) => remaining.push(link),
                    Err(err) => {
                        self.report(err.into());
                    }
                }
            }
            pending = remaining;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        for link in pending {
            let err = match link {
                PendingLink::Import { path, member, .. } => RegisterError::ImportNotFound {
                    path: path.to_owned(),
                    name: self.str(member.foreign).to_owned(),
                    span: member.span,
                },
                PendingLink::ReExport { path, member, .. } => RegisterError::ImportNotFound {
                    path: path.to_owned(),
                    name: self.str(member.local).to_owned(),
                    span: member.span,
                },
                PendingLink::ExportLocal { member, .. } => RegisterError::ExportNotFound {
                    name: self.str(member.local).to_owned(),
                    span: member.span,
                },
            };
            let diagnostic: Diagnostic = err.into();
            self.report(diagnostic);
        }
    }

    fn try_link(&mut self, link: PendingLink<'a>) -> Result<bool, RegisterError> {
        match link {
            PendingLink::Import {
                file,
                foreign,
                member,
                ..
            } => match self.lookup_export(foreign, member.foreign) {
                Some(target) => self.bind_import(file, member.local, target, member.span).map(|()| true),
                None => Ok(false),
            },
            PendingLink::ExportLocal { file, member } => {
                match self.element(file).members.get(&member.local).copied() {
                    Some(target) => {
                        if let Some(data) = self.file_data_mut(file) {
                            data.exports.insert(member.exported, target);
                        }
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            PendingLink::ReExport {
                file,
                foreign,
                member,
                ..
            } => match self.lookup_export(foreign, member.local) {
                Some(target) => {
                    if let Some(data) = self.file_data_mut(file) {
                        data.exports.insert(member.exported, target);
                    }
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }
}

/// Whether two function declarations would be indistinguishable overloads.
fn same_function_shape(a: &FunctionDecl, b: &FunctionDecl) -> bool {
    a.type_params.len() == b.type_params.len() && Parameter::same_shapes(&a.params, &b.params)
}

#[cfg(test)]
mod tests;
