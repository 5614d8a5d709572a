//! The program arena and its accessors.

use rustc_hash::FxHashMap;
use tide_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use tide_ir::{ElementId, ExprArena, ExprId, Name, Source, StringInterner};
use tide_types::{Signature, SignatureId, SignatureTable, Target, Type};

use crate::element::{
    ClassData, ClassPrototypeData, ContextualTypes, Element, ElementData, ElementKind, FieldData,
    FieldPrototypeData, FileData, FunctionData, FunctionPrototypeData, GlobalData, LocalData,
    PropertyData, PropertyPrototypeData,
};
use crate::Options;

/// Reports of an instance first resolved during a speculative attempt,
/// held until the instance is used for real.
#[derive(Clone, Debug, Default)]
pub struct DeferredReports {
    pub diagnostics: Vec<Diagnostic>,
    /// Instances created while this one resolved, deferred the same way.
    pub nested: Vec<ElementId>,
}

/// Every element of a compilation, plus the tables shared by resolution.
///
/// Borrows the parsed sources, the expression arena and the interner for
/// `'a`; prototypes point straight into those declarations.
pub struct Program<'a> {
    options: Options,
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    sources: &'a [Source],
    elements: Vec<Element<'a>>,
    /// Internal name to element, locals excluded.
    by_internal_name: FxHashMap<String, ElementId>,
    /// Normalized path to file element.
    files: FxHashMap<String, ElementId>,
    /// `@global` elements, visible from every scope.
    global_scope: FxHashMap<Name, ElementId>,
    /// Primitive type names and their aliases.
    builtin_types: FxHashMap<Name, Type>,
    signatures: SignatureTable,
    /// Elements registered for function and class expressions.
    pub(crate) expression_elements: FxHashMap<ExprId, ElementId>,
    diagnostics: DiagnosticQueue,
    deferred: FxHashMap<ElementId, DeferredReports>,
    pub(crate) initialized: bool,
}

impl<'a> Program<'a> {
    pub fn new(
        options: Options,
        interner: &'a StringInterner,
        arena: &'a ExprArena,
        sources: &'a [Source],
    ) -> Self {
        let builtin_types = builtin_types(interner, options.target);
        Program {
            options,
            interner,
            arena,
            sources,
            elements: Vec::new(),
            by_internal_name: FxHashMap::default(),
            files: FxHashMap::default(),
            global_scope: FxHashMap::default(),
            builtin_types,
            signatures: SignatureTable::new(),
            expression_elements: FxHashMap::default(),
            diagnostics: DiagnosticQueue::new(),
            deferred: FxHashMap::default(),
            initialized: false,
        }
    }

    #[must_use]
    pub fn with_diagnostic_config(mut self, config: DiagnosticConfig) -> Self {
        self.diagnostics = DiagnosticQueue::with_config(config);
        self
    }

    // === Shared inputs ===

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.options.target
    }

    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    #[inline]
    pub fn arena(&self) -> &'a ExprArena {
        self.arena
    }

    #[inline]
    pub fn sources(&self) -> &'a [Source] {
        self.sources
    }

    /// Intern a string.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// The string behind a name.
    #[inline]
    pub fn str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    // === Elements ===

    pub(crate) fn alloc(&mut self, element: Element<'a>) -> ElementId {
        let id = ElementId::from_raw(
            u32::try_from(self.elements.len())
                .unwrap_or_else(|_| panic!("element arena exceeded u32::MAX entries")),
        );
        // An instance of a non-generic prototype shares its prototype's
        // internal name and shadows it here.
        if element.kind != ElementKind::Local {
            self.by_internal_name.insert(element.internal_name.clone(), id);
        }
        self.elements.push(element);
        id
    }

    /// Get an element.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this program.
    #[inline]
    pub fn element(&self, id: ElementId) -> &Element<'a> {
        &self.elements[id.index()]
    }

    #[inline]
    pub fn element_mut(&mut self, id: ElementId) -> &mut Element<'a> {
        &mut self.elements[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.element(id).kind
    }

    /// Simple name as written, e.g. `Box<i32>` for an instance.
    #[inline]
    pub fn name_of(&self, id: ElementId) -> &'static str {
        self.str(self.element(id).name)
    }

    #[inline]
    pub fn internal_name(&self, id: ElementId) -> &str {
        &self.element(id).internal_name
    }

    /// Number of allocated elements. Ids below this are valid.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element<'a>)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, element)| (ElementId::from_raw(i as u32), element))
    }

    /// Find an element by internal name. Locals are not indexed; instances
    /// win over prototypes of the same name.
    pub fn element_by_internal_name(&self, internal_name: &str) -> Option<ElementId> {
        self.by_internal_name.get(internal_name).copied()
    }

    /// File element registered for a path.
    pub fn file(&self, path: &str) -> Option<ElementId> {
        self.files.get(path).copied()
    }

    pub(crate) fn insert_file(&mut self, path: &str, file: ElementId) -> Option<ElementId> {
        self.files.insert(path.to_owned(), file)
    }

    #[inline]
    pub fn global_scope(&self) -> &FxHashMap<Name, ElementId> {
        &self.global_scope
    }

    pub(crate) fn global_scope_mut(&mut self) -> &mut FxHashMap<Name, ElementId> {
        &mut self.global_scope
    }

    /// Type of a builtin type name such as `i32`, `number` or `usize`.
    #[inline]
    pub fn builtin_type(&self, name: Name) -> Option<Type> {
        self.builtin_types.get(&name).copied()
    }

    /// Element registered for a function or class expression.
    pub fn expression_element(&self, expr: ExprId) -> Option<ElementId> {
        self.expression_elements.get(&expr).copied()
    }

    /// Reference type of a class instance for the program's target.
    #[inline]
    pub fn class_type(&self, class: ElementId) -> Type {
        Type::class(class, self.options.target)
    }

    /// Type-parameter bindings of a function or class instance.
    pub fn contextual_types(&self, id: ElementId) -> Option<&ContextualTypes> {
        match &self.element(id).data {
            ElementData::Function(data) => Some(&data.ctx_types),
            ElementData::Class(data) => Some(&data.ctx_types),
            _ => None,
        }
    }

    // === Signatures ===

    #[inline]
    pub fn intern_signature(&mut self, signature: Signature) -> SignatureId {
        self.signatures.intern(signature)
    }

    #[inline]
    pub fn signature_of(&self, id: SignatureId) -> &Signature {
        self.signatures.get(id)
    }

    #[inline]
    pub fn signatures(&self) -> &SignatureTable {
        &self.signatures
    }

    // === Diagnostics ===

    /// Queue a diagnostic. Returns false if it was a duplicate or over the
    /// error limit.
    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        self.diagnostics.push(diagnostic)
    }

    #[inline]
    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    #[inline]
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticQueue {
        &mut self.diagnostics
    }

    /// Hold `reports` on `instance` instead of queueing them.
    pub fn defer_reports(&mut self, instance: ElementId, reports: DeferredReports) {
        if !reports.diagnostics.is_empty() || !reports.nested.is_empty() {
            self.deferred.insert(instance, reports);
        }
    }

    /// Reports held on `instance`, removed so they surface once.
    pub fn take_deferred_reports(&mut self, instance: ElementId) -> Option<DeferredReports> {
        self.deferred.remove(&instance)
    }

    pub fn has_deferred_reports(&self, instance: ElementId) -> bool {
        self.deferred.contains_key(&instance)
    }
}

macro_rules! data_accessors {
    ($lt:lifetime; $($(#[$meta:meta])* $get:ident, $get_mut:ident => $variant:ident($ty:ty);)*) => {
        impl<$lt> Program<$lt> {
            $(
                $(#[$meta])*
                #[inline]
                pub fn $get(&self, id: ElementId) -> Option<&$ty> {
                    match &self.element(id).data {
                        ElementData::$variant(data) => Some(data),
                        _ => None,
                    }
                }

                #[inline]
                pub fn $get_mut(&mut self, id: ElementId) -> Option<&mut $ty> {
                    match &mut self.element_mut(id).data {
                        ElementData::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            )*
        }
    };
}

data_accessors! { 'a;
    global, global_mut => Global(GlobalData<'a>);
    local, local_mut => Local(LocalData);
    function_prototype, function_prototype_mut => FunctionPrototype(FunctionPrototypeData<'a>);
    function, function_mut => Function(FunctionData);
    /// Class or interface prototype data.
    class_prototype, class_prototype_mut => ClassPrototype(ClassPrototypeData<'a>);
    /// Class or interface instance data.
    class, class_mut => Class(ClassData);
    field_prototype, field_prototype_mut => FieldPrototype(FieldPrototypeData<'a>);
    field, field_mut => Field(FieldData);
    property_prototype, property_prototype_mut => PropertyPrototype(PropertyPrototypeData);
    property, property_mut => Property(PropertyData);
    file_data, file_data_mut => File(FileData<'a>);
}

fn builtin_types(interner: &StringInterner, target: Target) -> FxHashMap<Name, Type> {
    let table = [
        ("bool", Type::BOOL),
        ("boolean", Type::BOOL),
        ("i8", Type::I8),
        ("i16", Type::I16),
        ("i32", Type::I32),
        ("i64", Type::I64),
        ("isize", target.isize_type()),
        ("u8", Type::U8),
        ("u16", Type::U16),
        ("u32", Type::U32),
        ("u64", Type::U64),
        ("usize", target.usize_type()),
        ("f32", Type::F32),
        ("f64", Type::F64),
        ("number", Type::F64),
        ("v128", Type::V128),
        ("funcref", Type::FUNCREF),
        ("externref", Type::EXTERNREF),
        ("anyref", Type::ANYREF),
        ("void", Type::VOID),
    ];
    table
        .into_iter()
        .map(|(name, ty)| (interner.intern(name), ty))
        .collect()
}

#[cfg(test)]
mod tests;
