//! A minimal class hierarchy for relation and display tests.

use rustc_hash::FxHashMap;
use tide_ir::ElementId;

use crate::{NameStyle, Signature, SignatureId, SignatureTable, TypeContext};

#[derive(Default)]
pub(crate) struct MockContext {
    pub(crate) signatures: SignatureTable,
    names: Vec<(String, String)>,
    supertypes: FxHashMap<ElementId, Vec<ElementId>>,
}

impl MockContext {
    /// Add a class with the given supertypes (base and interfaces).
    pub(crate) fn class(&mut self, name: &str, supertypes: &[ElementId]) -> ElementId {
        let id = ElementId::from_raw(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.names.push((name.to_owned(), format!("test/{name}")));
        self.supertypes.insert(id, supertypes.to_vec());
        id
    }
}

impl TypeContext for MockContext {
    fn signature(&self, id: SignatureId) -> &Signature {
        self.signatures.get(id)
    }

    fn is_class_assignable(&self, class: ElementId, target: ElementId) -> bool {
        class == target
            || self
                .supertypes
                .get(&class)
                .is_some_and(|supers| supers.iter().any(|&s| self.is_class_assignable(s, target)))
    }

    fn class_name(&self, class: ElementId, style: NameStyle) -> &str {
        let (display, internal) = &self.names[class.index()];
        match style {
            NameStyle::Display => display,
            NameStyle::Internal => internal,
        }
    }
}
