//! Class hierarchy queries and the [`TypeContext`] the type model needs.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tide_ir::ElementId;
use tide_types::{NameStyle, Signature, SignatureId, TypeContext};

use crate::Program;

/// Iterator over a class instance and its bases, nearest first.
pub struct BaseChain<'p, 'a> {
    program: &'p Program<'a>,
    next: Option<ElementId>,
    /// Bounds the walk even if a failed resolution left a cycle behind.
    remaining: usize,
}

impl Iterator for BaseChain<'_, '_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self.program.class(current).and_then(|data| data.base);
        Some(current)
    }
}

impl<'a> Program<'a> {
    /// `class` followed by its base classes.
    pub fn base_chain(&self, class: ElementId) -> BaseChain<'_, 'a> {
        BaseChain {
            program: self,
            next: Some(class),
            remaining: self.element_count(),
        }
    }

    /// Whether `class` is `ancestor` or derives from it.
    pub fn extends_class(&self, class: ElementId, ancestor: ElementId) -> bool {
        self.base_chain(class).any(|id| id == ancestor)
    }

    /// Whether `class` is, extends or implements `target`, transitively.
    pub fn is_subtype_of(&self, class: ElementId, target: ElementId) -> bool {
        if class == target {
            return true;
        }
        let mut visited: FxHashSet<ElementId> = FxHashSet::default();
        let mut stack: SmallVec<[ElementId; 8]> = SmallVec::new();
        stack.push(class);
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(data) = self.class(id) {
                stack.extend(data.base);
                stack.extend(data.interfaces.iter().copied());
            }
        }
        false
    }
}

impl TypeContext for Program<'_> {
    fn signature(&self, id: SignatureId) -> &Signature {
        self.signature_of(id)
    }

    fn is_class_assignable(&self, class: ElementId, target: ElementId) -> bool {
        self.is_subtype_of(class, target)
    }

    fn class_name(&self, class: ElementId, style: NameStyle) -> &str {
        match style {
            NameStyle::Display => self.name_of(class),
            NameStyle::Internal => self.internal_name(class),
        }
    }
}

#[cfg(test)]
mod tests;
