//! Name lookup over the element graph.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tide_ir::{ElementId, Name};

use crate::element::{ElementData, ElementKind};
use crate::Program;

impl Program<'_> {
    /// Lexical lookup of `name` starting at `scope`.
    ///
    /// Walks the parent chain, nearest scope first. A class instance on the
    /// chain contributes the static members of its prototype and of every
    /// base class before the walk continues with its lexical parent.
    /// Elements in the global scope are found last.
    pub fn lookup(&self, scope: ElementId, name: Name) -> Option<ElementId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let element = self.element(id);
            let found = match element.kind {
                ElementKind::Class | ElementKind::Interface => self.lookup_static(id, name),
                _ => element.members.get(&name).copied(),
            };
            if found.is_some() {
                return found;
            }
            current = element.parent;
        }
        self.global_scope().get(&name).copied()
    }

    /// Static member of a class instance: its prototype's statics, then its
    /// bases' statics.
    pub fn lookup_static(&self, class: ElementId, name: Name) -> Option<ElementId> {
        self.base_chain(class).find_map(|id| {
            let prototype = self.class(id)?.prototype;
            self.element(prototype).members.get(&name).copied()
        })
    }

    /// Member named `name` exported by `file`, following `export *`
    /// re-exports.
    pub fn lookup_export(&self, file: ElementId, name: Name) -> Option<ElementId> {
        let mut visited: FxHashSet<ElementId> = FxHashSet::default();
        let mut stack: SmallVec<[ElementId; 4]> = SmallVec::new();
        stack.push(file);
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(data) = self.file_data(id) else {
                continue;
            };
            if let Some(&found) = data.exports.get(&name) {
                return Some(found);
            }
            stack.extend(data.export_stars.iter().rev().copied());
        }
        None
    }

    /// Member of a namespace-like element accessed with `target.name`:
    /// exports of a file, members of a namespace or enum, statics of a class.
    pub fn lookup_member(&self, target: ElementId, name: Name) -> Option<ElementId> {
        let element = self.element(target);
        match &element.data {
            ElementData::File(_) => self.lookup_export(target, name),
            ElementData::Class(_) => self.lookup_static(target, name),
            _ => element.members.get(&name).copied(),
        }
    }

    /// Instance member of a class instance, inherited members included.
    #[inline]
    pub fn lookup_instance_member(&self, class: ElementId, name: Name) -> Option<ElementId> {
        self.element(class).members.get(&name).copied()
    }
}

#[cfg(test)]
mod tests;
