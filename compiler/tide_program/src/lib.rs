//! Tide Program - the element graph the resolver works on.
//!
//! A [`Program`] owns every [`Element`] of a compilation in one arena:
//! files, namespaces, classes, functions, fields, properties and globals.
//! Declarations are registered as *prototypes* by [`Program::initialize`];
//! concrete *instances* (a generic class bound to type arguments, a method
//! bound to a class instance) are created lazily by the resolver and cached
//! on their prototype so that each `(prototype, type arguments)` pair has
//! exactly one instance for the lifetime of the program.
//!
//! # Internal names
//!
//! Every element has a program-unique internal name built from its parent
//! chain (see [`mangle`]):
//!
//! ```text
//! main/Box            class prototype in file `main`
//! main/Box<i32>       its instance for i32
//! main/Box<i32>#get   instance method bound to that instance
//! main/Box.create     static member
//! main/f|1            second overload of `f`
//! main/f~anonymous|0  function expression inside `f`
//! ```

mod element;
mod errors;
mod flow;
mod hierarchy;
mod initialize;
mod instances;
mod lookup;
pub mod mangle;
mod options;
mod program;

pub use element::{
    ClassData, ClassPrototypeData, ContextualTypes, Element, ElementData, ElementKind, EnumData,
    EnumValueData, FieldData, FieldPrototypeData, FieldSource, FileData, FunctionData,
    FunctionPrototypeData, GlobalData, GlobalDecl, IndexSignatureData, LocalData, NamespaceData,
    PropertyData, PropertyPrototypeData, ResolutionState, TypeDefinitionData,
};
pub use errors::RegisterError;
pub use flow::{BlockFlow, Flow};
pub use hierarchy::BaseChain;
pub use options::{Options, OverloadPolicy};
pub use program::{DeferredReports, Program};

#[cfg(test)]
mod test_support;
