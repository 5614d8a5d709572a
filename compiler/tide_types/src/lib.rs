//! Tide Types - the resolved type and signature value model.
//!
//! - [`Type`]: a `Copy` descriptor of a primitive, class reference, function
//!   reference or host reference, with the nullable variant encoded as a flag
//! - [`Signature`] / [`SignatureTable`]: function shapes, interned so equal
//!   shapes share one [`SignatureId`]
//! - [`TypeContext`]: the program-side queries that assignability, common
//!   denominators and display need (class hierarchy, signatures, names)

mod flags;
mod relations;
mod signature;
mod ty;

pub use flags::TypeFlags;
pub use relations::{common_denominator, TypeContext};
pub use signature::{Signature, SignatureId, SignatureTable};
pub use ty::{NameStyle, Target, Type, TypeDisplay, TypeKind, TypeRef};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::SignatureId;
    tide_ir::static_assert_size!(SignatureId, 4);
}

#[cfg(test)]
mod test_support;
