//! Type relations: assignability and common denominators.
//!
//! Value types follow a widening lattice. Reference types defer to the
//! program's class hierarchy through [`TypeContext`], which also resolves
//! signature ids and class names for display.

use tide_ir::ElementId;

use crate::{NameStyle, Signature, SignatureId, Type, TypeKind};

/// What type relations need to know about the program.
pub trait TypeContext {
    /// Look up an interned signature.
    fn signature(&self, id: SignatureId) -> &Signature;

    /// Whether `class` is `target`, extends it (transitively) or implements
    /// it (transitively).
    fn is_class_assignable(&self, class: ElementId, target: ElementId) -> bool;

    /// Name of a class instance.
    fn class_name(&self, class: ElementId, style: NameStyle) -> &str;
}

impl Type {
    /// Whether a value of this type can be assigned to `target` without an
    /// explicit conversion.
    ///
    /// With `signedness_matters`, integers only widen within the same
    /// signedness (`bool` is exempt).
    pub fn is_assignable_to(self, target: Type, signedness_matters: bool, ctx: &dyn TypeContext) -> bool {
        if self == target {
            return true;
        }
        if self.is_reference() {
            if !target.is_reference() || (self.is_nullable() && !target.is_nullable()) {
                return false;
            }
            if let Some(class) = self.class_reference() {
                return target
                    .class_reference()
                    .is_some_and(|target_class| ctx.is_class_assignable(class, target_class));
            }
            if let Some(signature) = self.signature_reference() {
                return target.signature_reference().is_some_and(|target_signature| {
                    signature == target_signature
                        || ctx
                            .signature(signature)
                            .is_assignable_to(ctx.signature(target_signature), ctx)
                });
            }
            if self.is_external_reference() && target.is_external_reference() {
                return self.kind() == target.kind()
                    || (target.kind() == TypeKind::Anyref && self.kind() != TypeKind::Externref);
            }
            return false;
        }
        if target.is_reference() {
            return false;
        }
        if self.is_integer_value() {
            if target.is_integer_value() {
                return (!signedness_matters
                    || self.is_bool()
                    || self.is_signed() == target.is_signed())
                    && self.size() <= target.size();
            }
            return match target.kind() {
                TypeKind::F32 => self.size() <= 23,
                TypeKind::F64 => self.size() <= 52,
                _ => false,
            };
        }
        if self.is_float_value() {
            return target.is_float_value() && self.size() <= target.size();
        }
        if self.is_vector() {
            return target.is_vector() && self.size() == target.size();
        }
        false
    }
}

/// The smallest type both `a` and `b` widen to, if any.
///
/// Reference operands are compared without nullability; the result is
/// nullable if either operand is.
pub fn common_denominator(a: Type, b: Type, signedness_matters: bool, ctx: &dyn TypeContext) -> Option<Type> {
    if a.is_reference() && b.is_reference() {
        let nullable = a.is_nullable() || b.is_nullable();
        let (left, right) = (a.non_nullable(), b.non_nullable());
        let common = if right.is_assignable_to(left, signedness_matters, ctx) {
            left
        } else if left.is_assignable_to(right, signedness_matters, ctx) {
            right
        } else {
            return None;
        };
        return Some(if nullable { common.as_nullable() } else { common });
    }
    if b.is_assignable_to(a, signedness_matters, ctx) {
        Some(a)
    } else if a.is_assignable_to(b, signedness_matters, ctx) {
        Some(b)
    } else {
        None
    }
}

impl Signature {
    /// Whether a function of this signature can stand in for `target`.
    ///
    /// Parameters are contravariant, the return type covariant. Both must
    /// agree on `this`, on the rest flag and on the parameter count, and this
    /// signature may not require more arguments than `target` guarantees.
    pub fn is_assignable_to(&self, target: &Signature, ctx: &dyn TypeContext) -> bool {
        match (self.this_type, target.this_type) {
            (Some(this_type), Some(target_this)) => {
                if !target_this.is_assignable_to(this_type, true, ctx) {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }
        if self.has_rest != target.has_rest
            || self.params.len() != target.params.len()
            || self.required_params > target.required_params
        {
            return false;
        }
        let params_ok = self
            .params
            .iter()
            .zip(&target.params)
            .all(|(&own, &theirs)| theirs.is_assignable_to(own, true, ctx));
        params_ok && (self.ret == target.ret || self.ret.is_assignable_to(target.ret, true, ctx))
    }
}
