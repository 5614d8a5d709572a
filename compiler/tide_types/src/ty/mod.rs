//! Resolved type values.
//!
//! A [`Type`] is a small `Copy` value: kind, flags, bit size and an optional
//! reference to a class instance or an interned signature. Primitive types
//! are associated constants. The nullable variant of a reference type is the
//! same value with [`TypeFlags::NULLABLE`] set, so the pair never needs a
//! cache.

use std::fmt;

use tide_ir::ElementId;

use crate::{SignatureId, TypeContext, TypeFlags};

/// Compilation target. Drives the width of `isize`/`usize` and references.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    #[default]
    Wasm32,
    Wasm64,
}

impl Target {
    /// The `usize` type for this target.
    #[inline]
    pub const fn usize_type(self) -> Type {
        match self {
            Target::Wasm32 => Type::USIZE32,
            Target::Wasm64 => Type::USIZE64,
        }
    }

    /// The `isize` type for this target.
    #[inline]
    pub const fn isize_type(self) -> Type {
        match self {
            Target::Wasm32 => Type::ISIZE32,
            Target::Wasm64 => Type::ISIZE64,
        }
    }
}

/// Type kinds.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    V128,
    Funcref,
    Externref,
    Anyref,
    Void,
}

impl TypeKind {
    /// Source-level name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Bool => "bool",
            TypeKind::I8 => "i8",
            TypeKind::I16 => "i16",
            TypeKind::I32 => "i32",
            TypeKind::I64 => "i64",
            TypeKind::Isize => "isize",
            TypeKind::U8 => "u8",
            TypeKind::U16 => "u16",
            TypeKind::U32 => "u32",
            TypeKind::U64 => "u64",
            TypeKind::Usize => "usize",
            TypeKind::F32 => "f32",
            TypeKind::F64 => "f64",
            TypeKind::V128 => "v128",
            TypeKind::Funcref => "funcref",
            TypeKind::Externref => "externref",
            TypeKind::Anyref => "anyref",
            TypeKind::Void => "void",
        }
    }
}

/// What a reference type points to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    /// A class or interface instance.
    Class(ElementId),
    /// A function of the given signature.
    Signature(SignatureId),
}

/// A resolved type.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Type {
    kind: TypeKind,
    flags: TypeFlags,
    /// Size in bits.
    size: u32,
    reference: Option<TypeRef>,
}

impl Type {
    const fn primitive(kind: TypeKind, flags: TypeFlags, size: u32) -> Self {
        Type {
            kind,
            flags,
            size,
            reference: None,
        }
    }

    pub const BOOL: Type = Type::primitive(
        TypeKind::Bool,
        TypeFlags::UNSIGNED.union(TypeFlags::INTEGER_VALUE),
        1,
    );
    pub const I8: Type = Type::primitive(
        TypeKind::I8,
        TypeFlags::SIGNED.union(TypeFlags::SHORT).union(TypeFlags::INTEGER_VALUE),
        8,
    );
    pub const I16: Type = Type::primitive(
        TypeKind::I16,
        TypeFlags::SIGNED.union(TypeFlags::SHORT).union(TypeFlags::INTEGER_VALUE),
        16,
    );
    pub const I32: Type = Type::primitive(
        TypeKind::I32,
        TypeFlags::SIGNED.union(TypeFlags::INTEGER_VALUE),
        32,
    );
    pub const I64: Type = Type::primitive(
        TypeKind::I64,
        TypeFlags::SIGNED.union(TypeFlags::LONG).union(TypeFlags::INTEGER_VALUE),
        64,
    );
    pub const ISIZE32: Type = Type::primitive(
        TypeKind::Isize,
        TypeFlags::SIGNED
            .union(TypeFlags::POINTER)
            .union(TypeFlags::VARIABLE)
            .union(TypeFlags::INTEGER_VALUE),
        32,
    );
    pub const ISIZE64: Type = Type::primitive(
        TypeKind::Isize,
        TypeFlags::SIGNED
            .union(TypeFlags::LONG)
            .union(TypeFlags::POINTER)
            .union(TypeFlags::VARIABLE)
            .union(TypeFlags::INTEGER_VALUE),
        64,
    );
    pub const U8: Type = Type::primitive(
        TypeKind::U8,
        TypeFlags::UNSIGNED.union(TypeFlags::SHORT).union(TypeFlags::INTEGER_VALUE),
        8,
    );
    pub const U16: Type = Type::primitive(
        TypeKind::U16,
        TypeFlags::UNSIGNED.union(TypeFlags::SHORT).union(TypeFlags::INTEGER_VALUE),
        16,
    );
    pub const U32: Type = Type::primitive(
        TypeKind::U32,
        TypeFlags::UNSIGNED.union(TypeFlags::INTEGER_VALUE),
        32,
    );
    pub const U64: Type = Type::primitive(
        TypeKind::U64,
        TypeFlags::UNSIGNED.union(TypeFlags::LONG).union(TypeFlags::INTEGER_VALUE),
        64,
    );
    pub const USIZE32: Type = Type::primitive(
        TypeKind::Usize,
        TypeFlags::UNSIGNED
            .union(TypeFlags::POINTER)
            .union(TypeFlags::VARIABLE)
            .union(TypeFlags::INTEGER_VALUE),
        32,
    );
    pub const USIZE64: Type = Type::primitive(
        TypeKind::Usize,
        TypeFlags::UNSIGNED
            .union(TypeFlags::LONG)
            .union(TypeFlags::POINTER)
            .union(TypeFlags::VARIABLE)
            .union(TypeFlags::INTEGER_VALUE),
        64,
    );
    pub const F32: Type = Type::primitive(
        TypeKind::F32,
        TypeFlags::SIGNED.union(TypeFlags::FLOAT_VALUE),
        32,
    );
    pub const F64: Type = Type::primitive(
        TypeKind::F64,
        TypeFlags::SIGNED.union(TypeFlags::LONG).union(TypeFlags::FLOAT_VALUE),
        64,
    );
    pub const V128: Type = Type::primitive(
        TypeKind::V128,
        TypeFlags::VECTOR.union(TypeFlags::VALUE),
        128,
    );
    pub const FUNCREF: Type = Type::primitive(
        TypeKind::Funcref,
        TypeFlags::EXTERNAL
            .union(TypeFlags::NULLABLE)
            .union(TypeFlags::REFERENCE),
        0,
    );
    pub const EXTERNREF: Type = Type::primitive(
        TypeKind::Externref,
        TypeFlags::EXTERNAL
            .union(TypeFlags::NULLABLE)
            .union(TypeFlags::REFERENCE),
        0,
    );
    pub const ANYREF: Type = Type::primitive(
        TypeKind::Anyref,
        TypeFlags::EXTERNAL
            .union(TypeFlags::NULLABLE)
            .union(TypeFlags::REFERENCE),
        0,
    );
    pub const VOID: Type = Type::primitive(TypeKind::Void, TypeFlags::empty(), 0);

    /// Non-nullable reference to a class instance.
    pub const fn class(class: ElementId, target: Target) -> Self {
        let usize_type = target.usize_type();
        Type {
            kind: TypeKind::Usize,
            flags: usize_type.flags.difference(TypeFlags::VALUE).union(TypeFlags::REFERENCE),
            size: usize_type.size,
            reference: Some(TypeRef::Class(class)),
        }
    }

    /// Non-nullable reference to a function of the given signature.
    pub const fn function(signature: SignatureId) -> Self {
        Type {
            kind: TypeKind::Funcref,
            flags: TypeFlags::REFERENCE,
            size: 32,
            reference: Some(TypeRef::Signature(signature)),
        }
    }

    #[inline]
    pub const fn kind(self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub const fn flags(self) -> TypeFlags {
        self.flags
    }

    /// Size in bits.
    #[inline]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Size in bytes, rounded up.
    #[inline]
    pub const fn byte_size(self) -> u32 {
        self.size.div_ceil(8)
    }

    /// Log2 of the natural alignment.
    pub const fn align_log2(self) -> u32 {
        match self.byte_size() {
            0 | 1 => 0,
            2 => 1,
            3 | 4 => 2,
            5..=8 => 3,
            _ => 4,
        }
    }

    #[inline]
    pub const fn is(self, flags: TypeFlags) -> bool {
        self.flags.contains(flags)
    }

    #[inline]
    pub const fn is_value(self) -> bool {
        self.is(TypeFlags::VALUE)
    }

    #[inline]
    pub const fn is_integer_value(self) -> bool {
        self.is(TypeFlags::INTEGER_VALUE)
    }

    #[inline]
    pub const fn is_float_value(self) -> bool {
        self.is(TypeFlags::FLOAT_VALUE)
    }

    /// Integer or float value.
    #[inline]
    pub const fn is_numeric_value(self) -> bool {
        self.is_integer_value() || self.is_float_value()
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        self.is(TypeFlags::SIGNED)
    }

    #[inline]
    pub const fn is_reference(self) -> bool {
        self.is(TypeFlags::REFERENCE)
    }

    #[inline]
    pub const fn is_nullable(self) -> bool {
        self.is(TypeFlags::NULLABLE)
    }

    #[inline]
    pub const fn is_external_reference(self) -> bool {
        self.is(TypeFlags::EXTERNAL.union(TypeFlags::REFERENCE))
    }

    #[inline]
    pub const fn is_vector(self) -> bool {
        self.is(TypeFlags::VECTOR)
    }

    #[inline]
    pub fn is_void(self) -> bool {
        self.kind == TypeKind::Void
    }

    #[inline]
    pub fn is_bool(self) -> bool {
        self.kind == TypeKind::Bool
    }

    /// Class instance referenced by this type.
    #[inline]
    pub const fn class_reference(self) -> Option<ElementId> {
        match self.reference {
            Some(TypeRef::Class(class)) => Some(class),
            _ => None,
        }
    }

    /// Signature referenced by this type.
    #[inline]
    pub const fn signature_reference(self) -> Option<SignatureId> {
        match self.reference {
            Some(TypeRef::Signature(signature)) => Some(signature),
            _ => None,
        }
    }

    #[inline]
    pub const fn reference(self) -> Option<TypeRef> {
        self.reference
    }

    /// Nullable variant. Value types are returned unchanged.
    #[inline]
    pub const fn as_nullable(self) -> Self {
        if self.is_reference() {
            Type {
                flags: self.flags.union(TypeFlags::NULLABLE),
                ..self
            }
        } else {
            self
        }
    }

    /// Non-nullable variant.
    #[inline]
    pub const fn non_nullable(self) -> Self {
        Type {
            flags: self.flags.difference(TypeFlags::NULLABLE),
            ..self
        }
    }

    /// Render with display names (`Box<i32> | null`).
    pub fn display<'c>(self, ctx: &'c dyn TypeContext) -> TypeDisplay<'c> {
        TypeDisplay {
            ty: self,
            ctx,
            style: NameStyle::Display,
        }
    }

    /// Render with internal names, the canonical form used in instance keys.
    pub fn canonical(self, ctx: &dyn TypeContext) -> String {
        TypeDisplay {
            ty: self,
            ctx,
            style: NameStyle::Internal,
        }
        .to_string()
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reference {
            Some(TypeRef::Class(class)) => write!(f, "class {class:?}")?,
            Some(TypeRef::Signature(signature)) => write!(f, "fn {signature:?}")?,
            None => write!(f, "{}", self.kind.name())?,
        }
        if self.is_nullable() && self.reference.is_some() {
            write!(f, " | null")?;
        }
        Ok(())
    }
}

/// Which name of a class is rendered.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NameStyle {
    /// Source name including type arguments, e.g. `Box<i32>`.
    Display,
    /// Program-unique internal name, e.g. `main/Box<i32>`.
    Internal,
}

/// [`fmt::Display`] adapter for a type.
pub struct TypeDisplay<'c> {
    ty: Type,
    ctx: &'c dyn TypeContext,
    style: NameStyle,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty.reference {
            Some(TypeRef::Class(class)) => {
                f.write_str(self.ctx.class_name(class, self.style))?;
            }
            Some(TypeRef::Signature(id)) => {
                let signature = self.ctx.signature(id);
                f.write_str("(")?;
                let mut first = true;
                if let Some(this_type) = signature.this_type {
                    write!(f, "this: {}", self.nested(this_type))?;
                    first = false;
                }
                for (i, &param) in signature.params.iter().enumerate() {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    if signature.has_rest && i + 1 == signature.params.len() {
                        f.write_str("...")?;
                    }
                    write!(f, "{}", self.nested(param))?;
                    if i >= signature.required_params && !signature.has_rest {
                        f.write_str("?")?;
                    }
                }
                write!(f, ") => {}", self.nested(signature.ret))?;
            }
            None => f.write_str(self.ty.kind.name())?,
        }
        if self.ty.is_nullable() && !self.ty.is_external_reference() {
            f.write_str(" | null")?;
        }
        Ok(())
    }
}

impl TypeDisplay<'_> {
    fn nested(&self, ty: Type) -> Self {
        TypeDisplay {
            ty,
            ctx: self.ctx,
            style: self.style,
        }
    }
}
