//! Type property flags.
//!
//! Flags are fixed when a type value is constructed and answer the common
//! questions (is it an integer, is it a reference, may it be null) without
//! matching on the kind.

use bitflags::bitflags;

bitflags! {
    /// Properties of a [`Type`](crate::Type).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u32 {
        // === Numeric category (bits 0-7) ===

        /// Signed integer or float.
        const SIGNED = 1 << 0;
        /// Unsigned integer (including `bool`).
        const UNSIGNED = 1 << 1;
        /// Integer, including pointer-sized integers.
        const INTEGER = 1 << 2;
        /// Floating point.
        const FLOAT = 1 << 3;
        /// Size depends on the target (`isize`, `usize`, references).
        const VARIABLE = 1 << 4;
        /// Smaller than 32 bits.
        const SHORT = 1 << 5;
        /// Larger than 32 bits.
        const LONG = 1 << 6;
        /// Pointer-sized.
        const POINTER = 1 << 7;

        // === Representation (bits 8-15) ===

        /// Plain value, not a reference.
        const VALUE = 1 << 8;
        /// Reference to a class instance, a function or a host object.
        const REFERENCE = 1 << 9;
        /// Reference that may be `null`.
        const NULLABLE = 1 << 10;
        /// SIMD vector.
        const VECTOR = 1 << 11;
        /// Host reference (`funcref`, `externref`, `anyref`).
        const EXTERNAL = 1 << 12;
    }
}

impl TypeFlags {
    /// Integer value flags.
    pub const INTEGER_VALUE: Self = Self::INTEGER.union(Self::VALUE);
    /// Float value flags.
    pub const FLOAT_VALUE: Self = Self::FLOAT.union(Self::VALUE);
}
