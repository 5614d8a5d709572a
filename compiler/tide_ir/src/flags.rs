//! Modifier and decorator flags.
//!
//! The parser sets the syntactic bits; the program sets `INSTANCE`,
//! `GENERIC` and `RESOLVED` when it registers and instantiates elements.

use bitflags::bitflags;

bitflags! {
    /// Modifiers carried by declarations and program elements.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CommonFlags: u32 {
        // === Syntactic modifiers (bits 0-15) ===

        /// `export`
        const EXPORT = 1 << 0;
        /// `declare`
        const DECLARE = 1 << 1;
        /// `const`
        const CONST = 1 << 2;
        /// `let`
        const LET = 1 << 3;
        /// `static`
        const STATIC = 1 << 4;
        /// `readonly`
        const READONLY = 1 << 5;
        /// `abstract`
        const ABSTRACT = 1 << 6;
        /// `public`
        const PUBLIC = 1 << 7;
        /// `private`
        const PRIVATE = 1 << 8;
        /// `protected`
        const PROTECTED = 1 << 9;
        /// `get` accessor
        const GET = 1 << 10;
        /// `set` accessor
        const SET = 1 << 11;
        /// `override`
        const OVERRIDE = 1 << 12;
        /// Definite assignment assertion (`field!: T`)
        const DEFINITELY_ASSIGNED = 1 << 13;
        /// Class constructor
        const CONSTRUCTOR = 1 << 14;

        // === Program-assigned (bits 16-31) ===

        /// Member of class instances rather than of the class itself.
        const INSTANCE = 1 << 16;
        /// Declares type parameters.
        const GENERIC = 1 << 17;
        /// Fully resolved instance.
        const RESOLVED = 1 << 18;
        /// Synthesized by the compiler (implicit constructor, builtin).
        const SYNTHETIC = 1 << 19;
        /// Declared by a constructor parameter property.
        const PARAMETER_PROPERTY = 1 << 20;
    }
}

bitflags! {
    /// Decorators recognized on declarations.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DecoratorFlags: u16 {
        /// `@global`: registered in the global scope
        const GLOBAL = 1 << 0;
        /// `@operator(...)`: operator overload
        const OPERATOR = 1 << 1;
        /// `@unmanaged`: not tracked by the runtime
        const UNMANAGED = 1 << 2;
        /// `@final`: cannot be extended
        const FINAL = 1 << 3;
        /// `@inline`
        const INLINE = 1 << 4;
        /// `@builtin`
        const BUILTIN = 1 << 5;
    }
}

impl CommonFlags {
    /// Flags that select the member namespace of a class member.
    pub const MEMBER_NAMESPACE: Self = Self::STATIC.union(Self::INSTANCE);

    /// Whether any accessor flag is set.
    #[inline]
    pub const fn is_accessor(self) -> bool {
        self.intersects(Self::GET.union(Self::SET))
    }
}
