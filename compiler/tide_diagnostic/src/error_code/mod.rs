//! Error codes for resolution diagnostics.
//!
//! Each code is a unique identifier (e.g. `E2001`) with the first digit
//! indicating the phase, and a message template with `{0}`..`{2}`
//! placeholders filled from the diagnostic's arguments.

use std::fmt;

/// Error codes for all resolution diagnostics.
///
/// Format: E#### where the first digit indicates phase:
/// - E1xxx: Program construction (registration, imports)
/// - E2xxx: Resolution errors
/// - E9xxx: Internal compiler errors
///
/// P#### codes are pedantic remarks.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Program construction (E1xxx)
    /// Duplicate identifier in the same scope
    E1001,
    /// Imported member not exported by the target file
    E1002,
    /// Imported file does not exist
    E1003,

    // Resolution (E2xxx)
    /// Name not found in scope
    E2001,
    /// Wrong number of type arguments
    E2002,
    /// Type argument violates its `extends` bound
    E2003,
    /// Type argument cannot be inferred
    E2004,
    /// Type is not assignable
    E2005,
    /// Ambiguous overload
    E2006,
    /// No overload matches the arguments
    E2007,
    /// Illegal cyclic definition
    E2008,
    /// Generic used where a concrete instance is required
    E2009,
    /// Generic type used without type arguments
    E2010,
    /// Expression is not callable
    E2011,
    /// Property does not exist on type
    E2012,
    /// Managed and unmanaged classes mixed in a hierarchy
    E2013,
    /// Field is never initialized
    E2014,
    /// Wrong number of call arguments
    E2015,
    /// Type annotation expected
    E2016,
    /// Name refers to a value, not a type
    E2017,
    /// Operation not supported on type
    E2018,
    /// `this` outside an instance context
    E2019,
    /// `super` outside a derived class
    E2020,
    /// Element access on a type without an index signature
    E2021,
    /// `new` on an abstract class
    E2022,
    /// Basic type written as nullable
    E2023,

    // Internal (E9xxx)
    /// Internal compiler error
    E9001,

    // Pedantic (Pxxxx)
    /// Non-null assertion on a value that is never null
    P2001,
}

impl ErrorCode {
    /// All error codes, for `FromStr` and exhaustive tests.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E2017,
        ErrorCode::E2018,
        ErrorCode::E2019,
        ErrorCode::E2020,
        ErrorCode::E2021,
        ErrorCode::E2022,
        ErrorCode::E2023,
        ErrorCode::E9001,
        ErrorCode::P2001,
    ];

    // Descriptive aliases used throughout the resolver.
    pub const DUPLICATE_ELEMENT: Self = ErrorCode::E1001;
    pub const IMPORT_NOT_FOUND: Self = ErrorCode::E1002;
    pub const FILE_NOT_FOUND: Self = ErrorCode::E1003;
    pub const NOT_FOUND: Self = ErrorCode::E2001;
    pub const WRONG_TYPE_ARGUMENT_COUNT: Self = ErrorCode::E2002;
    pub const TYPE_CONSTRAINT_VIOLATION: Self = ErrorCode::E2003;
    pub const CANNOT_INFER_TYPE_ARGUMENTS: Self = ErrorCode::E2004;
    pub const NOT_ASSIGNABLE: Self = ErrorCode::E2005;
    pub const AMBIGUOUS_OVERLOAD: Self = ErrorCode::E2006;
    pub const NO_MATCHING_OVERLOAD: Self = ErrorCode::E2007;
    pub const CYCLIC_DEFINITION: Self = ErrorCode::E2008;
    pub const UNRESOLVED_GENERIC: Self = ErrorCode::E2009;
    pub const MISSING_TYPE_ARGUMENTS: Self = ErrorCode::E2010;
    pub const NOT_CALLABLE: Self = ErrorCode::E2011;
    pub const PROPERTY_NOT_FOUND: Self = ErrorCode::E2012;
    pub const MANAGED_UNMANAGED_MIX: Self = ErrorCode::E2013;
    pub const FIELD_NOT_INITIALIZED: Self = ErrorCode::E2014;
    pub const ARGUMENT_COUNT_MISMATCH: Self = ErrorCode::E2015;
    pub const TYPE_EXPECTED: Self = ErrorCode::E2016;
    pub const NOT_A_TYPE: Self = ErrorCode::E2017;
    pub const OPERATION_NOT_SUPPORTED: Self = ErrorCode::E2018;
    pub const THIS_NOT_AVAILABLE: Self = ErrorCode::E2019;
    pub const SUPER_NOT_AVAILABLE: Self = ErrorCode::E2020;
    pub const INDEX_SIGNATURE_MISSING: Self = ErrorCode::E2021;
    pub const ABSTRACT_INSTANTIATION: Self = ErrorCode::E2022;
    pub const BASIC_TYPE_NOT_NULLABLE: Self = ErrorCode::E2023;
    pub const INTERNAL: Self = ErrorCode::E9001;
    pub const NEVER_NULL: Self = ErrorCode::P2001;

    /// Get the string representation (e.g. `"E2001"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2020 => "E2020",
            ErrorCode::E2021 => "E2021",
            ErrorCode::E2022 => "E2022",
            ErrorCode::E2023 => "E2023",
            ErrorCode::E9001 => "E9001",
            ErrorCode::P2001 => "P2001",
        }
    }

    /// Message template; `{N}` is replaced by argument `N`.
    pub fn template(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "Duplicate identifier '{0}'.",
            ErrorCode::E1002 => "File '{0}' has no exported member '{1}'.",
            ErrorCode::E1003 => "File '{0}' not found.",
            ErrorCode::E2001 => "Cannot find name '{0}'.",
            ErrorCode::E2002 => "Expected {0} type arguments, but got {1}.",
            ErrorCode::E2003 => "Type '{0}' does not satisfy the constraint '{1}'.",
            ErrorCode::E2004 => {
                "Type argument '{0}' of '{1}' cannot be inferred. Specify the type arguments explicitly."
            }
            ErrorCode::E2005 => "Type '{0}' is not assignable to type '{1}'.",
            ErrorCode::E2006 => "Call to '{0}' is ambiguous between overloads.",
            ErrorCode::E2007 => "No overload of '{0}' matches the argument types ({1}).",
            ErrorCode::E2008 => "'{0}' is referenced directly or indirectly in its own definition.",
            ErrorCode::E2009 => "Generic '{0}' must be instantiated before it can be used here.",
            ErrorCode::E2010 => "Generic type '{0}' requires {1} type arguments.",
            ErrorCode::E2011 => "Expression of type '{0}' is not callable.",
            ErrorCode::E2012 => "Property '{0}' does not exist on type '{1}'.",
            ErrorCode::E2013 => {
                "Class '{0}' cannot extend '{1}': managed and unmanaged classes cannot be mixed."
            }
            ErrorCode::E2014 => {
                "Property '{0}' has no initializer and is not definitely assigned in the constructor."
            }
            ErrorCode::E2015 => "Expected {0} arguments, but got {1}.",
            ErrorCode::E2016 => "Type expected.",
            ErrorCode::E2017 => "'{0}' refers to a value, but is being used as a type here.",
            ErrorCode::E2018 => "Operation '{0}' is not supported on type '{1}'.",
            ErrorCode::E2019 => "'this' cannot be referenced in the current location.",
            ErrorCode::E2020 => "'super' can only be referenced in a derived class.",
            ErrorCode::E2021 => "Index signature is missing in type '{0}'.",
            ErrorCode::E2022 => "Cannot create an instance of the abstract class '{0}'.",
            ErrorCode::E2023 => "Basic type '{0}' cannot be nullable.",
            ErrorCode::E9001 => "Internal compiler error: {0}",
            ErrorCode::P2001 => "Expression of type '{0}' is never null.",
        }
    }

    /// Render the template with the given arguments.
    ///
    /// Placeholders without a matching argument render empty.
    pub fn render(&self, args: &[String]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len() + 16);
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                if let Some(&digit) = chars.peek() {
                    if let Some(idx) = digit.to_digit(10) {
                        chars.next();
                        if chars.peek() == Some(&'}') {
                            chars.next();
                            if let Some(arg) = args.get(idx as usize) {
                                out.push_str(arg);
                            }
                            continue;
                        }
                        out.push('{');
                        out.push(digit);
                        continue;
                    }
                }
            }
            out.push(c);
        }
        out
    }

    /// Check if this is a program-construction error (E1xxx range).
    pub fn is_program_error(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003)
    }

    /// Check if this is a resolution error (E2xxx range).
    pub fn is_resolve_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }

    /// Check if this is a pedantic code (Pxxxx range).
    pub fn is_pedantic(&self) -> bool {
        matches!(self, ErrorCode::P2001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
