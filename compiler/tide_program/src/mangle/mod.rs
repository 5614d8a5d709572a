//! Internal-name mangling.
//!
//! Internal names are a pure function of the parent chain, the element's
//! simple name and its canonical type arguments, so the same element gets
//! the same name regardless of the order in which things were resolved.

/// Separates a file path from a top-level member.
pub const PATH_DELIMITER: char = '/';
/// Separates a container from a static member.
pub const STATIC_DELIMITER: char = '.';
/// Separates a class from an instance member.
pub const INSTANCE_DELIMITER: char = '#';
/// Separates a function from an element declared inside it.
pub const INNER_DELIMITER: char = '~';
/// Separates a name from an overload or anonymous-function index.
pub const INDEX_DELIMITER: char = '|';

/// Prefix of getter internal names.
pub const GETTER_PREFIX: &str = "get:";
/// Prefix of setter internal names.
pub const SETTER_PREFIX: &str = "set:";

/// Where a member sits relative to its parent.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberPosition {
    /// Directly in a file.
    TopLevel,
    /// Static member of a class, namespace or enum.
    Static,
    /// Member of class instances.
    Instance,
    /// Declared inside a function.
    Inner,
}

impl MemberPosition {
    pub fn delimiter(self) -> char {
        match self {
            MemberPosition::TopLevel => PATH_DELIMITER,
            MemberPosition::Static => STATIC_DELIMITER,
            MemberPosition::Instance => INSTANCE_DELIMITER,
            MemberPosition::Inner => INNER_DELIMITER,
        }
    }
}

/// `parent` + delimiter + `name`.
pub fn member(parent: &str, position: MemberPosition, name: &str) -> String {
    let mut out = String::with_capacity(parent.len() + name.len() + 1);
    out.push_str(parent);
    out.push(position.delimiter());
    out.push_str(name);
    out
}

/// `get:name` or `set:name`.
pub fn accessor(name: &str, is_getter: bool) -> String {
    let prefix = if is_getter { GETTER_PREFIX } else { SETTER_PREFIX };
    format!("{prefix}{name}")
}

/// `name|index`, used for overloads after the first and for anonymous
/// functions.
pub fn indexed(name: &str, index: usize) -> String {
    format!("{name}{INDEX_DELIMITER}{index}")
}

/// Instance-cache key: canonical type arguments joined by `,`.
pub fn instance_key<S: AsRef<str>>(canonical_args: &[S]) -> String {
    join_args(canonical_args)
}

/// `name<arg, ...>`, or `name` when there are no arguments.
///
/// Used both for internal names (with canonical arguments) and display
/// names (with display arguments).
pub fn with_type_arguments<S: AsRef<str>>(name: &str, args: &[S]) -> String {
    if args.is_empty() {
        return name.to_owned();
    }
    let mut out = String::with_capacity(name.len() + 2 + args.len() * 8);
    out.push_str(name);
    out.push('<');
    out.push_str(&join_args(args));
    out.push('>');
    out
}

fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(arg.as_ref());
    }
    out
}

/// The part of a member's internal name after its parent's name and the
/// delimiter, e.g. `get:x` for `main/Foo#get:x` under `main/Foo`.
pub fn member_suffix<'n>(internal_name: &'n str, parent: &str) -> &'n str {
    internal_name
        .strip_prefix(parent)
        .and_then(|rest| rest.get(1..))
        .unwrap_or(internal_name)
}
