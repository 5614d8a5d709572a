//! Function signatures and the global signature table.
//!
//! Structurally equal signatures are registered once: [`SignatureTable::intern`]
//! hands out the id of the first registration for every later equal request,
//! so signature identity can key downstream tables.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::Type;

/// Index of a signature in the [`SignatureTable`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SignatureId(u32);

impl SignatureId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        SignatureId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SignatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureId({})", self.0)
    }
}

/// The shape of a function.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Signature {
    pub params: Vec<Type>,
    /// Parameters a call must supply; the rest are optional.
    pub required_params: usize,
    pub ret: Type,
    /// `this` type of instance methods or an explicit `this` parameter.
    pub this_type: Option<Type>,
    /// The last parameter is a rest parameter.
    pub has_rest: bool,
}

impl Signature {
    /// A signature whose parameters are all required.
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Signature {
            required_params: params.len(),
            params,
            ret,
            this_type: None,
            has_rest: false,
        }
    }

    #[must_use]
    pub fn with_this(mut self, this_type: Type) -> Self {
        self.this_type = Some(this_type);
        self
    }

    #[must_use]
    pub fn with_required(mut self, required_params: usize) -> Self {
        self.required_params = required_params.min(self.params.len());
        self
    }

    #[must_use]
    pub fn with_rest(mut self) -> Self {
        self.has_rest = true;
        self
    }

    /// Whether a call with `count` arguments fits this signature's arity.
    pub fn accepts_arg_count(&self, count: usize) -> bool {
        count >= self.required_params && (self.has_rest || count <= self.params.len())
    }
}

/// Interning table for signatures.
#[derive(Clone, Debug, Default)]
pub struct SignatureTable {
    signatures: Vec<Signature>,
    ids: FxHashMap<Signature, SignatureId>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signature, returning the id of an equal signature if one
    /// was registered before.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct signatures are registered.
    pub fn intern(&mut self, signature: Signature) -> SignatureId {
        if let Some(&id) = self.ids.get(&signature) {
            tracing::trace!(?id, "signature reused");
            return id;
        }
        let id = SignatureId(
            u32::try_from(self.signatures.len())
                .unwrap_or_else(|_| panic!("signature table exceeded u32::MAX entries")),
        );
        self.signatures.push(signature.clone());
        self.ids.insert(signature, id);
        id
    }

    /// Get a registered signature.
    #[inline]
    pub fn get(&self, id: SignatureId) -> &Signature {
        &self.signatures[id.index()]
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests;
