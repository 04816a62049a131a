//! Attributes attached to declarations and types.

use smallvec::SmallVec;

use crate::Name;

/// A single attribute, e.g. `[[nodiscard("reason")]]`.
///
/// Arguments are interned string literals; only the first argument of
/// `nodiscard` is ever consulted.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Attribute {
    pub name: Name,
    pub args: SmallVec<[Name; 1]>,
}

impl Attribute {
    /// Attribute without arguments.
    pub fn new(name: Name) -> Self {
        Attribute {
            name,
            args: SmallVec::new(),
        }
    }

    /// Attribute with a single string argument.
    pub fn with_arg(name: Name, arg: Name) -> Self {
        let mut args = SmallVec::new();
        args.push(arg);
        Attribute { name, args }
    }

    /// First argument, if any.
    pub fn first_arg(&self) -> Option<Name> {
        self.args.first().copied()
    }
}
