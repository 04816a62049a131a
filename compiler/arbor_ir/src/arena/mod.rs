//! Tree arena.
//!
//! [`TreeArena`] owns every node of a tree and uses struct-of-arrays layout
//! (parallel `kinds`, `types`, `flags`, `spans` arrays indexed by
//! [`NodeId`]). Variable-length operand lists live in a flat `lists` table
//! addressed by [`NodeRange`]. Attributes are kept in a side table since few
//! nodes carry any.
//!
//! # Canonical Nodes
//!
//! Every arena starts with the same prefix:
//!
//! | slot | node |
//! |------|------|
//! | 0 | [`NodeId::ERROR`], typed as itself |
//! | 1 | [`NodeId::VOID`], typed `void` |
//! | 2.. | the [`CommonTypes`] |

mod build;
mod format;
mod query;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{Attribute, Name, NameTable, NodeFlags, NodeId, NodeKind, NodeRange, Span};

/// Types every arena pre-allocates.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CommonTypes {
    pub void: NodeId,
    pub bool: NodeId,
    /// Signed 32-bit integer.
    pub int: NodeId,
    /// Unsigned pointer-sized integer, used for offsets.
    pub size: NodeId,
}

/// Owner of all nodes in a tree.
///
/// Nodes are never freed; rewrites allocate new nodes or update kinds in
/// place. Accessors panic on a handle from another arena (index out of
/// bounds), which is a caller bug.
#[derive(Clone, Debug)]
pub struct TreeArena {
    /// Node kinds with operands (parallel with the arrays below).
    kinds: Vec<NodeKind>,
    /// Type of each node; absent for types and typeless nodes.
    types: Vec<Option<NodeId>>,
    flags: Vec<NodeFlags>,
    spans: Vec<Span>,
    /// Flattened operand lists for ranges.
    lists: Vec<NodeId>,
    attributes: FxHashMap<NodeId, SmallVec<[Attribute; 1]>>,
    names: NameTable,
    common: CommonTypes,
}

impl TreeArena {
    /// Create an arena holding only the canonical nodes.
    pub fn new() -> Self {
        let mut arena = TreeArena {
            kinds: Vec::with_capacity(64),
            types: Vec::with_capacity(64),
            flags: Vec::with_capacity(64),
            spans: Vec::with_capacity(64),
            lists: Vec::new(),
            attributes: FxHashMap::default(),
            names: NameTable::new(),
            common: CommonTypes {
                void: NodeId::ERROR,
                bool: NodeId::ERROR,
                int: NodeId::ERROR,
                size: NodeId::ERROR,
            },
        };

        let error = arena.alloc(NodeKind::ErrorMark, None, Span::UNKNOWN);
        arena.types[error.index()] = Some(error);
        let void = arena.alloc(NodeKind::VoidCst, None, Span::UNKNOWN);
        debug_assert_eq!((error, void), (NodeId::ERROR, NodeId::VOID));

        let void_type = arena.alloc(NodeKind::VoidType, None, Span::UNKNOWN);
        arena.types[void.index()] = Some(void_type);
        let bool_type = arena.alloc(NodeKind::BooleanType, None, Span::UNKNOWN);
        let int_name = arena.names.intern("int");
        let int_type = arena.alloc(
            NodeKind::IntegerType {
                precision: 32,
                unsigned: false,
                name: Some(int_name),
            },
            None,
            Span::UNKNOWN,
        );
        let size_name = arena.names.intern("size_t");
        let size_type = arena.alloc(
            NodeKind::IntegerType {
                precision: 64,
                unsigned: true,
                name: Some(size_name),
            },
            None,
            Span::UNKNOWN,
        );
        arena.common = CommonTypes {
            void: void_type,
            bool: bool_type,
            int: int_type,
            size: size_type,
        };
        arena
    }

    /// Allocate a node with no flags set.
    ///
    /// Prefer the builders, which compute `SIDE_EFFECTS` from operands.
    pub fn alloc(&mut self, kind: NodeKind, ty: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "nodes"));
        self.kinds.push(kind);
        self.types.push(ty);
        self.flags.push(NodeFlags::empty());
        self.spans.push(span);
        id
    }

    /// Number of allocated nodes, canonical nodes included.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always false: the canonical nodes are pre-allocated.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The pre-allocated common types.
    #[inline]
    pub fn common(&self) -> CommonTypes {
        self.common
    }

    // === Per-node accessors ===

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.kinds[id.index()]
    }

    /// Replace a node's kind in place. Flags are left untouched.
    #[inline]
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.kinds[id.index()] = kind;
    }

    #[inline]
    pub fn ty(&self, id: NodeId) -> Option<NodeId> {
        self.types[id.index()]
    }

    #[inline]
    pub fn set_ty(&mut self, id: NodeId, ty: Option<NodeId>) {
        self.types[id.index()] = ty;
    }

    #[inline]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.flags[id.index()]
    }

    #[inline]
    pub fn has_flag(&self, id: NodeId, flag: NodeFlags) -> bool {
        self.flags[id.index()].intersects(flag)
    }

    #[inline]
    pub fn insert_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.flags[id.index()].insert(flags);
    }

    #[inline]
    pub fn remove_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.flags[id.index()].remove(flags);
    }

    #[inline]
    pub fn side_effects(&self, id: NodeId) -> bool {
        self.has_flag(id, NodeFlags::SIDE_EFFECTS)
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.spans[id.index()] = span;
    }

    // === Operand lists ===

    /// Allocate a contiguous operand list.
    pub fn alloc_list(&mut self, ids: &[NodeId]) -> NodeRange {
        if ids.is_empty() {
            return NodeRange::EMPTY;
        }
        let start = to_u32(self.lists.len(), "operand lists");
        self.lists.extend_from_slice(ids);
        NodeRange::new(start, to_u32(ids.len(), "operand list"))
    }

    /// Handles in an operand list.
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    // === Names ===

    pub fn intern(&mut self, s: &str) -> Name {
        self.names.intern(s)
    }

    pub fn name_str(&self, name: Name) -> &str {
        self.names.lookup(name)
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    // === Attributes ===

    /// Attach an attribute to a declaration or type.
    pub fn add_attribute(&mut self, id: NodeId, attr: Attribute) {
        self.attributes.entry(id).or_default().push(attr);
    }

    /// Find the first attribute named `name` on a node.
    pub fn lookup_attribute(&self, id: NodeId, name: &str) -> Option<&Attribute> {
        let attrs = self.attributes.get(&id)?;
        attrs.iter().find(|attr| self.names.lookup(attr.name) == name)
    }

    /// All attributes on a node.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.attributes.get(&id).map_or(&[], |attrs| attrs.as_slice())
    }

    // === Structure ===

    /// Expression operands visited by a structural walk, in source order.
    ///
    /// Declarations, constants and types have none; type fields are
    /// reported separately by [`TreeArena::type_fields`]. Operands that only
    /// the language-specific walker reaches (argument packs, coroutine
    /// frames, static assertions) are not listed here.
    pub fn operands(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self.kind(id) {
            NodeKind::ArrayRef { base: a, index: b }
            | NodeKind::ComponentRef {
                object: a,
                field: b,
            }
            | NodeKind::MemberRef {
                object: a,
                member: b,
            }
            | NodeKind::ModifyExpr { lhs: a, rhs: b }
            | NodeKind::Binary { lhs: a, rhs: b, .. }
            | NodeKind::CompoundExpr { lhs: a, rhs: b }
            | NodeKind::TargetExpr {
                slot: a,
                initial: b,
            } => {
                out.push(a);
                out.push(b);
            }
            NodeKind::RealpartExpr(op)
            | NodeKind::ImagpartExpr(op)
            | NodeKind::NopExpr(op)
            | NodeKind::ConvertExpr(op)
            | NodeKind::NonLvalueExpr(op)
            | NodeKind::ViewConvertExpr(op)
            | NodeKind::FloatExpr(op)
            | NodeKind::NonDependentExpr(op)
            | NodeKind::AddrExpr(op)
            | NodeKind::IndirectRef(op)
            | NodeKind::DeclExpr(op)
            | NodeKind::SizeofExpr(op)
            | NodeKind::AlignofExpr(op)
            | NodeKind::NoexceptExpr(op)
            | NodeKind::Cast { operand: op, .. }
            | NodeKind::CoAwaitExpr { expr: op, .. } => out.push(op),
            NodeKind::CondExpr {
                cond,
                second,
                third,
            } => {
                out.push(cond);
                out.extend(second);
                out.push(third);
            }
            NodeKind::CallExpr { callee, args } => {
                out.extend(callee);
                out.extend_from_slice(self.list(args));
            }
            NodeKind::Constructor { elts } | NodeKind::TreeVec { elts } => {
                out.extend_from_slice(self.list(elts));
            }
            NodeKind::Opaque { operands, .. } => out.extend_from_slice(self.list(operands)),
            NodeKind::TreeList { value, chain, .. } => {
                out.extend(value);
                out.extend(chain);
            }
            NodeKind::RequiresExpr { parms, reqs } => {
                out.extend(parms);
                out.push(reqs);
            }
            NodeKind::ExprPackExpansion {
                pattern,
                extra_args,
            } => {
                out.push(pattern);
                out.extend(extra_args);
            }
            NodeKind::ErrorMark
            | NodeKind::VoidCst
            | NodeKind::IntegerCst(_)
            | NodeKind::RealCst(_)
            | NodeKind::StringCst(_)
            | NodeKind::PtrmemCst { .. }
            | NodeKind::Identifier(_)
            | NodeKind::VarDecl(_)
            | NodeKind::ParmDecl(_)
            | NodeKind::FunctionDecl(_)
            | NodeKind::TypeDecl(_)
            | NodeKind::FieldDecl(_)
            | NodeKind::NamespaceDecl(_)
            | NodeKind::TemplateDecl(_)
            | NodeKind::UsingDecl { .. }
            | NodeKind::VoidType
            | NodeKind::BooleanType
            | NodeKind::IntegerType { .. }
            | NodeKind::RealType { .. }
            | NodeKind::PointerType { .. }
            | NodeKind::ReferenceType { .. }
            | NodeKind::ArrayType { .. }
            | NodeKind::FunctionType { .. }
            | NodeKind::RecordType { .. }
            | NodeKind::TypenameType { .. }
            | NodeKind::TypeofType { .. }
            | NodeKind::UnderlyingType { .. }
            | NodeKind::DecltypeType { .. }
            | NodeKind::TypePackExpansion { .. }
            | NodeKind::TypeArgumentPack { .. }
            | NodeKind::NontypeArgumentPack { .. }
            | NodeKind::CoReturnExpr { .. }
            | NodeKind::Overload { .. }
            | NodeKind::Baselink { .. }
            | NodeKind::DeferredParse
            | NodeKind::StaticAssert { .. } => {}
        }
        out
    }

    /// Component types of a type node.
    ///
    /// Type graphs may be cyclic (a record pointing to itself), so walkers
    /// only follow these when they track visited nodes.
    pub fn type_fields(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self.kind(id) {
            NodeKind::PointerType { pointee: inner }
            | NodeKind::ReferenceType { referent: inner }
            | NodeKind::ArrayType { element: inner } => out.push(inner),
            NodeKind::FunctionType { ret, params } => {
                out.push(ret);
                out.extend_from_slice(self.list(params));
            }
            _ => {}
        }
        out
    }
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a length to `u32`, panicking with context on overflow.
#[inline]
fn to_u32(value: usize, what: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("arena exceeded u32::MAX {what}"))
}

#[cfg(test)]
mod tests;
