//! Type and node queries.

use crate::{Decl, Name, NodeFlags, NodeId, NodeKind};

use super::TreeArena;

/// Size of pointers and references, in bytes.
const POINTER_SIZE: u64 = 8;

impl TreeArena {
    // === Error queries ===

    /// The node is the error mark or has error type.
    #[inline]
    pub fn error_operand_p(&self, id: NodeId) -> bool {
        id == NodeId::ERROR || self.ty(id) == Some(NodeId::ERROR)
    }

    // === Type queries ===

    pub fn is_void_type(&self, ty: NodeId) -> bool {
        matches!(self.kind(ty), NodeKind::VoidType)
    }

    /// Volatile-qualified type.
    pub fn is_volatile(&self, ty: NodeId) -> bool {
        self.has_flag(ty, NodeFlags::VOLATILE)
    }

    /// Non-trivially-copyable type; objects of it must live in memory.
    pub fn is_addressable(&self, ty: NodeId) -> bool {
        self.has_flag(ty, NodeFlags::ADDRESSABLE)
    }

    /// Whether objects of this type have a known size.
    pub fn is_complete(&self, ty: NodeId) -> bool {
        match self.kind(ty) {
            NodeKind::VoidType | NodeKind::ErrorMark => false,
            NodeKind::RecordType { size, .. } => size.is_some(),
            NodeKind::ArrayType { element } => self.is_complete(element),
            _ => true,
        }
    }

    pub fn is_reference_type(&self, ty: NodeId) -> bool {
        matches!(self.kind(ty), NodeKind::ReferenceType { .. })
    }

    pub fn is_pointer_type(&self, ty: NodeId) -> bool {
        matches!(self.kind(ty), NodeKind::PointerType { .. })
    }

    /// Pointer or reference.
    pub fn is_indirect_type(&self, ty: NodeId) -> bool {
        matches!(
            self.kind(ty),
            NodeKind::PointerType { .. } | NodeKind::ReferenceType { .. }
        )
    }

    pub fn is_function_type(&self, ty: NodeId) -> bool {
        matches!(self.kind(ty), NodeKind::FunctionType { .. })
    }

    /// Pointee of a pointer or referent of a reference.
    pub fn indirect_target(&self, ty: NodeId) -> Option<NodeId> {
        match self.kind(ty) {
            NodeKind::PointerType { pointee } => Some(pointee),
            NodeKind::ReferenceType { referent } => Some(referent),
            _ => None,
        }
    }

    /// Return type of a function type.
    pub fn function_return_type(&self, ty: NodeId) -> Option<NodeId> {
        match self.kind(ty) {
            NodeKind::FunctionType { ret, .. } => Some(ret),
            _ => None,
        }
    }

    /// Size in bytes of objects of this type, when known.
    pub fn type_size_unit(&self, ty: NodeId) -> Option<u64> {
        match self.kind(ty) {
            NodeKind::BooleanType => Some(1),
            NodeKind::IntegerType { precision, .. } | NodeKind::RealType { precision } => {
                Some(u64::from(precision).div_ceil(8))
            }
            NodeKind::PointerType { .. } | NodeKind::ReferenceType { .. } => Some(POINTER_SIZE),
            NodeKind::RecordType { size, .. } => size,
            _ => None,
        }
    }

    /// Type declaration naming a record type.
    pub fn type_name_decl(&self, ty: NodeId) -> Option<NodeId> {
        match self.kind(ty) {
            NodeKind::RecordType { name, .. } => name,
            _ => None,
        }
    }

    // === Declaration queries ===

    /// Shared payload of a declaration node.
    pub fn decl(&self, id: NodeId) -> Option<&Decl> {
        self.kinds[id.index()].decl()
    }

    pub fn decl_name(&self, id: NodeId) -> Option<Name> {
        self.decl(id).map(|decl| decl.name)
    }

    pub fn is_function_decl(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::FunctionDecl(_))
    }

    /// Variable or parameter declaration.
    pub fn is_var_or_parm(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::VarDecl(_) | NodeKind::ParmDecl(_))
    }

    /// The expression has reference type.
    pub fn is_reference_ref(&self, id: NodeId) -> bool {
        self.ty(id).is_some_and(|ty| self.is_reference_type(ty))
    }

    // === Diagnostic suppression ===

    /// Whether warnings controlled by `flag` are suppressed on this node.
    ///
    /// `NO_WARNING` suppresses every category.
    pub fn warning_suppressed(&self, id: NodeId, flag: NodeFlags) -> bool {
        self.has_flag(id, NodeFlags::NO_WARNING | flag)
    }

    /// Whether any warning suppression is set on this node.
    pub fn any_warning_suppressed(&self, id: NodeId) -> bool {
        self.has_flag(id, NodeFlags::ANY_SUPPRESSION)
    }

    /// Suppress warnings controlled by `flag` on this node.
    pub fn suppress_warning(&mut self, id: NodeId, flag: NodeFlags) {
        self.insert_flags(id, flag);
    }
}
