//! Node kinds.
//!
//! `NodeKind` is a closed sum type with one variant per node kind the tree
//! utilities understand, plus [`NodeKind::Opaque`] for kinds this layer only
//! passes through. Operands are arena handles, so the enum is `Copy` and a
//! node can be rewritten in place by storing a new kind.

use crate::{Name, NodeId, NodeRange};

/// Declaration payload shared by all declaration kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Decl {
    pub name: Name,
    /// Initializer (variables) or body (functions).
    pub initial: Option<NodeId>,
    /// Size in bits, for variables whose size is computed at run time.
    pub size: Option<NodeId>,
    /// Size in bytes.
    pub size_unit: Option<NodeId>,
}

impl Decl {
    /// A declaration with only a name.
    pub const fn named(name: Name) -> Self {
        Decl {
            name,
            initial: None,
            size: None,
            size_unit: None,
        }
    }
}

/// The seven source-level cast forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CastKind {
    /// Functional or C-style cast.
    Cast,
    Reinterpret,
    Static,
    Const,
    Dynamic,
    /// Conversion whose target is only known after instantiation.
    ImplicitConv,
    Bit,
}

/// Arithmetic operators used by folded expressions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mult,
    /// Pointer plus byte offset.
    PointerPlus,
}

/// Node kind with its operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // === Canonical nodes ===
    ErrorMark,
    VoidCst,

    // === Constants ===
    IntegerCst(i64),
    /// Float constant, stored as bits.
    RealCst(u64),
    StringCst(Name),
    /// Pointer-to-member constant.
    PtrmemCst {
        member: NodeId,
    },

    Identifier(Name),

    // === Declarations ===
    VarDecl(Decl),
    ParmDecl(Decl),
    FunctionDecl(Decl),
    TypeDecl(Decl),
    FieldDecl(Decl),
    NamespaceDecl(Decl),
    TemplateDecl(Decl),
    UsingDecl {
        /// Identifier node naming the introduced entity.
        name: NodeId,
        scope: Option<NodeId>,
        decls: Option<NodeId>,
    },

    // === Types ===
    VoidType,
    BooleanType,
    IntegerType {
        precision: u16,
        unsigned: bool,
        name: Option<Name>,
    },
    RealType {
        precision: u16,
    },
    PointerType {
        pointee: NodeId,
    },
    ReferenceType {
        referent: NodeId,
    },
    ArrayType {
        element: NodeId,
    },
    FunctionType {
        ret: NodeId,
        params: NodeRange,
    },
    RecordType {
        /// The `TypeDecl` naming this record.
        name: Option<NodeId>,
        /// Size in bytes; `None` while the record is incomplete.
        size: Option<u64>,
        /// Set when the record represents a pointer to member function.
        ptrmemfunc_fn_type: Option<NodeId>,
    },
    /// `typename Context::name`.
    TypenameType {
        context: Option<NodeId>,
        fullname: NodeId,
    },
    TypeofType {
        expr: NodeId,
    },
    UnderlyingType {
        ty: NodeId,
    },
    DecltypeType {
        expr: NodeId,
    },
    TypePackExpansion {
        pattern: NodeId,
        extra_args: Option<NodeId>,
    },
    TypeArgumentPack {
        args: NodeRange,
    },

    // === Expressions ===
    ArrayRef {
        base: NodeId,
        index: NodeId,
    },
    ComponentRef {
        object: NodeId,
        field: NodeId,
    },
    MemberRef {
        object: NodeId,
        member: NodeId,
    },
    ModifyExpr {
        lhs: NodeId,
        rhs: NodeId,
    },
    RealpartExpr(NodeId),
    ImagpartExpr(NodeId),
    NopExpr(NodeId),
    ConvertExpr(NodeId),
    NonLvalueExpr(NodeId),
    ViewConvertExpr(NodeId),
    FloatExpr(NodeId),
    NonDependentExpr(NodeId),
    AddrExpr(NodeId),
    IndirectRef(NodeId),
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    /// `lhs, rhs`: the right operand carries the value.
    CompoundExpr {
        lhs: NodeId,
        rhs: NodeId,
    },
    /// `cond ? second : third`; `second` is absent for `cond ?: third`.
    CondExpr {
        cond: NodeId,
        second: Option<NodeId>,
        third: NodeId,
    },
    CallExpr {
        callee: Option<NodeId>,
        args: NodeRange,
    },
    /// Materialized temporary `slot` initialized by `initial`.
    TargetExpr {
        slot: NodeId,
        initial: NodeId,
    },
    Constructor {
        elts: NodeRange,
    },
    Cast {
        kind: CastKind,
        operand: NodeId,
    },
    DeclExpr(NodeId),
    NontypeArgumentPack {
        args: NodeRange,
    },
    ExprPackExpansion {
        pattern: NodeId,
        extra_args: Option<NodeId>,
    },
    SizeofExpr(NodeId),
    AlignofExpr(NodeId),
    NoexceptExpr(NodeId),
    RequiresExpr {
        parms: Option<NodeId>,
        reqs: NodeId,
    },
    CoAwaitExpr {
        expr: NodeId,
        frame_var: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    CoReturnExpr {
        expr: Option<NodeId>,
        /// The `return_value` call carrying a non-void operand.
        call: Option<NodeId>,
    },

    // === Auxiliary nodes ===
    TreeList {
        purpose: Option<NodeId>,
        value: Option<NodeId>,
        chain: Option<NodeId>,
    },
    TreeVec {
        elts: NodeRange,
    },
    /// Overload set cell: one function and the rest of the set.
    Overload {
        function: NodeId,
        chain: Option<NodeId>,
    },
    /// Member function set reached through a class.
    Baselink {
        access_type: Option<NodeId>,
        functions: NodeId,
    },
    /// Tokens saved for later parsing.
    DeferredParse,
    StaticAssert {
        condition: NodeId,
        message: Option<NodeId>,
    },

    /// A host kind this layer does not decompose beyond its operand list.
    Opaque {
        code: u16,
        operands: NodeRange,
    },
}

impl NodeKind {
    /// Lower-case tree code name, for debug output.
    pub fn code_name(&self) -> &'static str {
        match self {
            NodeKind::ErrorMark => "error_mark",
            NodeKind::VoidCst => "void_cst",
            NodeKind::IntegerCst(_) => "integer_cst",
            NodeKind::RealCst(_) => "real_cst",
            NodeKind::StringCst(_) => "string_cst",
            NodeKind::PtrmemCst { .. } => "ptrmem_cst",
            NodeKind::Identifier(_) => "identifier_node",
            NodeKind::VarDecl(_) => "var_decl",
            NodeKind::ParmDecl(_) => "parm_decl",
            NodeKind::FunctionDecl(_) => "function_decl",
            NodeKind::TypeDecl(_) => "type_decl",
            NodeKind::FieldDecl(_) => "field_decl",
            NodeKind::NamespaceDecl(_) => "namespace_decl",
            NodeKind::TemplateDecl(_) => "template_decl",
            NodeKind::UsingDecl { .. } => "using_decl",
            NodeKind::VoidType => "void_type",
            NodeKind::BooleanType => "boolean_type",
            NodeKind::IntegerType { .. } => "integer_type",
            NodeKind::RealType { .. } => "real_type",
            NodeKind::PointerType { .. } => "pointer_type",
            NodeKind::ReferenceType { .. } => "reference_type",
            NodeKind::ArrayType { .. } => "array_type",
            NodeKind::FunctionType { .. } => "function_type",
            NodeKind::RecordType { .. } => "record_type",
            NodeKind::TypenameType { .. } => "typename_type",
            NodeKind::TypeofType { .. } => "typeof_type",
            NodeKind::UnderlyingType { .. } => "underlying_type",
            NodeKind::DecltypeType { .. } => "decltype_type",
            NodeKind::TypePackExpansion { .. } => "type_pack_expansion",
            NodeKind::TypeArgumentPack { .. } => "type_argument_pack",
            NodeKind::ArrayRef { .. } => "array_ref",
            NodeKind::ComponentRef { .. } => "component_ref",
            NodeKind::MemberRef { .. } => "member_ref",
            NodeKind::ModifyExpr { .. } => "modify_expr",
            NodeKind::RealpartExpr(_) => "realpart_expr",
            NodeKind::ImagpartExpr(_) => "imagpart_expr",
            NodeKind::NopExpr(_) => "nop_expr",
            NodeKind::ConvertExpr(_) => "convert_expr",
            NodeKind::NonLvalueExpr(_) => "non_lvalue_expr",
            NodeKind::ViewConvertExpr(_) => "view_convert_expr",
            NodeKind::FloatExpr(_) => "float_expr",
            NodeKind::NonDependentExpr(_) => "non_dependent_expr",
            NodeKind::AddrExpr(_) => "addr_expr",
            NodeKind::IndirectRef(_) => "indirect_ref",
            NodeKind::Binary { .. } => "binary_expr",
            NodeKind::CompoundExpr { .. } => "compound_expr",
            NodeKind::CondExpr { .. } => "cond_expr",
            NodeKind::CallExpr { .. } => "call_expr",
            NodeKind::TargetExpr { .. } => "target_expr",
            NodeKind::Constructor { .. } => "constructor",
            NodeKind::Cast { .. } => "cast_expr",
            NodeKind::DeclExpr(_) => "decl_expr",
            NodeKind::NontypeArgumentPack { .. } => "nontype_argument_pack",
            NodeKind::ExprPackExpansion { .. } => "expr_pack_expansion",
            NodeKind::SizeofExpr(_) => "sizeof_expr",
            NodeKind::AlignofExpr(_) => "alignof_expr",
            NodeKind::NoexceptExpr(_) => "noexcept_expr",
            NodeKind::RequiresExpr { .. } => "requires_expr",
            NodeKind::CoAwaitExpr { .. } => "co_await_expr",
            NodeKind::CoReturnExpr { .. } => "co_return_expr",
            NodeKind::TreeList { .. } => "tree_list",
            NodeKind::TreeVec { .. } => "tree_vec",
            NodeKind::Overload { .. } => "overload",
            NodeKind::Baselink { .. } => "baselink",
            NodeKind::DeferredParse => "deferred_parse",
            NodeKind::StaticAssert { .. } => "static_assert",
            NodeKind::Opaque { .. } => "opaque",
        }
    }

    /// Declaration kinds.
    pub fn is_decl(&self) -> bool {
        matches!(
            self,
            NodeKind::VarDecl(_)
                | NodeKind::ParmDecl(_)
                | NodeKind::FunctionDecl(_)
                | NodeKind::TypeDecl(_)
                | NodeKind::FieldDecl(_)
                | NodeKind::NamespaceDecl(_)
                | NodeKind::TemplateDecl(_)
                | NodeKind::UsingDecl { .. }
        )
    }

    /// The shared declaration payload, for kinds that carry one.
    pub fn decl(&self) -> Option<&Decl> {
        match self {
            NodeKind::VarDecl(decl)
            | NodeKind::ParmDecl(decl)
            | NodeKind::FunctionDecl(decl)
            | NodeKind::TypeDecl(decl)
            | NodeKind::FieldDecl(decl)
            | NodeKind::NamespaceDecl(decl)
            | NodeKind::TemplateDecl(decl) => Some(decl),
            _ => None,
        }
    }

    /// Mutable access to the declaration payload.
    pub fn decl_mut(&mut self) -> Option<&mut Decl> {
        match self {
            NodeKind::VarDecl(decl)
            | NodeKind::ParmDecl(decl)
            | NodeKind::FunctionDecl(decl)
            | NodeKind::TypeDecl(decl)
            | NodeKind::FieldDecl(decl)
            | NodeKind::NamespaceDecl(decl)
            | NodeKind::TemplateDecl(decl) => Some(decl),
            _ => None,
        }
    }

    /// Constant kinds.
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            NodeKind::IntegerCst(_)
                | NodeKind::RealCst(_)
                | NodeKind::StringCst(_)
                | NodeKind::PtrmemCst { .. }
                | NodeKind::VoidCst
        )
    }

    /// Type kinds.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::VoidType
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
        )
    }

    /// Expression kinds: nodes that can carry a location of their own and
    /// whose side effects are computed from their operands.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::ArrayRef { .. }
                | NodeKind::ComponentRef { .. }
                | NodeKind::MemberRef { .. }
                | NodeKind::ModifyExpr { .. }
                | NodeKind::RealpartExpr(_)
                | NodeKind::ImagpartExpr(_)
                | NodeKind::NopExpr(_)
                | NodeKind::ConvertExpr(_)
                | NodeKind::NonLvalueExpr(_)
                | NodeKind::ViewConvertExpr(_)
                | NodeKind::FloatExpr(_)
                | NodeKind::NonDependentExpr(_)
                | NodeKind::AddrExpr(_)
                | NodeKind::IndirectRef(_)
                | NodeKind::Binary { .. }
                | NodeKind::CompoundExpr { .. }
                | NodeKind::CondExpr { .. }
                | NodeKind::CallExpr { .. }
                | NodeKind::TargetExpr { .. }
                | NodeKind::Constructor { .. }
                | NodeKind::Cast { .. }
                | NodeKind::DeclExpr(_)
                | NodeKind::NontypeArgumentPack { .. }
                | NodeKind::ExprPackExpansion { .. }
                | NodeKind::SizeofExpr(_)
                | NodeKind::AlignofExpr(_)
                | NodeKind::NoexceptExpr(_)
                | NodeKind::RequiresExpr { .. }
                | NodeKind::CoAwaitExpr { .. }
                | NodeKind::CoReturnExpr { .. }
                | NodeKind::Opaque { .. }
        )
    }

    /// Kinds whose operands are never evaluated.
    pub fn is_unevaluated(&self) -> bool {
        matches!(
            self,
            NodeKind::SizeofExpr(_)
                | NodeKind::AlignofExpr(_)
                | NodeKind::NoexceptExpr(_)
                | NodeKind::RequiresExpr { .. }
                | NodeKind::DecltypeType { .. }
        )
    }

    /// Kinds that have an effect of their own, independent of operands.
    pub fn has_inherent_side_effects(&self) -> bool {
        matches!(
            self,
            NodeKind::ModifyExpr { .. }
                | NodeKind::CallExpr { .. }
                | NodeKind::CoAwaitExpr { .. }
                | NodeKind::CoReturnExpr { .. }
        )
    }
}

#[cfg(test)]
mod tests;
