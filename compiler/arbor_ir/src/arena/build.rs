//! Node builders.
//!
//! Builders allocate a node and derive its flags. `SIDE_EFFECTS` is the OR
//! of the node's own effect and the effects of all evaluated operands, so
//! rebuilding a node from the same operands never loses the flag.

use crate::{Attribute, BinaryOp, CastKind, Decl, NodeFlags, NodeId, NodeKind, Span};

use super::TreeArena;

impl TreeArena {
    // === Generic ===

    /// Allocate a node and derive its evaluation flags from its operands.
    pub fn build(&mut self, kind: NodeKind, ty: Option<NodeId>, span: Span) -> NodeId {
        let id = self.alloc(kind, ty, span);
        self.update_side_effects(id);
        id
    }

    /// Re-derive evaluation flags after an in-place operand change.
    ///
    /// Flags are only ever added here.
    pub fn update_side_effects(&mut self, id: NodeId) {
        let kind = self.kind(id);
        let mut flags = NodeFlags::empty();
        if kind.has_inherent_side_effects() {
            flags |= NodeFlags::SIDE_EFFECTS;
        }
        let volatile_access = matches!(
            kind,
            NodeKind::IndirectRef(_)
                | NodeKind::ArrayRef { .. }
                | NodeKind::ComponentRef { .. }
                | NodeKind::VarDecl(_)
                | NodeKind::ParmDecl(_)
                | NodeKind::FieldDecl(_)
        );
        if volatile_access && self.ty(id).is_some_and(|ty| self.is_volatile(ty)) {
            flags |= NodeFlags::THIS_VOLATILE | NodeFlags::SIDE_EFFECTS;
        }
        if !kind.is_unevaluated()
            && self
                .operands(id)
                .into_iter()
                .any(|op| self.side_effects(op))
        {
            flags |= NodeFlags::SIDE_EFFECTS;
        }
        self.insert_flags(id, flags);
    }

    // === Types ===

    pub fn pointer_type(&mut self, pointee: NodeId) -> NodeId {
        self.alloc(NodeKind::PointerType { pointee }, None, Span::UNKNOWN)
    }

    pub fn reference_type(&mut self, referent: NodeId) -> NodeId {
        self.alloc(NodeKind::ReferenceType { referent }, None, Span::UNKNOWN)
    }

    pub fn array_type(&mut self, element: NodeId) -> NodeId {
        self.alloc(NodeKind::ArrayType { element }, None, Span::UNKNOWN)
    }

    pub fn integer_type(&mut self, precision: u16, unsigned: bool) -> NodeId {
        self.alloc(
            NodeKind::IntegerType {
                precision,
                unsigned,
                name: None,
            },
            None,
            Span::UNKNOWN,
        )
    }

    pub fn real_type(&mut self, precision: u16) -> NodeId {
        self.alloc(NodeKind::RealType { precision }, None, Span::UNKNOWN)
    }

    /// Create a function type `ret(params...)`.
    pub fn function_type(&mut self, ret: NodeId, params: &[NodeId]) -> NodeId {
        let params = self.alloc_list(params);
        self.alloc(NodeKind::FunctionType { ret, params }, None, Span::UNKNOWN)
    }

    /// Create a named record type together with its type declaration.
    ///
    /// `size: None` creates an incomplete (forward-declared) record.
    pub fn record_type(&mut self, name: &str, size: Option<u64>, span: Span) -> NodeId {
        let record = self.alloc(
            NodeKind::RecordType {
                name: None,
                size,
                ptrmemfunc_fn_type: None,
            },
            None,
            Span::UNKNOWN,
        );
        let name = self.intern(name);
        let decl = self.alloc(NodeKind::TypeDecl(Decl::named(name)), Some(record), span);
        self.set_kind(
            record,
            NodeKind::RecordType {
                name: Some(decl),
                size,
                ptrmemfunc_fn_type: None,
            },
        );
        record
    }

    /// Give an incomplete record its size.
    pub fn complete_record_type(&mut self, record: NodeId, size: u64) {
        if let NodeKind::RecordType {
            name,
            ptrmemfunc_fn_type,
            ..
        } = self.kind(record)
        {
            self.set_kind(
                record,
                NodeKind::RecordType {
                    name,
                    size: Some(size),
                    ptrmemfunc_fn_type,
                },
            );
        }
    }

    /// Create a qualified variant of a type.
    ///
    /// `quals` is any combination of `VOLATILE` and `CONST`. The variant is
    /// a distinct node sharing the original's kind and attributes.
    pub fn qualified_type(&mut self, ty: NodeId, quals: NodeFlags) -> NodeId {
        let variant = self.alloc(self.kind(ty), None, self.span(ty));
        let flags = self.flags(ty) | (quals & (NodeFlags::VOLATILE | NodeFlags::CONST));
        self.insert_flags(variant, flags);
        let attrs: Vec<Attribute> = self.attributes(ty).to_vec();
        for attr in attrs {
            self.add_attribute(variant, attr);
        }
        variant
    }

    /// Mark a type as not trivially copyable.
    pub fn mark_addressable(&mut self, ty: NodeId) {
        self.insert_flags(ty, NodeFlags::ADDRESSABLE);
    }

    // === Declarations ===

    pub fn var_decl(&mut self, name: &str, ty: NodeId, span: Span) -> NodeId {
        let name = self.intern(name);
        self.build(NodeKind::VarDecl(Decl::named(name)), Some(ty), span)
    }

    pub fn parm_decl(&mut self, name: &str, ty: NodeId, span: Span) -> NodeId {
        let name = self.intern(name);
        self.build(NodeKind::ParmDecl(Decl::named(name)), Some(ty), span)
    }

    pub fn field_decl(&mut self, name: &str, ty: NodeId, span: Span) -> NodeId {
        let name = self.intern(name);
        self.build(NodeKind::FieldDecl(Decl::named(name)), Some(ty), span)
    }

    /// Declare a function of function type `fn_type`.
    pub fn function_decl(&mut self, name: &str, fn_type: NodeId, span: Span) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::FunctionDecl(Decl::named(name)), Some(fn_type), span)
    }

    /// Set the initializer of a declaration.
    pub fn set_decl_initial(&mut self, decl: NodeId, initial: Option<NodeId>) {
        let mut kind = self.kind(decl);
        if let Some(payload) = kind.decl_mut() {
            payload.initial = initial;
            self.set_kind(decl, kind);
        }
    }

    /// Set the run-time size operands of a declaration.
    pub fn set_decl_size(&mut self, decl: NodeId, size: Option<NodeId>, size_unit: Option<NodeId>) {
        let mut kind = self.kind(decl);
        if let Some(payload) = kind.decl_mut() {
            payload.size = size;
            payload.size_unit = size_unit;
            self.set_kind(decl, kind);
        }
    }

    // === Constants ===

    pub fn integer_cst(&mut self, value: i64, ty: NodeId) -> NodeId {
        self.alloc(NodeKind::IntegerCst(value), Some(ty), Span::UNKNOWN)
    }

    /// Float constant from its bit pattern.
    pub fn real_cst(&mut self, bits: u64, ty: NodeId) -> NodeId {
        self.alloc(NodeKind::RealCst(bits), Some(ty), Span::UNKNOWN)
    }

    pub fn string_cst(&mut self, value: &str, ty: NodeId) -> NodeId {
        let value = self.intern(value);
        self.alloc(NodeKind::StringCst(value), Some(ty), Span::UNKNOWN)
    }

    // === Expressions ===

    /// `*operand`, typed `ty`.
    pub fn indirect_ref(&mut self, operand: NodeId, ty: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::IndirectRef(operand), Some(ty), span)
    }

    /// `&operand`, typed `ty` (a pointer type).
    pub fn addr_expr(&mut self, operand: NodeId, ty: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::AddrExpr(operand), Some(ty), span)
    }

    pub fn nop_expr(&mut self, operand: NodeId, ty: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::NopExpr(operand), Some(ty), span)
    }

    pub fn convert_expr(&mut self, operand: NodeId, ty: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::ConvertExpr(operand), Some(ty), span)
    }

    pub fn non_lvalue_expr(&mut self, operand: NodeId, span: Span) -> NodeId {
        let ty = self.ty(operand);
        self.build(NodeKind::NonLvalueExpr(operand), ty, span)
    }

    /// `lhs, rhs`, typed as `rhs`.
    pub fn compound_expr(&mut self, lhs: NodeId, rhs: NodeId, span: Span) -> NodeId {
        let ty = self.ty(rhs);
        self.build(NodeKind::CompoundExpr { lhs, rhs }, ty, span)
    }

    /// `cond ? second : third`.
    pub fn cond_expr(
        &mut self,
        cond: NodeId,
        second: Option<NodeId>,
        third: NodeId,
        ty: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        self.build(
            NodeKind::CondExpr {
                cond,
                second,
                third,
            },
            ty,
            span,
        )
    }

    /// `callee(args...)`, typed as the call's result.
    pub fn call_expr(
        &mut self,
        callee: Option<NodeId>,
        args: &[NodeId],
        ty: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        let args = self.alloc_list(args);
        self.build(NodeKind::CallExpr { callee, args }, ty, span)
    }

    /// `lhs = rhs`, typed as `lhs`.
    pub fn modify_expr(&mut self, lhs: NodeId, rhs: NodeId, span: Span) -> NodeId {
        let ty = self.ty(lhs);
        self.build(NodeKind::ModifyExpr { lhs, rhs }, ty, span)
    }

    /// `object.field`, typed as the field.
    pub fn component_ref(&mut self, object: NodeId, field: NodeId, span: Span) -> NodeId {
        let ty = self.ty(field);
        self.build(NodeKind::ComponentRef { object, field }, ty, span)
    }

    pub fn array_ref(&mut self, base: NodeId, index: NodeId, ty: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::ArrayRef { base, index }, Some(ty), span)
    }

    /// Temporary `slot` initialized by `initial`, typed as the slot.
    pub fn target_expr(&mut self, slot: NodeId, initial: NodeId, span: Span) -> NodeId {
        let ty = self.ty(slot);
        self.build(NodeKind::TargetExpr { slot, initial }, ty, span)
    }

    pub fn binary(
        &mut self,
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
        ty: NodeId,
        span: Span,
    ) -> NodeId {
        self.build(NodeKind::Binary { op, lhs, rhs }, Some(ty), span)
    }

    pub fn cast(&mut self, kind: CastKind, operand: NodeId, ty: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::Cast { kind, operand }, Some(ty), span)
    }

    pub fn decl_expr(&mut self, decl: NodeId, span: Span) -> NodeId {
        self.build(NodeKind::DeclExpr(decl), None, span)
    }

    /// Wrap a declaration or constant so the use site keeps its own location.
    ///
    /// Constants get a `NonLvalueExpr` wrapper, everything else a
    /// `ViewConvertExpr`; both are flagged `LOCATION_WRAPPER`.
    pub fn location_wrapper(&mut self, operand: NodeId, span: Span) -> NodeId {
        let ty = self.ty(operand);
        let kind = if self.kind(operand).is_constant() {
            NodeKind::NonLvalueExpr(operand)
        } else {
            NodeKind::ViewConvertExpr(operand)
        };
        let wrapper = self.build(kind, ty, span);
        self.insert_flags(wrapper, NodeFlags::LOCATION_WRAPPER);
        wrapper
    }
}
