use super::*;

#[test]
fn test_kind_categories_are_disjoint() {
    let decl = NodeKind::VarDecl(Decl::named(Name::EMPTY));
    let ty = NodeKind::PointerType {
        pointee: NodeId::new(5),
    };
    let expr = NodeKind::IndirectRef(NodeId::new(6));
    let cst = NodeKind::IntegerCst(3);

    assert!(decl.is_decl() && !decl.is_type() && !decl.is_expression());
    assert!(ty.is_type() && !ty.is_decl() && !ty.is_expression());
    assert!(expr.is_expression() && !expr.is_decl() && !expr.is_constant());
    assert!(cst.is_constant() && !cst.is_expression());
}

#[test]
fn test_decl_payload_access() {
    let mut kind = NodeKind::ParmDecl(Decl::named(Name::EMPTY));
    assert!(kind.decl().is_some());
    if let Some(decl) = kind.decl_mut() {
        decl.initial = Some(NodeId::new(9));
    }
    assert_eq!(kind.decl().and_then(|d| d.initial), Some(NodeId::new(9)));

    let using = NodeKind::UsingDecl {
        name: NodeId::new(1),
        scope: None,
        decls: None,
    };
    assert!(using.is_decl());
    assert!(using.decl().is_none());
}

#[test]
fn test_unevaluated_kinds() {
    assert!(NodeKind::SizeofExpr(NodeId::new(2)).is_unevaluated());
    assert!(NodeKind::DecltypeType {
        expr: NodeId::new(2)
    }
    .is_unevaluated());
    assert!(!NodeKind::NopExpr(NodeId::new(2)).is_unevaluated());
}

#[test]
fn test_inherent_side_effects() {
    assert!(NodeKind::CallExpr {
        callee: None,
        args: NodeRange::EMPTY
    }
    .has_inherent_side_effects());
    assert!(!NodeKind::CompoundExpr {
        lhs: NodeId::new(2),
        rhs: NodeId::new(3)
    }
    .has_inherent_side_effects());
}

#[test]
fn test_code_names() {
    assert_eq!(NodeKind::ErrorMark.code_name(), "error_mark");
    assert_eq!(NodeKind::IndirectRef(NodeId::VOID).code_name(), "indirect_ref");
    assert_eq!(NodeKind::DeferredParse.code_name(), "deferred_parse");
}
