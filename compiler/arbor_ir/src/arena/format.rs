//! Type and declaration formatting for diagnostic text.

#![allow(clippy::format_push_string)]

use crate::{NodeFlags, NodeId, NodeKind};

use super::TreeArena;

impl TreeArena {
    /// Format a type as it is spelled in diagnostics.
    pub fn format_type(&self, ty: NodeId) -> String {
        let mut buf = String::new();
        self.format_type_into(ty, &mut buf);
        buf
    }

    /// Format a type into an existing buffer.
    pub fn format_type_into(&self, ty: NodeId, buf: &mut String) {
        let flags = self.flags(ty);
        if flags.contains(NodeFlags::CONST) {
            buf.push_str("const ");
        }
        if flags.contains(NodeFlags::VOLATILE) {
            buf.push_str("volatile ");
        }
        match self.kind(ty) {
            NodeKind::ErrorMark => buf.push_str("<error>"),
            NodeKind::VoidType => buf.push_str("void"),
            NodeKind::BooleanType => buf.push_str("bool"),
            NodeKind::IntegerType {
                precision,
                unsigned,
                name,
            } => match name {
                Some(name) => buf.push_str(self.name_str(name)),
                None => {
                    buf.push(if unsigned { 'u' } else { 'i' });
                    buf.push_str(&precision.to_string());
                }
            },
            NodeKind::RealType { precision } => match precision {
                32 => buf.push_str("float"),
                64 => buf.push_str("double"),
                _ => buf.push_str(&format!("f{precision}")),
            },
            NodeKind::PointerType { pointee } => {
                self.format_type_into(pointee, buf);
                buf.push('*');
            }
            NodeKind::ReferenceType { referent } => {
                self.format_type_into(referent, buf);
                buf.push('&');
            }
            NodeKind::ArrayType { element } => {
                self.format_type_into(element, buf);
                buf.push_str("[]");
            }
            NodeKind::FunctionType { ret, params } => {
                self.format_type_into(ret, buf);
                buf.push('(');
                for (i, &param) in self.list(params).iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    self.format_type_into(param, buf);
                }
                buf.push(')');
            }
            NodeKind::RecordType { name, .. } => match name.and_then(|d| self.decl_name(d)) {
                Some(name) => buf.push_str(self.name_str(name)),
                None => buf.push_str("<anonymous struct>"),
            },
            NodeKind::TypenameType { context, fullname } => {
                buf.push_str("typename ");
                if let Some(context) = context {
                    self.format_type_into(context, buf);
                    buf.push_str("::");
                }
                self.format_decl_into(fullname, buf);
            }
            NodeKind::DecltypeType { .. } => buf.push_str("decltype(...)"),
            NodeKind::TypeofType { .. } => buf.push_str("typeof(...)"),
            NodeKind::UnderlyingType { ty } => {
                buf.push_str("__underlying_type(");
                self.format_type_into(ty, buf);
                buf.push(')');
            }
            NodeKind::TypePackExpansion { pattern, .. } => {
                self.format_type_into(pattern, buf);
                buf.push_str("...");
            }
            other => buf.push_str(&format!("<{}>", other.code_name())),
        }
    }

    /// Format a declaration by its name.
    pub fn format_decl(&self, decl: NodeId) -> String {
        let mut buf = String::new();
        self.format_decl_into(decl, &mut buf);
        buf
    }

    fn format_decl_into(&self, decl: NodeId, buf: &mut String) {
        match self.kind(decl) {
            NodeKind::Identifier(name) => buf.push_str(self.name_str(name)),
            NodeKind::UsingDecl { name, .. } => self.format_decl_into(name, buf),
            kind => match kind.decl() {
                Some(payload) => buf.push_str(self.name_str(payload.name)),
                None => buf.push_str(&format!("<{}>", kind.code_name())),
            },
        }
    }
}
