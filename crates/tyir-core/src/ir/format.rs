use std::fmt;

use crate::ir::{
    context::IrContext,
    types::{IrType, IrTypeData},
};

pub struct DisplayType<'a> {
    ctx: &'a IrContext,
    ty: IrType,
}

impl IrContext {
    pub fn display(&self, ty: IrType) -> DisplayType<'_> {
        DisplayType { ctx: self, ty }
    }

    /// Module-level definition of a named struct, e.g. `%main.T = type { i64 }`.
    pub fn definition(&self, ty: IrType) -> Option<String> {
        let name = self.struct_name(ty)?;
        let body = match self.data(ty) {
            IrTypeData::Struct(s) => match &s.body {
                Some(fields) => self.struct_body(fields, s.packed),
                None => "opaque".to_string(),
            },
            _ => return None,
        };
        Some(format!("%{} = type {}", quote_name(name), body))
    }

    fn struct_body(&self, fields: &[IrType], packed: bool) -> String {
        let inner = fields
            .iter()
            .map(|&f| self.display(f).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        match (packed, fields.is_empty()) {
            (false, true) => "{}".to_string(),
            (true, true) => "<{}>".to_string(),
            (false, false) => format!("{{ {} }}", inner),
            (true, false) => format!("<{{ {} }}>", inner),
        }
    }
}

fn quote_name(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$' | '-'));
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\\22"))
    }
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.ctx;
        match ctx.data(self.ty) {
            IrTypeData::Void => write!(f, "void"),
            IrTypeData::Int(bits) => write!(f, "i{}", bits),
            IrTypeData::Float => write!(f, "float"),
            IrTypeData::Double => write!(f, "double"),
            IrTypeData::Pointer {
                pointee,
                addr_space: 0,
            } => write!(f, "{}*", ctx.display(*pointee)),
            IrTypeData::Pointer {
                pointee,
                addr_space,
            } => write!(f, "{} addrspace({})*", ctx.display(*pointee), addr_space),
            IrTypeData::Array { elem, len } => write!(f, "[{} x {}]", len, ctx.display(*elem)),
            IrTypeData::Struct(s) => match &s.name {
                Some(name) => write!(f, "%{}", quote_name(name)),
                None => {
                    let body = s.body.as_deref().unwrap_or_default();
                    f.write_str(&ctx.struct_body(body, s.packed))
                }
            },
            IrTypeData::Function {
                ret,
                params,
                variadic,
            } => {
                let mut parts = params
                    .iter()
                    .map(|&p| ctx.display(p).to_string())
                    .collect::<Vec<_>>();
                if *variadic {
                    parts.push("...".to_string());
                }
                write!(f, "{} ({})", ctx.display(*ret), parts.join(", "))
            }
        }
    }
}
