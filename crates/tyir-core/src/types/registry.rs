use cranelift_entity::{EntityRef, PrimaryMap};
use indexmap::IndexSet;

use crate::{
    types::{
        BasicKind, ChanDir, Field, Method, NamedId, NamedType, Signature, SourceType, SourceTypeId,
    },
    LowerError, Result,
};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: IndexSet<SourceType>,
    named: PrimaryMap<NamedId, NamedType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a type, returning the existing id for a structurally equal one.
    pub fn intern(&mut self, ty: SourceType) -> SourceTypeId {
        let (index, _) = self.types.insert_full(ty);
        SourceTypeId::new(index)
    }

    pub fn get(&self, id: SourceTypeId) -> &SourceType {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn basic(&mut self, kind: BasicKind) -> SourceTypeId {
        self.intern(SourceType::Basic(kind))
    }

    pub fn pointer(&mut self, elem: SourceTypeId) -> SourceTypeId {
        self.intern(SourceType::Pointer(elem))
    }

    pub fn array(&mut self, elem: SourceTypeId, len: u64) -> SourceTypeId {
        self.intern(SourceType::Array { elem, len })
    }

    pub fn slice(&mut self, elem: SourceTypeId) -> SourceTypeId {
        self.intern(SourceType::Slice(elem))
    }

    pub fn map(&mut self, key: SourceTypeId, value: SourceTypeId) -> SourceTypeId {
        self.intern(SourceType::Map { key, value })
    }

    pub fn chan(&mut self, elem: SourceTypeId, dir: ChanDir) -> SourceTypeId {
        self.intern(SourceType::Chan { elem, dir })
    }

    pub fn struct_(&mut self, fields: Vec<Field>) -> SourceTypeId {
        self.intern(SourceType::Struct(fields))
    }

    pub fn signature(
        &mut self,
        params: Vec<SourceTypeId>,
        results: Vec<SourceTypeId>,
        variadic: bool,
    ) -> SourceTypeId {
        self.intern(SourceType::Signature(Signature {
            params,
            results,
            variadic,
        }))
    }

    /// Method sets are order-insensitive; methods are kept sorted by name.
    pub fn interface(&mut self, mut methods: Vec<Method>) -> SourceTypeId {
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        self.intern(SourceType::Interface(methods))
    }

    /// Declare a new named type. Two declarations never share an id, even
    /// with the same name.
    pub fn declare_named(
        &mut self,
        pkg: Option<&str>,
        name: impl Into<String>,
    ) -> (NamedId, SourceTypeId) {
        let named = self.named.push(NamedType {
            pkg: pkg.map(str::to_string),
            name: name.into(),
            underlying: None,
        });
        (named, self.intern(SourceType::Named(named)))
    }

    pub fn set_underlying(&mut self, named: NamedId, underlying: SourceTypeId) -> Result<()> {
        let decl = &mut self.named[named];
        if decl.underlying.is_some() {
            return Err(LowerError::Malformed(format!(
                "underlying type of {} already set",
                decl.qualified_name()
            )));
        }
        decl.underlying = Some(underlying);
        Ok(())
    }

    /// Declare a named type and set its underlying type in one step.
    pub fn named(
        &mut self,
        pkg: Option<&str>,
        name: impl Into<String>,
        underlying: SourceTypeId,
    ) -> SourceTypeId {
        let (named, id) = self.declare_named(pkg, name);
        self.named[named].underlying = Some(underlying);
        id
    }

    pub fn named_decl(&self, named: NamedId) -> &NamedType {
        &self.named[named]
    }

    /// Follow named types down to a non-named type. Identity for anything else.
    pub fn underlying(&self, id: SourceTypeId) -> Result<SourceTypeId> {
        let mut current = id;
        let mut seen = Vec::new();
        while let SourceType::Named(named) = self.get(current) {
            let decl = &self.named[*named];
            if seen.contains(named) {
                return Err(LowerError::Malformed(format!(
                    "{} has a cyclic underlying type",
                    decl.qualified_name()
                )));
            }
            seen.push(*named);
            current = decl.underlying.ok_or_else(|| {
                LowerError::Malformed(format!(
                    "{} has no underlying type",
                    decl.qualified_name()
                ))
            })?;
        }
        Ok(current)
    }

    pub fn display(&self, id: SourceTypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    fn write_type(&self, out: &mut String, id: SourceTypeId) {
        match self.get(id) {
            SourceType::Basic(kind) => out.push_str(kind.name()),
            SourceType::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem);
            }
            SourceType::Array { elem, len } => {
                out.push_str(&format!("[{}]", len));
                self.write_type(out, *elem);
            }
            SourceType::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem);
            }
            SourceType::Map { key, value } => {
                out.push_str("map[");
                self.write_type(out, *key);
                out.push(']');
                self.write_type(out, *value);
            }
            SourceType::Chan { elem, dir } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, *elem);
            }
            SourceType::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, field.ty);
                }
                out.push('}');
            }
            SourceType::Named(named) => out.push_str(&self.named[*named].qualified_name()),
            SourceType::Signature(sig) => {
                out.push_str("func");
                self.write_signature(out, sig);
            }
            SourceType::Interface(methods) => {
                out.push_str("interface{");
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&method.name);
                    match self.get(method.sig) {
                        SourceType::Signature(sig) => self.write_signature(out, sig),
                        _ => self.write_type(out, method.sig),
                    }
                }
                out.push('}');
            }
        }
    }

    fn write_signature(&self, out: &mut String, sig: &Signature) {
        out.push('(');
        let last = sig.params.len().saturating_sub(1);
        for (i, &param) in sig.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match self.get(param) {
                SourceType::Slice(elem) if sig.variadic && i == last => {
                    out.push_str("...");
                    self.write_type(out, *elem);
                }
                _ => self.write_type(out, param),
            }
        }
        out.push(')');
        match sig.results.as_slice() {
            [] => {}
            [single] => {
                out.push(' ');
                self.write_type(out, *single);
            }
            results => {
                out.push_str(" (");
                for (i, &result) in results.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, result);
                }
                out.push(')');
            }
        }
    }
}
