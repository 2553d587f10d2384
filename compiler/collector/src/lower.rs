//! Lowering of parsed type expressions to resolved [`GoType`]s.

use std::collections::{HashMap, HashSet};

use types::{BasicKind, GoType, StructField, StructType};

use crate::parser::{ImportSpec, TypeExpr};

/// Name resolution context for one source file.
pub struct Scope<'a> {
    package: &'a str,
    locals: &'a HashSet<String>,
    imports: HashMap<String, String>,
}

impl<'a> Scope<'a> {
    /// Build a scope for a file of package `package` (an import path).
    ///
    /// `locals` holds every type name declared anywhere in the package.
    pub fn new(package: &'a str, locals: &'a HashSet<String>, imports: &[ImportSpec]) -> Self {
        let imports = imports
            .iter()
            .filter(|spec| !matches!(spec.alias.as_deref(), Some("_") | Some(".")))
            .map(|spec| (spec.local_name().to_string(), spec.path.clone()))
            .collect();
        Self { package, locals, imports }
    }

    /// Resolve a type expression.
    pub fn lower(&self, expr: &TypeExpr) -> GoType {
        match expr {
            TypeExpr::Name { qualifier: None, name } => self.resolve_local(name),
            TypeExpr::Name { qualifier: Some(qualifier), name } => {
                let package = self.imports.get(qualifier).map(String::as_str).unwrap_or(qualifier.as_str());
                GoType::named(package, name.as_str())
            }
            TypeExpr::Pointer(inner) => self.lower(inner).pointer(),
            TypeExpr::Slice(inner) => self.lower(inner).slice(),
            TypeExpr::Array { len, elem } => GoType::Array { len: len.clone(), elem: Box::new(self.lower(elem)) },
            TypeExpr::Map { key, value } => GoType::map(self.lower(key), self.lower(value)),
            TypeExpr::Struct(fields) => GoType::Struct(StructType::new(
                fields
                    .iter()
                    .flat_map(|spec| {
                        let ty = self.lower(&spec.ty);
                        let declared: Vec<StructField> = if spec.names.is_empty() {
                            let name = spec.ty.embedded_name().unwrap_or_default();
                            vec![StructField { name: name.to_string(), ty, embedded: true, tag: spec.tag.clone() }]
                        } else {
                            spec.names
                                .iter()
                                .map(|name| StructField::new(name.as_str(), ty.clone()).with_tag(spec.tag.as_str()))
                                .collect()
                        };
                        declared
                    })
                    .collect(),
            )),
            TypeExpr::Interface { empty } => GoType::Interface { empty: *empty },
            TypeExpr::Func => GoType::Func,
            TypeExpr::Chan(inner) => GoType::Chan(Box::new(self.lower(inner))),
        }
    }

    // Package-level declarations shadow predeclared identifiers.
    fn resolve_local(&self, name: &str) -> GoType {
        if self.locals.contains(name) {
            return GoType::named(self.package, name);
        }
        if let Some(kind) = BasicKind::from_ident(name) {
            return GoType::Basic(kind);
        }
        match name {
            "any" => GoType::any(),
            "error" => GoType::Interface { empty: false },
            _ => GoType::named("", name),
        }
    }
}
