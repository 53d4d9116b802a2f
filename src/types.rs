//! Flattened type model built from introspection records.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::introspection::{MAX_WRAPPER_DEPTH, RawEnumValue, RawField, RawInputValue, RawType, RawTypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    pub fn is_wrapper(self) -> bool {
        matches!(self, TypeKind::List | TypeKind::NonNull)
    }

    /// Scalars and enums have no selection set.
    pub fn is_leaf(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DESCRIPTOR
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
    pub is_list: bool,
    pub is_non_null: bool,
}

impl TypeDescriptor {
    /// Strip NON_NULL / LIST layers off `raw`, accumulating their flags, until
    /// a named kind is reached.
    pub fn unwrap(raw: &RawTypeRef) -> Result<Self, String> {
        let mut is_list = false;
        let mut is_non_null = false;
        let mut node = raw;
        let mut wrappers = 0usize;

        while node.kind.is_wrapper() {
            wrappers += 1;
            if wrappers > MAX_WRAPPER_DEPTH {
                return Err(format!("more than {MAX_WRAPPER_DEPTH} wrapper layers"));
            }
            match node.kind {
                TypeKind::NonNull => is_non_null = true,
                _ => is_list = true,
            }
            node = match node.of_type.as_deref() {
                Some(inner) => inner,
                None => return Err(format!("{:?} layer without `ofType`", node.kind)),
            };
        }

        let name = node.name.clone().ok_or_else(|| format!("{:?} type without a name", node.kind))?;
        Ok(Self { name, kind: node.kind, is_list, is_non_null })
    }

    pub fn named(name: impl Into<String>, kind: TypeKind) -> Self {
        Self { name: name.into(), kind, is_list: false, is_non_null: false }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_list, self.is_non_null) {
            (false, false) => write!(f, "{}", self.name),
            (false, true) => write!(f, "{}!", self.name),
            (true, false) => write!(f, "[{}]", self.name),
            (true, true) => write!(f, "[{}]!", self.name),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DEFINITIONS
// ————————————————————————————————————————————————————————————————————————————

/// An argument of a field, or an input field of an input object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentDefinition {
    pub name: String,
    pub default_value: Option<String>,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub is_deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeDescriptor,
    pub args: IndexMap<String, ArgumentDefinition>,
}

impl FieldDefinition {
    pub fn is_argumented(&self) -> bool {
        !self.args.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    pub fields: IndexMap<String, Arc<FieldDefinition>>,
    pub input_fields: IndexMap<String, ArgumentDefinition>,
    pub enum_values: IndexMap<String, EnumValue>,
    pub args: IndexMap<String, ArgumentDefinition>,
}

impl TypeDefinition {
    pub fn from_raw(raw: &RawType) -> Result<Self> {
        let fields = raw
            .fields
            .iter()
            .map(|f| {
                let field = field_from_raw(&raw.name, f)?;
                Ok((field.name.clone(), Arc::new(field)))
            })
            .collect::<Result<IndexMap<_, _>>>()?;

        let owner = |member: &str| format!("{}.{member}", raw.name);

        Ok(Self {
            name: raw.name.clone(),
            kind: raw.kind,
            fields,
            input_fields: arguments_from_raw(&raw.input_fields, &owner)?,
            enum_values: raw.enum_values.iter().map(enum_value_from_raw).collect(),
            args: arguments_from_raw(&raw.args, &owner)?,
        })
    }
}

fn field_from_raw(type_name: &str, raw: &RawField) -> Result<FieldDefinition> {
    let owner = format!("{type_name}.{}", raw.name);
    let ty = TypeDescriptor::unwrap(&raw.ty)
        .map_err(|reason| Error::TypeUnwrap { owner: owner.clone(), reason })?;
    let args = arguments_from_raw(&raw.args, &|arg: &str| format!("{owner}({arg})"))?;
    Ok(FieldDefinition { name: raw.name.clone(), ty, args })
}

fn arguments_from_raw(
    raw: &[RawInputValue],
    owner: &dyn Fn(&str) -> String,
) -> Result<IndexMap<String, ArgumentDefinition>> {
    raw.iter()
        .map(|value| {
            let ty = TypeDescriptor::unwrap(&value.ty)
                .map_err(|reason| Error::TypeUnwrap { owner: owner(&value.name), reason })?;
            let arg = ArgumentDefinition {
                name: value.name.clone(),
                default_value: value.default_value.clone(),
                ty,
            };
            Ok((value.name.clone(), arg))
        })
        .collect()
}

fn enum_value_from_raw(raw: &RawEnumValue) -> (String, EnumValue) {
    (raw.name.clone(), EnumValue { name: raw.name.clone(), is_deprecated: raw.is_deprecated })
}
