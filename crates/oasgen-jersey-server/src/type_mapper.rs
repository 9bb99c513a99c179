use std::collections::{BTreeSet, HashSet};

use oasgen_core::ir::IrType;

/// Words that cannot be used as Java identifiers.
const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "true", "try", "var", "void", "volatile", "while", "yield",
];

/// Accessor suffixes that would clash with `Object` or `JAXBBean` methods.
const CLASHING_ACCESSORS: &[&str] = &["Class", "AttributeNames"];

/// Map an `IrType` to its Java type string representation.
pub fn java_type(ir_type: &IrType) -> String {
    match ir_type {
        IrType::String => "String".to_string(),
        IrType::Integer => "Integer".to_string(),
        IrType::Long => "Long".to_string(),
        IrType::Float => "Float".to_string(),
        IrType::Double => "Double".to_string(),
        IrType::Decimal => "BigDecimal".to_string(),
        IrType::Boolean => "Boolean".to_string(),
        IrType::Date => "LocalDate".to_string(),
        IrType::DateTime => "OffsetDateTime".to_string(),
        IrType::Binary => "byte[]".to_string(),
        IrType::Any => "Object".to_string(),
        IrType::Enum { base, .. } => java_type(base),
        IrType::Ref(name) => name.clone(),
        IrType::List(inner) => format!("List<{}>", java_type(inner)),
        IrType::Map(values) => format!("Map<String, {}>", java_type(values)),
    }
}

/// Collect the imports a declaration of `ir_type` needs. Model references
/// are imported from `model_package` when given, and left alone otherwise
/// (same package).
pub fn collect_imports(ir_type: &IrType, model_package: Option<&str>, imports: &mut BTreeSet<String>) {
    match ir_type {
        IrType::Decimal => {
            imports.insert("java.math.BigDecimal".to_string());
        }
        IrType::Date => {
            imports.insert("java.time.LocalDate".to_string());
        }
        IrType::DateTime => {
            imports.insert("java.time.OffsetDateTime".to_string());
        }
        IrType::Enum { base, .. } => collect_imports(base, model_package, imports),
        IrType::Ref(name) => {
            if let Some(package) = model_package {
                imports.insert(format!("{package}.{name}"));
            }
        }
        IrType::List(inner) => {
            imports.insert("java.util.List".to_string());
            collect_imports(inner, model_package, imports);
        }
        IrType::Map(values) => {
            imports.insert("java.util.Map".to_string());
            collect_imports(values, model_package, imports);
        }
        _ => {}
    }
}

/// Allowed values of an enum-typed field, for its Javadoc.
pub fn enum_values(ir_type: &IrType) -> Option<&[String]> {
    match ir_type {
        IrType::Enum { values, .. } => Some(values),
        IrType::List(inner) => enum_values(inner),
        _ => None,
    }
}

/// Make `name` usable as a Java identifier.
pub fn escape_identifier(name: &str) -> String {
    if JAVA_RESERVED.contains(&name) {
        format!("{name}_")
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// PascalCase part of a getter/setter name.
pub fn accessor_suffix(pascal: &str) -> String {
    if CLASHING_ACCESSORS.contains(&pascal) {
        format!("{pascal}Value")
    } else if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{pascal}")
    } else {
        pascal.to_string()
    }
}

/// First use of `name` wins; later duplicates get a numeric suffix.
pub fn unique_name(seen: &mut HashSet<String>, name: &str) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}{counter}");
        if seen.insert(candidate.clone()) {
            log::warn!("duplicate Java identifier '{name}'; using '{candidate}'");
            return candidate;
        }
        counter += 1;
    }
}
