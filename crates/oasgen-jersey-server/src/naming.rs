use std::collections::{HashMap, HashSet};

use oasgen_core::ir::{IrModel, IrSpec, IrType, NormalizedName};

use crate::type_mapper::{escape_identifier, unique_name};

/// Simple names the generated sources declare, import, or use from
/// `java.lang`. A model class may not shadow any of them.
const RESERVED_CLASSES: &[&str] = &[
    "JAXBBean",
    "ObjectFactory",
    "ArrayList",
    "Arrays",
    "BigDecimal",
    "Collections",
    "LinkedHashSet",
    "List",
    "LocalDate",
    "Map",
    "Objects",
    "OffsetDateTime",
    "Serializable",
    "Set",
    "XmlAccessType",
    "XmlAccessorType",
    "XmlElement",
    "XmlElementWrapper",
    "XmlRegistry",
    "XmlRootElement",
    "Boolean",
    "Class",
    "Double",
    "Float",
    "Integer",
    "Long",
    "Object",
    "Override",
    "String",
    "SuppressWarnings",
    "UnsupportedOperationException",
];

/// Copy of `ir` in which every model and executor group carries a valid,
/// distinct Java class name. Model references follow the renames.
pub fn with_java_class_names(ir: &IrSpec) -> IrSpec {
    let mut spec = ir.clone();

    let mut taken: HashSet<String> = RESERVED_CLASSES.iter().map(|c| c.to_string()).collect();
    let mut renames: HashMap<String, String> = HashMap::new();
    for model in &mut spec.models {
        let name = model_name_mut(model);
        let class = unique_name(&mut taken, &escape_identifier(&name.pascal_case));
        if class != name.pascal_case {
            renames.insert(name.pascal_case.clone(), class.clone());
            name.pascal_case = class;
        }
    }

    if !renames.is_empty() {
        for model in &mut spec.models {
            match model {
                IrModel::Object(object) => {
                    for field in &mut object.fields {
                        rename_type(&mut field.field_type, &renames);
                    }
                }
                IrModel::Container(container) => {
                    if let Some(class) = renames.get(&container.item.pascal_case) {
                        container.item.pascal_case = class.clone();
                    }
                }
            }
        }
        for op in &mut spec.operations {
            for param in &mut op.parameters {
                rename_type(&mut param.param_type, &renames);
            }
            if let Some(body) = &mut op.request_body {
                rename_type(&mut body.body_type, &renames);
            }
            if let Some(response) = &mut op.response {
                rename_type(&mut response.response_type, &renames);
            }
        }
    }

    let mut executors = HashSet::new();
    for group in &mut spec.groups {
        let class = escape_identifier(&group.name.pascal_case);
        group.name.pascal_case = unique_name(&mut executors, &class);
    }

    spec
}

fn model_name_mut(model: &mut IrModel) -> &mut NormalizedName {
    match model {
        IrModel::Object(object) => &mut object.name,
        IrModel::Container(container) => &mut container.name,
    }
}

fn rename_type(ir_type: &mut IrType, renames: &HashMap<String, String>) {
    match ir_type {
        IrType::Ref(name) => {
            if let Some(class) = renames.get(name.as_str()) {
                *name = class.clone();
            }
        }
        IrType::List(inner) | IrType::Map(inner) => rename_type(inner, renames),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasgen_core::document::HttpMethod;
    use oasgen_core::ir::{
        IrContainerModel, IrExecutorGroup, IrField, IrInfo, IrObjectModel, IrOperation,
        IrResponse,
    };
    use oasgen_core::transform::name_normalizer::normalize_name;

    fn object(name: &str, fields: Vec<IrField>) -> IrModel {
        IrModel::Object(IrObjectModel {
            name: normalize_name(name),
            description: None,
            fields,
        })
    }

    fn field(name: &str, field_type: IrType) -> IrField {
        IrField {
            name: normalize_name(name),
            original_name: name.to_string(),
            field_type,
            required: false,
            description: None,
        }
    }

    fn group(name: &str, index: usize) -> IrExecutorGroup {
        IrExecutorGroup {
            name: normalize_name(name),
            operation_indices: vec![index],
        }
    }

    fn spec() -> IrSpec {
        IrSpec {
            info: IrInfo {
                title: "Naming".into(),
                description: None,
                version: "1".into(),
            },
            models: vec![
                object("List", Vec::new()),
                object(
                    "2fa",
                    vec![
                        field("entries", IrType::List(Box::new(IrType::Ref("List".into())))),
                        field("byKey", IrType::Map(Box::new(IrType::Ref("2fa".into())))),
                    ],
                ),
                IrModel::Container(IrContainerModel {
                    name: normalize_name("Lists"),
                    description: None,
                    item: normalize_name("List"),
                    min_items: None,
                    max_items: None,
                }),
                object("ObjectFactory", Vec::new()),
            ],
            operations: vec![IrOperation {
                name: normalize_name("getFactor"),
                method: HttpMethod::Get,
                path: "/2fa".into(),
                summary: None,
                description: None,
                tags: Vec::new(),
                parameters: Vec::new(),
                request_body: None,
                response: Some(IrResponse {
                    status: "200".into(),
                    response_type: IrType::Ref("2fa".into()),
                    description: None,
                }),
                deprecated: false,
            }],
            groups: vec![group("2fa", 0), group("Article", 0), group("Article", 0)],
        }
    }

    #[test]
    fn models_avoid_invalid_and_shadowing_names() {
        let renamed = with_java_class_names(&spec());
        let names: Vec<&str> = renamed
            .models
            .iter()
            .map(|m| m.name().pascal_case.as_str())
            .collect();
        assert_eq!(names, vec!["List1", "_2fa", "Lists", "ObjectFactory1"]);
    }

    #[test]
    fn references_follow_renamed_models() {
        let renamed = with_java_class_names(&spec());
        let IrModel::Object(factor) = &renamed.models[1] else {
            panic!("expected an object model");
        };
        assert_eq!(
            factor.fields[0].field_type,
            IrType::List(Box::new(IrType::Ref("List1".into())))
        );
        assert_eq!(
            factor.fields[1].field_type,
            IrType::Map(Box::new(IrType::Ref("_2fa".into())))
        );
        assert_eq!(renamed.models[2].item().map(|i| i.pascal_case.as_str()), Some("List1"));
        assert_eq!(
            renamed.operations[0].response.as_ref().map(|r| &r.response_type),
            Some(&IrType::Ref("_2fa".into()))
        );
    }

    #[test]
    fn executor_classes_are_distinct() {
        let renamed = with_java_class_names(&spec());
        let names: Vec<&str> = renamed
            .groups
            .iter()
            .map(|g| g.name.pascal_case.as_str())
            .collect();
        assert_eq!(names, vec!["_2fa", "Article", "Article1"]);
    }
}
