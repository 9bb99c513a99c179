use minijinja::context;
use oasgen_core::GeneratorError;
use oasgen_core::ir::IrSpec;

use super::render;

/// Emit `model/JAXBBean.java`, the capability every model implements.
pub fn emit_jaxb_bean(package: &str) -> Result<String, GeneratorError> {
    render(
        "jaxb_bean.java.j2",
        include_str!("../../templates/jaxb_bean.java.j2"),
        context! { package => package },
    )
}

/// Emit `model/ObjectFactory.java` with one factory method per model.
pub fn emit_object_factory(package: &str, ir: &IrSpec) -> Result<String, GeneratorError> {
    let models: Vec<String> = ir
        .models
        .iter()
        .map(|model| model.name().pascal_case.clone())
        .collect();

    render(
        "object_factory.java.j2",
        include_str!("../../templates/object_factory.java.j2"),
        context! {
            package => package,
            title => ir.info.title.clone(),
            models => models,
        },
    )
}
