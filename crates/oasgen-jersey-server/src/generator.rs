use oasgen_core::ir::{IrModel, IrSpec};
use oasgen_core::{CodeGenerator, GeneratedFile, GeneratorConfig, GeneratorError, TargetId};

use crate::emitters;
use crate::naming::with_java_class_names;

/// Java / Jersey model and executor stub generator.
pub struct JerseyServerGenerator;

impl JerseyServerGenerator {
    pub const TARGET: TargetId = TargetId {
        language: "java",
        framework: "jersey",
    };
}

/// `src/main/java/<package path>`.
fn source_root(package: &str) -> String {
    format!("src/main/java/{}", package.replace('.', "/"))
}

impl CodeGenerator for JerseyServerGenerator {
    fn target(&self) -> TargetId {
        Self::TARGET
    }

    fn generate(
        &self,
        ir: &IrSpec,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let ir = &with_java_class_names(ir);
        let package = config.package.as_str();
        let root = source_root(package);
        let mut files = Vec::with_capacity(ir.models.len() + ir.groups.len() + 2);

        for model in &ir.models {
            let content = match model {
                IrModel::Object(object) => emitters::models::emit_object_model(package, object)?,
                IrModel::Container(container) => {
                    emitters::models::emit_container_model(package, container)?
                }
            };
            files.push(GeneratedFile {
                path: format!("{root}/model/{}.java", model.name().pascal_case),
                content,
            });
        }

        files.push(GeneratedFile {
            path: format!("{root}/model/JAXBBean.java"),
            content: emitters::support::emit_jaxb_bean(package)?,
        });
        files.push(GeneratedFile {
            path: format!("{root}/model/ObjectFactory.java"),
            content: emitters::support::emit_object_factory(package, ir)?,
        });

        for group in &ir.groups {
            files.push(GeneratedFile {
                path: format!("{root}/executor/{}BOExecutor.java", group.name.pascal_case),
                content: emitters::executors::emit_executor(package, ir, group)?,
            });
        }

        log::debug!(
            "rendered {} model(s) and {} executor(s) for {}",
            ir.models.len(),
            ir.groups.len(),
            Self::TARGET
        );
        Ok(files)
    }
}
