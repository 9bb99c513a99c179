use oasgen_core::{CodeGenerator, GeneratorError, TargetId};
use oasgen_jersey_server::JerseyServerGenerator;

fn registered() -> Vec<Box<dyn CodeGenerator>> {
    vec![Box::new(JerseyServerGenerator)]
}

/// Every (language, framework) pair with a generator.
pub fn targets() -> Vec<TargetId> {
    registered().iter().map(|generator| generator.target()).collect()
}

/// Look up a generator by language and framework tag, ignoring case.
pub fn generator_for(
    language: &str,
    framework: &str,
) -> Result<Box<dyn CodeGenerator>, GeneratorError> {
    registered()
        .into_iter()
        .find(|generator| {
            let target = generator.target();
            target.language.eq_ignore_ascii_case(language.trim())
                && target.framework.eq_ignore_ascii_case(framework.trim())
        })
        .ok_or_else(|| GeneratorError::UnsupportedTarget {
            language: language.to_string(),
            framework: framework.to_string(),
        })
}
