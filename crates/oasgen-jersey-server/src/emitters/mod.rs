pub mod executors;
pub mod models;
pub mod support;

use minijinja::{Environment, Value};
use oasgen_core::GeneratorError;

/// Escape `*/` sequences that would prematurely close Javadoc comment blocks.
fn escape_javadoc(value: String) -> String {
    value.replace("*/", "*&#47;")
}

/// Render one embedded template.
pub(crate) fn render(name: &str, source: &str, ctx: Value) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("escape_javadoc", escape_javadoc);
    env.add_template(name, source)
        .map_err(|err| GeneratorError::render(name, err))?;
    let tmpl = env
        .get_template(name)
        .map_err(|err| GeneratorError::render(name, err))?;
    tmpl.render(ctx)
        .map_err(|err| GeneratorError::render(name, err))
}

/// Split free text into trimmed Javadoc lines, dropping blank edges.
pub(crate) fn doc_lines(text: Option<&str>) -> Vec<String> {
    let lines: Vec<String> = text
        .unwrap_or_default()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].to_vec(),
        _ => Vec::new(),
    }
}
