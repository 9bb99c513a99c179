use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        screaming_snake: sanitized.to_shouty_snake_case(),
    }
}

/// Derive a camelCase operation name from HTTP method + path, for
/// operations without an `operationId`.
///
/// - `GET /articles` → `listArticles`
/// - `GET /articles/{id}` → `getArticle`
/// - `POST /articles/{id}/comments` → `createArticlesComments`
pub fn route_to_name(method: &str, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if seg.starts_with('{') && seg.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(seg);
            ends_with_param = false;
        }
    }

    let prefix = match method.to_ascii_uppercase().as_str() {
        "GET" if ends_with_param => "get",
        "GET" => "list",
        "POST" => "create",
        "PUT" => "update",
        "DELETE" => "delete",
        "PATCH" => "patch",
        "OPTIONS" => "options",
        "HEAD" => "head",
        "TRACE" => "trace",
        _ => "call",
    };

    let last = resource_parts.len().saturating_sub(1);
    let resource: String = resource_parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last && ends_with_param {
                singularize(part).to_pascal_case()
            } else {
                part.to_pascal_case()
            }
        })
        .collect();

    format!("{prefix}{resource}")
}

/// Package/output name for a spec file, from its final path segment.
///
/// - `bundle-openapi.yaml` → `main`
/// - `bundle-openapi-knowledge-portal.yaml` → `knowledge_portal`
/// - `user.mgmt-v4.yml` → `user_mgmt_v4`
pub fn derive_spec_name(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file
        .strip_suffix(".yaml")
        .or_else(|| file.strip_suffix(".yml"))
        .unwrap_or(file);

    if stem == "bundle-openapi" {
        return "main".to_string();
    }
    if let Some(rest) = stem.strip_prefix("bundle-openapi-") {
        return rest.replace('-', "_");
    }
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Naive singularization: strips trailing 's' if present.
fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
