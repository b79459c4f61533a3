//! Language tag to formatter profile mapping.
//!
//! Profiles are prettier parser names. Tags are matched case-insensitively;
//! unknown and absent tags fall back to [`DEFAULT_PROFILE`].

use std::collections::HashMap;
use std::sync::LazyLock;

/// Profile for tags without a dedicated parser: plain JavaScript.
pub const DEFAULT_PROFILE: &str = "babel";

/// Formatter profile for a code block language tag.
pub fn formatter_profile(language: Option<&str>) -> &'static str {
    language
        .map(str::to_lowercase)
        .and_then(|lower| PROFILES.get(lower.as_str()).copied())
        .unwrap_or(DEFAULT_PROFILE)
}

static PROFILES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // TypeScript
    m.insert("typescript", "typescript");
    m.insert("ts", "typescript");
    m.insert("tsx", "typescript");
    m.insert("mts", "typescript");
    m.insert("cts", "typescript");

    // JavaScript
    m.insert("javascript", "babel");
    m.insert("js", "babel");
    m.insert("jsx", "babel");
    m.insert("mjs", "babel");
    m.insert("cjs", "babel");
    m.insert("node", "babel");

    // JSON
    m.insert("json", "json");
    m.insert("jsonc", "json");
    m.insert("json5", "json5");

    // Stylesheets
    m.insert("css", "css");
    m.insert("scss", "scss");
    m.insert("less", "less");

    // Markup
    m.insert("html", "html");
    m.insert("htm", "html");
    m.insert("vue", "vue");

    // Markdown
    m.insert("markdown", "markdown");
    m.insert("md", "markdown");
    m.insert("mdx", "mdx");

    // YAML
    m.insert("yaml", "yaml");
    m.insert("yml", "yaml");

    // GraphQL
    m.insert("graphql", "graphql");
    m.insert("gql", "graphql");

    m
});
