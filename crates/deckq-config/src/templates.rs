//! Configuration templates for `deckq init`.
//!
//! Templates are stored as valid TOML and handed out fully commented, so a fresh file changes
//! nothing until the user uncomments a line.

/// Local configuration template.
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template.
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// The local configuration template, commented out.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// The global configuration template, commented out.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_template(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
