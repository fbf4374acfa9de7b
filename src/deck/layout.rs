//! Layout name resolution against the built-in template.

use crate::ooxml::pptx::BuiltinLayout;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Layout resolution rules from the deck `meta`.
#[derive(Debug, Clone, Default)]
pub struct LayoutResolver {
    aliases: BTreeMap<String, String>,
    default_layout: Option<String>,
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl LayoutResolver {
    pub fn new(aliases: BTreeMap<String, String>, default_layout: Option<String>) -> Self {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(k, v)| (collapse_whitespace(&k), v))
                .collect(),
            default_layout,
        }
    }

    /// Resolve a slide's requested layout; `slide` is the 1-based slide
    /// number used in log messages.
    ///
    /// Order: collapse whitespace, apply aliases, match a built-in name
    /// exactly, then `default_layout`, then `Blank`.
    pub fn resolve(&self, requested: Option<&str>, slide: usize) -> BuiltinLayout {
        if let Some(requested) = requested {
            let mut name = collapse_whitespace(requested);
            if let Some(target) = self.aliases.get(&name) {
                debug!(slide, alias = %name, target = %target, "layout alias applied");
                name = collapse_whitespace(target);
            }
            if let Some(layout) = BuiltinLayout::from_name(&name) {
                return layout;
            }
            warn!(slide, layout = %name, "unknown layout, trying default_layout");
        }

        if let Some(default) = &self.default_layout {
            let name = collapse_whitespace(default);
            if let Some(layout) = BuiltinLayout::from_name(&name) {
                return layout;
            }
            warn!(slide, layout = %name, "unknown default_layout");
        }

        if requested.is_some() || self.default_layout.is_some() {
            warn!(slide, "falling back to the Blank layout");
        }
        BuiltinLayout::Blank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_whitespace() {
        let resolver = LayoutResolver::default();
        assert_eq!(resolver.resolve(Some("Title Only"), 1), BuiltinLayout::TitleOnly);
        assert_eq!(resolver.resolve(Some("  Title \t Only "), 1), BuiltinLayout::TitleOnly);
        assert_eq!(resolver.resolve(None, 1), BuiltinLayout::Blank);
    }

    #[test]
    fn test_alias_then_default_then_blank() {
        let resolver = LayoutResolver::new(
            BTreeMap::from([("header only".to_string(), "Title Only".to_string())]),
            Some("Title Only".to_string()),
        );
        assert_eq!(resolver.resolve(Some("header  only"), 1), BuiltinLayout::TitleOnly);
        assert_eq!(resolver.resolve(Some("Two Content"), 2), BuiltinLayout::TitleOnly);
        assert_eq!(resolver.resolve(None, 3), BuiltinLayout::TitleOnly);

        let resolver = LayoutResolver::new(BTreeMap::new(), Some("Nope".to_string()));
        assert_eq!(resolver.resolve(Some("title only"), 1), BuiltinLayout::Blank);
    }
}
