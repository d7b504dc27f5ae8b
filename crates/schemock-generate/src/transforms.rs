//! Named value transforms used by overwrite checks and transform nodes.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::value::GeneratedValue;

/// A named value transform.
pub trait ValueTransform: Send + Sync {
    fn id(&self) -> &str;
    fn apply(&self, input: GeneratedValue) -> GeneratedValue;
}

/// Registry of transforms keyed by id; ships `lowercase`, `uppercase`,
/// `trim`, and `slugify`.
#[derive(Clone)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, Arc<dyn ValueTransform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(CaseTransform::Lower));
        registry.register(Arc::new(CaseTransform::Upper));
        registry.register(Arc::new(TrimTransform));
        registry.register(Arc::new(SlugifyTransform));
        registry
    }

    pub fn empty() -> Self {
        Self {
            transforms: BTreeMap::new(),
        }
    }

    /// Registers a transform, replacing any transform with the same id.
    pub fn register(&mut self, transform: Arc<dyn ValueTransform>) {
        self.transforms.insert(transform.id().to_string(), transform);
    }

    /// Registers a closure under `id`.
    pub fn register_fn<F>(&mut self, id: impl Into<String>, apply: F)
    where
        F: Fn(GeneratedValue) -> GeneratedValue + Send + Sync + 'static,
    {
        self.register(Arc::new(FnTransform {
            id: id.into(),
            apply: Box::new(apply),
        }));
    }

    pub fn get(&self, id: &str) -> Option<&dyn ValueTransform> {
        self.transforms.get(id).map(|transform| transform.as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.transforms.keys().map(String::as_str).collect()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

struct FnTransform {
    id: String,
    apply: Box<dyn Fn(GeneratedValue) -> GeneratedValue + Send + Sync>,
}

impl ValueTransform for FnTransform {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&self, input: GeneratedValue) -> GeneratedValue {
        (self.apply)(input)
    }
}

enum CaseTransform {
    Lower,
    Upper,
}

impl ValueTransform for CaseTransform {
    fn id(&self) -> &str {
        match self {
            CaseTransform::Lower => "lowercase",
            CaseTransform::Upper => "uppercase",
        }
    }

    fn apply(&self, input: GeneratedValue) -> GeneratedValue {
        map_text(input, |text| match self {
            CaseTransform::Lower => text.to_lowercase(),
            CaseTransform::Upper => text.to_uppercase(),
        })
    }
}

struct TrimTransform;

impl ValueTransform for TrimTransform {
    fn id(&self) -> &str {
        "trim"
    }

    fn apply(&self, input: GeneratedValue) -> GeneratedValue {
        map_text(input, |text| text.trim().to_string())
    }
}

struct SlugifyTransform;

impl ValueTransform for SlugifyTransform {
    fn id(&self) -> &str {
        "slugify"
    }

    fn apply(&self, input: GeneratedValue) -> GeneratedValue {
        map_text(input, slugify)
    }
}

/// Applies `f` to text values; everything else passes through.
fn map_text(input: GeneratedValue, f: impl Fn(&str) -> String) -> GeneratedValue {
    match input {
        GeneratedValue::Text(text) => GeneratedValue::Text(f(&text)),
        other => other,
    }
}

static SLUG_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug pattern"));
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid separator pattern"));

fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let cleaned = SLUG_INVALID.replace_all(&lowered, "");
    let dashed = SLUG_SEPARATORS.replace_all(&cleaned, "-");
    dashed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> GeneratedValue {
        GeneratedValue::Text(value.to_string())
    }

    #[test]
    fn builtins_are_registered() {
        let registry = TransformRegistry::new();
        assert_eq!(registry.ids(), vec!["lowercase", "slugify", "trim", "uppercase"]);
    }

    #[test]
    fn slugify_normalizes_separators() {
        let registry = TransformRegistry::new();
        let slug = registry.get("slugify").expect("slugify");
        assert_eq!(slug.apply(text("  Hello, World_Again -- ok ")), text("hello-world-again-ok"));
    }

    #[test]
    fn slugify_drops_punctuation_and_keeps_unicode_words() {
        assert_eq!(slugify("!!! ??"), "");
        assert_eq!(slugify("Ação Rápida"), "ação-rápida");
        assert_eq!(slugify("a__b"), slugify("A - B"));
    }

    #[test]
    fn text_transforms_skip_other_values() {
        let registry = TransformRegistry::new();
        let upper = registry.get("uppercase").expect("uppercase");
        assert_eq!(upper.apply(text("abc")), text("ABC"));
        assert_eq!(upper.apply(GeneratedValue::Int(3)), GeneratedValue::Int(3));
    }

    #[test]
    fn closures_register_by_id() {
        let mut registry = TransformRegistry::empty();
        registry.register_fn("double", |value| match value {
            GeneratedValue::Int(n) => GeneratedValue::Int(n * 2),
            other => other,
        });
        let double = registry.get("double").expect("double");
        assert_eq!(double.apply(GeneratedValue::Int(21)), GeneratedValue::Int(42));
        assert!(registry.get("lowercase").is_none());
    }
}
