use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use schemock_core::{Definitions, Schema, SchemaRegistry};

use crate::consistency::ConsistencyStore;
use crate::context::{Cursor, GenerationContext};
use crate::errors::GenerationError;
use crate::generators::generate_value;
use crate::hook::{OverrideContext, OverrideHook};
use crate::model::{GenerateOptions, GenerationReport};
use crate::provider::{FakerProvider, ValueProvider};
use crate::transforms::{TransformRegistry, ValueTransform};
use crate::value::GeneratedValue;

/// Result of a single-schema generation call.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub value: GeneratedValue,
    pub report: GenerationReport,
}

/// Result of a multi-schema generation call.
#[derive(Debug, Clone)]
pub struct MultiGenerationResult {
    pub values: BTreeMap<String, GeneratedValue>,
    pub report: GenerationReport,
}

/// Entry point for generating mock values from schemas.
///
/// A generator is reusable: each call builds its own context, consistency
/// store, report, and freshly seeded provider.
#[derive(Clone)]
pub struct MockGenerator {
    options: GenerateOptions,
    definitions: Definitions,
    registry: Option<SchemaRegistry>,
    hook: Option<Arc<dyn OverrideHook>>,
    transforms: TransformRegistry,
}

impl MockGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            definitions: Definitions::new(),
            registry: None,
            hook: None,
            transforms: TransformRegistry::new(),
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Definitions that `lazy` nodes resolve against.
    pub fn with_definitions(mut self, definitions: Definitions) -> Self {
        self.definitions = definitions;
        self
    }

    /// Consistency registry to use instead of one derived from metadata.
    /// Ignored unless `consistency_key` is configured.
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_override<F>(self, hook: F) -> Self
    where
        F: Fn(&Schema, &mut OverrideContext<'_>) -> Option<GeneratedValue>
            + Send
            + Sync
            + 'static,
    {
        self.with_override_hook(Arc::new(hook))
    }

    pub fn with_override_hook(mut self, hook: Arc<dyn OverrideHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Registers a closure transform under `id`.
    pub fn with_transform<F>(mut self, id: impl Into<String>, apply: F) -> Self
    where
        F: Fn(GeneratedValue) -> GeneratedValue + Send + Sync + 'static,
    {
        self.transforms.register_fn(id, apply);
        self
    }

    pub fn with_transform_impl(mut self, transform: Arc<dyn ValueTransform>) -> Self {
        self.transforms.register(transform);
        self
    }

    pub fn generate(&self, schema: &Schema) -> Result<GeneratedValue, GenerationError> {
        self.generate_with_report(schema).map(|result| result.value)
    }

    pub fn generate_with_report(&self, schema: &Schema) -> Result<GenerationResult, GenerationError> {
        self.options.validate()?;
        let seed = self.resolve_seed();
        let mut provider = FakerProvider::new(seed, self.options.locale_key()?);
        self.generate_seeded(schema, &mut provider, seed)
    }

    /// Generates with a caller-supplied provider; `options.seed` is only
    /// reported, the provider owns its randomness.
    pub fn generate_with_provider(
        &self,
        schema: &Schema,
        provider: &mut dyn ValueProvider,
    ) -> Result<GenerationResult, GenerationError> {
        self.options.validate()?;
        let seed = self.options.seed.unwrap_or_default();
        self.generate_seeded(schema, provider, seed)
    }

    pub fn multi_generate(
        &self,
        schemas: &BTreeMap<String, Schema>,
    ) -> Result<BTreeMap<String, GeneratedValue>, GenerationError> {
        self.multi_generate_with_report(schemas)
            .map(|result| result.values)
    }

    /// Generates every entry in key order against one shared consistency
    /// store, so named nodes agree across entries.
    pub fn multi_generate_with_report(
        &self,
        schemas: &BTreeMap<String, Schema>,
    ) -> Result<MultiGenerationResult, GenerationError> {
        self.options.validate()?;
        let seed = self.resolve_seed();
        let mut provider = FakerProvider::new(seed, self.options.locale_key()?);
        let roots: Vec<(Cursor, &Schema)> = schemas
            .iter()
            .map(|(name, schema)| (Cursor::named_root(name), schema))
            .collect();
        let (values, report) = self.run(&roots, &mut provider, seed)?;
        Ok(MultiGenerationResult {
            values: schemas.keys().cloned().zip(values).collect(),
            report,
        })
    }

    fn resolve_seed(&self) -> u64 {
        self.options.seed.unwrap_or_else(rand::random)
    }

    fn generate_seeded(
        &self,
        schema: &Schema,
        provider: &mut dyn ValueProvider,
        seed: u64,
    ) -> Result<GenerationResult, GenerationError> {
        let (mut values, report) = self.run(&[(Cursor::root(), schema)], provider, seed)?;
        Ok(GenerationResult {
            value: values.pop().unwrap_or(GeneratedValue::Undefined),
            report,
        })
    }

    fn run(
        &self,
        roots: &[(Cursor, &Schema)],
        provider: &mut dyn ValueProvider,
        seed: u64,
    ) -> Result<(Vec<GeneratedValue>, GenerationReport), GenerationError> {
        let start = Instant::now();
        let registry = self.consistency_registry(roots);
        let mut store = ConsistencyStore::new();
        let mut report = GenerationReport::new(seed);

        info!(
            seed,
            roots = roots.len(),
            consistency = registry.is_some(),
            strict = self.options.strict,
            "generation started"
        );

        let outcome = {
            let mut ctx = GenerationContext {
                options: &self.options,
                provider,
                hook: self.hook.as_deref(),
                registry: registry.as_deref(),
                definitions: &self.definitions,
                transforms: &self.transforms,
                store: &mut store,
                report: &mut report,
            };
            roots
                .iter()
                .map(|(cursor, schema)| generate_value(&mut ctx, schema, cursor))
                .collect::<Result<Vec<_>, _>>()
        };

        match outcome {
            Ok(values) => {
                info!(
                    seed,
                    roots = values.len(),
                    fallbacks = report.fallback_count,
                    replays = report.replay_count,
                    lazy_terminations = report.lazy_terminations,
                    warnings = report.warnings.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "generation completed"
                );
                Ok((values, report))
            }
            Err(err) => {
                warn!(seed, error = %err, "generation failed");
                Err(err)
            }
        }
    }

    /// Registry consulted for consistency names, or `None` when consistency
    /// is disabled.
    fn consistency_registry(&self, roots: &[(Cursor, &Schema)]) -> Option<Cow<'_, SchemaRegistry>> {
        let key = self.options.consistency_key.as_deref()?;
        if let Some(registry) = &self.registry {
            return Some(Cow::Borrowed(registry));
        }
        let mut registry = SchemaRegistry::new();
        for (_, schema) in roots {
            registry.register(schema, key);
        }
        registry.register_definitions(&self.definitions, key);
        Some(Cow::Owned(registry))
    }
}

impl fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockGenerator")
            .field("options", &self.options)
            .field("definitions", &self.definitions)
            .field("registry", &self.registry)
            .field("hook", &self.hook.is_some())
            .field("transforms", &self.transforms)
            .finish()
    }
}

/// Generates one value for `schema` with default collaborators.
pub fn generate(schema: &Schema, options: &GenerateOptions) -> Result<GeneratedValue, GenerationError> {
    MockGenerator::new(options.clone()).generate(schema)
}

/// Generates one value per entry, sharing consistency state across entries.
pub fn multi_generate(
    schemas: &BTreeMap<String, Schema>,
    options: &GenerateOptions,
) -> Result<BTreeMap<String, GeneratedValue>, GenerationError> {
    MockGenerator::new(options.clone()).multi_generate(schemas)
}
