use schemock_core::Schema;

use crate::model::GenerateOptions;
use crate::provider::ValueProvider;
use crate::value::GeneratedValue;

/// State exposed to an override hook.
pub struct OverrideContext<'a> {
    pub provider: &'a mut dyn ValueProvider,
    pub options: &'a GenerateOptions,
    /// Value path of the node, e.g. `$.users[0].id`.
    pub path: &'a str,
    /// Array indices from the root to the node.
    pub array_path: &'a [usize],
}

/// User function consulted before default dispatch.
///
/// Returning `None` means "no opinion" and generation proceeds normally.
pub trait OverrideHook: Send + Sync {
    fn generate(&self, schema: &Schema, ctx: &mut OverrideContext<'_>) -> Option<GeneratedValue>;
}

impl<F> OverrideHook for F
where
    F: Fn(&Schema, &mut OverrideContext<'_>) -> Option<GeneratedValue> + Send + Sync,
{
    fn generate(&self, schema: &Schema, ctx: &mut OverrideContext<'_>) -> Option<GeneratedValue> {
        self(schema, ctx)
    }
}
