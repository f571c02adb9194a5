//! Grouping presets into products with deduplicated variants.

use std::collections::{HashMap, HashSet};

use preset_export_catalog::{Preset, Product};
use preset_export_core::ProductId;

use crate::context::ExportRun;
use crate::variant::{Variant, build_catalog_variant};

/// A product and its distinct variants, in preset order.
#[derive(Debug, Clone)]
pub struct ProductGroup {
    pub product: Product,
    pub variants: Vec<Variant>,
}

/// Bucket presets by parent product, keeping first-seen order of both the
/// products and the presets within each product. Orphan presets are dropped.
pub fn group_presets_by_product(presets: Vec<Preset>) -> Vec<(ProductId, Vec<Preset>)> {
    let mut groups: Vec<(ProductId, Vec<Preset>)> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for preset in presets {
        let Some(parent) = preset.parent_id else {
            tracing::debug!(preset_id = %preset.id, "preset has no parent product; skipped");
            continue;
        };
        match index.get(&parent) {
            Some(&slot) => groups[slot].1.push(preset),
            None => {
                index.insert(parent, groups.len());
                groups.push((parent, vec![preset]));
            }
        }
    }

    groups
}

/// Resolve the product and build its variants.
///
/// The first preset for a variant key wins; later duplicates are dropped.
/// Returns `None` when the product is unknown or no variant survives.
pub fn build_product_group(
    run: &mut ExportRun,
    product_id: ProductId,
    presets: &[Preset],
) -> Option<ProductGroup> {
    let Some(product) = run.product(product_id) else {
        tracing::warn!(%product_id, presets = presets.len(), "parent product not found; group skipped");
        return None;
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut variants = Vec::new();

    for preset in presets {
        let Some(variant) = build_catalog_variant(run, &product, preset) else {
            continue;
        };
        if !variant.variant_key.is_empty() && !seen.insert(variant.variant_key.to_lowercase()) {
            tracing::debug!(
                preset_id = %preset.id,
                variant_key = %variant.variant_key,
                "duplicate variant; skipped"
            );
            continue;
        }
        variants.push(variant);
    }

    if variants.is_empty() {
        tracing::debug!(%product_id, "no variants for product; group skipped");
        return None;
    }

    Some(ProductGroup { product, variants })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use preset_export_catalog::{InMemoryCatalog, PayloadConfigurationResolver};

    use crate::classify::VariantLayerOverrides;
    use crate::context::ExportContext;
    use crate::fixtures::{payload, preset, product, size_colour};

    fn run(catalog: InMemoryCatalog) -> ExportRun {
        ExportRun::new(
            ExportContext::new(Arc::new(catalog), Arc::new(PayloadConfigurationResolver)),
            VariantLayerOverrides::default(),
        )
    }

    fn pid(id: u64) -> ProductId {
        ProductId::new(id).unwrap()
    }

    #[test]
    fn groups_in_first_seen_order() {
        let presets = vec![
            preset(1, Some(200), ""),
            preset(2, Some(100), ""),
            preset(3, None, ""),
            preset(4, Some(200), ""),
        ];
        let groups = group_presets_by_product(presets);

        let shape: Vec<(u64, Vec<u64>)> = groups
            .iter()
            .map(|(id, presets)| (id.get(), presets.iter().map(|p| p.id.get()).collect()))
            .collect();
        assert_eq!(shape, vec![(200, vec![1, 4]), (100, vec![2])]);
    }

    #[test]
    fn duplicate_pairs_keep_the_first_preset() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product(100, "Workbench"));
        let mut run = run(catalog);

        let presets = vec![
            preset(5, Some(100), &size_colour("Large", "Red")),
            preset(6, Some(100), &size_colour("LARGE", "red")),
            preset(7, Some(100), &size_colour("Small", "Blue")),
        ];
        let group = build_product_group(&mut run, pid(100), &presets).unwrap();

        let ids: Vec<u64> = group.variants.iter().map(|v| v.preset_id.get()).collect();
        assert_eq!(ids, vec![5, 7]);
    }

    #[test]
    fn unknown_product_drops_the_group() {
        let mut run = run(InMemoryCatalog::new());
        let presets = vec![preset(5, Some(100), &size_colour("Large", "Red"))];

        assert!(build_product_group(&mut run, pid(100), &presets).is_none());
    }

    #[test]
    fn group_without_variants_is_dropped() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product(100, "Workbench"));
        let mut run = run(catalog);
        let presets = vec![preset(5, Some(100), &payload(&[("Worktop", "Oak", None)]))];

        assert!(build_product_group(&mut run, pid(100), &presets).is_none());
    }
}
