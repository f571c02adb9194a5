//! Variant pricing.
//!
//! Two extra-price signals exist: the simple sum of every chosen choice's
//! extra price, and the hook-aware total (price × quantity per choice). The
//! total wins when positive; the simple sum is the fallback.
//!
//! Amounts come from catalog data, so every sum and product is checked: a
//! preset whose price overflows has no price at all.

use rust_decimal::Decimal;
use serde::Serialize;

use preset_export_catalog::{ConfigurationModel, LayerChoice, Preset, Product};

use crate::hooks::ExportHooks;

/// What pricing hooks can see about the preset being priced.
#[derive(Debug, Clone, Copy)]
pub struct PriceContext<'a> {
    pub product: &'a Product,
    pub preset: &'a Preset,
    pub layers: &'a [LayerChoice],
}

/// Every price signal computed for one preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriceBreakdown {
    /// Product selling price (zero without a product).
    pub base_price: Decimal,
    /// Portion of `price` coming from the product itself.
    pub base_component: Decimal,
    /// Sum of raw extra prices, quantities ignored.
    pub extra_price: Decimal,
    /// Hook-aware Σ price × quantity.
    pub extra_total: Decimal,
    /// `extra_total` when positive, else `extra_price`.
    pub effective_extra: Decimal,
    /// Final variant price.
    pub price: Decimal,
}

/// Sum of the raw extra price of each chosen choice; `None` on overflow.
pub fn simple_extra_price(config: Option<&ConfigurationModel>) -> Option<Decimal> {
    let Some(model) = config else {
        return Some(Decimal::ZERO);
    };
    model
        .layers
        .iter()
        .filter_map(|choice| choice.extra_price)
        .try_fold(Decimal::ZERO, |sum, price| sum.checked_add(price))
}

/// Hook-aware extra total of a preset's chosen choices; `None` on overflow.
pub fn configuration_extra_total(
    product: &Product,
    preset: &Preset,
    config: Option<&ConfigurationModel>,
    hooks: &ExportHooks,
) -> Option<Decimal> {
    let Some(model) = config.filter(|model| !model.layers.is_empty()) else {
        return Some(Decimal::ZERO);
    };

    let ctx = PriceContext {
        product,
        preset,
        layers: &model.layers,
    };

    let mut total = Decimal::ZERO;
    for choice in &model.layers {
        if !hooks.include_choice(choice, &ctx) {
            continue;
        }

        let price = hooks.choice_price(choice.extra_price.unwrap_or(Decimal::ZERO), choice, product);
        let quantity = hooks.choice_quantity(Decimal::ONE, choice, &ctx);
        let line = hooks.extra_item_total(price.checked_mul(quantity)?, choice, &ctx);
        total = total.checked_add(line)?;
    }

    Some(hooks.extra_total(total, &ctx))
}

/// Price a preset under the store's override policy.
///
/// With `extra_overrides_product_price` the variant costs its extras only and
/// the base component is zero. The `variant_price` hooks get the last word.
///
/// Returns `None` when a line or a total overflows; the preset is then left
/// unpriced rather than aborting the export.
pub fn calculate(
    product: Option<&Product>,
    preset: &Preset,
    config: Option<&ConfigurationModel>,
    extra_overrides_product_price: bool,
    hooks: &ExportHooks,
) -> Option<PriceBreakdown> {
    let breakdown = checked_breakdown(product, preset, config, extra_overrides_product_price, hooks);
    if breakdown.is_none() {
        tracing::warn!(preset_id = %preset.id, "preset price overflows; left unpriced");
    }
    breakdown
}

fn checked_breakdown(
    product: Option<&Product>,
    preset: &Preset,
    config: Option<&ConfigurationModel>,
    extra_overrides_product_price: bool,
    hooks: &ExportHooks,
) -> Option<PriceBreakdown> {
    let base_price = product.map(Product::price_or_zero).unwrap_or(Decimal::ZERO);
    let extra_price = simple_extra_price(config)?;
    let extra_total = match product {
        Some(product) => configuration_extra_total(product, preset, config, hooks)?,
        None => Decimal::ZERO,
    };

    let effective_extra = if extra_total > Decimal::ZERO {
        extra_total
    } else {
        extra_price
    };

    let (price, base_component) = if extra_overrides_product_price {
        (effective_extra, Decimal::ZERO)
    } else {
        (base_price.checked_add(effective_extra)?, base_price)
    };

    Some(PriceBreakdown {
        base_price,
        base_component,
        extra_price,
        extra_total,
        effective_extra,
        price: hooks.variant_price(price, product, preset, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dec, preset, product};

    fn priced(price: &str) -> Product {
        let mut product = product(100, "Workbench");
        product.price = Some(dec(price));
        product
    }

    fn choice(id: &str, extra: Option<&str>) -> LayerChoice {
        LayerChoice {
            layer_id: None,
            choice_id: id.into(),
            layer_name: format!("Layer {id}"),
            choice_name: format!("Choice {id}"),
            extra_price: extra.map(dec),
            fields: Default::default(),
        }
    }

    fn model(choices: Vec<LayerChoice>) -> ConfigurationModel {
        ConfigurationModel {
            layers: choices,
            image_url: None,
        }
    }

    #[test]
    fn base_plus_extra_without_override() {
        let config = model(vec![choice("1", Some("25.50")), choice("2", None), choice("3", Some("4.50"))]);
        let breakdown = calculate(Some(&priced("100")), &preset(5, Some(100), ""), Some(&config), false, &ExportHooks::default()).unwrap();

        assert_eq!(breakdown.extra_total, dec("30.00"));
        assert_eq!(breakdown.price, dec("130.00"));
        assert_eq!(breakdown.base_component, dec("100"));
    }

    #[test]
    fn override_prices_extras_only() {
        let config = model(vec![choice("1", Some("25.50")), choice("2", Some("4.50"))]);
        let breakdown = calculate(Some(&priced("100")), &preset(5, Some(100), ""), Some(&config), true, &ExportHooks::default()).unwrap();

        assert_eq!(breakdown.price, breakdown.extra_total);
        assert_eq!(breakdown.base_component, Decimal::ZERO);
    }

    #[test]
    fn quantity_and_exclusion_hooks_shape_the_total() {
        let hooks = ExportHooks::new()
            .on_include_choice(|choice, _| choice.choice_id != "2")
            .on_choice_quantity(|qty, choice, _| if choice.choice_id == "1" { qty * Decimal::from(3) } else { qty });
        let config = model(vec![choice("1", Some("10")), choice("2", Some("99")), choice("3", Some("1"))]);

        let breakdown = calculate(Some(&priced("0")), &preset(5, Some(100), ""), Some(&config), false, &hooks).unwrap();
        assert_eq!(breakdown.extra_total, dec("31"));
        // The simple signal ignores quantity and exclusion.
        assert_eq!(breakdown.extra_price, dec("110"));
        assert_eq!(breakdown.price, dec("31"));
    }

    #[test]
    fn falls_back_to_simple_extra_when_total_is_not_positive() {
        let hooks = ExportHooks::new().on_extra_total(|_, _| Decimal::ZERO);
        let config = model(vec![choice("1", Some("12"))]);

        let breakdown = calculate(Some(&priced("50")), &preset(5, Some(100), ""), Some(&config), false, &hooks).unwrap();
        assert_eq!(breakdown.extra_total, Decimal::ZERO);
        assert_eq!(breakdown.effective_extra, dec("12"));
        assert_eq!(breakdown.price, dec("62"));
    }

    #[test]
    fn without_product_extra_total_is_zero() {
        let config = model(vec![choice("1", Some("12"))]);
        let breakdown = calculate(None, &preset(5, Some(100), ""), Some(&config), false, &ExportHooks::default()).unwrap();

        assert_eq!(breakdown.extra_total, Decimal::ZERO);
        assert_eq!(breakdown.price, dec("12"));
        assert_eq!(breakdown.base_price, Decimal::ZERO);
    }

    #[test]
    fn variant_price_hook_has_last_word() {
        let hooks = ExportHooks::new().on_variant_price(|price, _, _, _| price * Decimal::from(2));
        let breakdown = calculate(Some(&priced("10")), &preset(5, Some(100), ""), None, false, &hooks).unwrap();

        assert_eq!(breakdown.price, dec("20"));
    }

    #[test]
    fn overflowing_prices_leave_the_preset_unpriced() {
        let config = model(vec![choice("1", Some("1"))]);
        let preset = preset(5, Some(100), "");
        let hooks = ExportHooks::default();

        let mut product = priced("100");
        product.price = Some(Decimal::MAX);
        assert_eq!(calculate(Some(&product), &preset, Some(&config), false, &hooks), None);
        // Extras alone still fit when they replace the product price.
        assert_eq!(calculate(Some(&product), &preset, Some(&config), true, &hooks).unwrap().price, dec("1"));

        let mut huge = model(vec![choice("1", None), choice("2", None)]);
        huge.layers[0].extra_price = Some(Decimal::MAX);
        huge.layers[1].extra_price = Some(Decimal::MAX);
        assert_eq!(simple_extra_price(Some(&huge)), None);
        assert_eq!(calculate(Some(&priced("0")), &preset, Some(&huge), false, &hooks), None);

        let tripled = ExportHooks::new().on_choice_quantity(|_, _, _| Decimal::from(3));
        let mut single = model(vec![choice("1", None)]);
        single.layers[0].extra_price = Some(Decimal::MAX);
        assert_eq!(calculate(Some(&priced("0")), &preset, Some(&single), false, &tripled), None);
    }
}
