//! Fixed column schemas.

/// Custom trailing column with the formatted extra total of a variant.
pub const CONFIGURATION_PRICE_HEADER: &str = "Configuration Total Price";

/// Catalog (product import template) columns, in output order.
pub const CATALOG_HEADERS: [&str; 74] = [
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Product Category",
    "Type",
    "Tags",
    "Published",
    "Option1 Name",
    "Option1 Value",
    "Option1 Linked To",
    "Option2 Name",
    "Option2 Value",
    "Option2 Linked To",
    "Option3 Name",
    "Option3 Value",
    "Option3 Linked To",
    "Variant SKU",
    "Variant Grams",
    "Variant Inventory Tracker",
    "Variant Inventory Qty",
    "Variant Inventory Policy",
    "Variant Fulfillment Service",
    "Variant Price",
    "Variant Compare At Price",
    "Variant Requires Shipping",
    "Variant Taxable",
    "Unit Price Total Measure",
    "Unit Price Total Measure Unit",
    "Unit Price Base Measure",
    "Unit Price Base Measure Unit",
    "Variant Barcode",
    "Image Src",
    "Image Position",
    "Image Alt Text",
    "Gift Card",
    "SEO Title",
    "SEO Description",
    "Google Shopping / Google Product Category",
    "Google Shopping / Gender",
    "Google Shopping / Age Group",
    "Google Shopping / MPN",
    "Google Shopping / Condition",
    "Google Shopping / Custom Product",
    "Google Shopping / Custom Label 0",
    "Google Shopping / Custom Label 1",
    "Google Shopping / Custom Label 2",
    "Google Shopping / Custom Label 3",
    "Google Shopping / Custom Label 4",
    "Assembly Required (product.metafields.custom.assembly_required)",
    "Frame colours (product.metafields.custom.frame_colour)",
    "Google: Custom Product (product.metafields.mm-google-shopping.custom_product)",
    "Product rating count (product.metafields.reviews.rating_count)",
    "Color (product.metafields.shopify.color-pattern)",
    "Features (product.metafields.shopify.features)",
    "Frame material (product.metafields.shopify.frame-material)",
    "Furniture/Fixture material (product.metafields.shopify.furniture-fixture-material)",
    "Hardware material (product.metafields.shopify.hardware-material)",
    "Load capacity (product.metafields.shopify.load-capacity)",
    "Lock type (product.metafields.shopify.lock-type)",
    "Material (product.metafields.shopify.material)",
    "Power source (product.metafields.shopify.power-source)",
    "Shelf material (product.metafields.shopify.shelf-material)",
    "Top surface material (product.metafields.shopify.top-surface-material)",
    "Complementary products (product.metafields.shopify--discovery--product_recommendation.complementary_products)",
    "Related products (product.metafields.shopify--discovery--product_recommendation.related_products)",
    "Related products settings (product.metafields.shopify--discovery--product_recommendation.related_products_display)",
    "Search product boosts (product.metafields.shopify--discovery--product_search_boost.queries)",
    "Variant Image",
    "Variant Weight Unit",
    "Variant Tax Code",
    "Cost per item",
    "Status",
    CONFIGURATION_PRICE_HEADER,
];

/// Diagnostic one-row-per-preset columns, in output order.
pub const RAW_HEADERS: [&str; 44] = [
    "Preset ID",
    "Preset Title",
    "Preset Slug",
    "Preset Status",
    "Preset Author ID",
    "Preset Author Name",
    "Preset Date",
    "Preset Modified",
    "Preset Permalink",
    "Product ID",
    "Product Title",
    "Product Slug",
    "Product Status",
    "Product Type",
    "Product SKU",
    "Product Price",
    "Product Regular Price",
    "Product Categories",
    "Product Tags",
    "Product Permalink",
    "Product Featured Image",
    "Variant Price",
    "Variant Price (Raw)",
    "Base Price Component",
    "Extra Price Total",
    "Extra Price Raw",
    "Extra Price Overrides Product Price",
    "Variant Requires Shipping",
    "Variant Taxable",
    "Variant Weight Grams",
    "Variant Weight Unit",
    "Variant SKU",
    "Variant Key",
    "Option1 Label",
    "Option1 Value",
    "Option1 Slug",
    "Option2 Label",
    "Option2 Value",
    "Option2 Slug",
    "Other Options JSON",
    "Option Entries JSON",
    "Configuration JSON",
    "Preset Meta JSON",
    "Variant Image",
];

pub fn catalog_headers() -> Vec<String> {
    CATALOG_HEADERS.iter().map(|h| h.to_string()).collect()
}

pub fn raw_headers() -> Vec<String> {
    RAW_HEADERS.iter().map(|h| h.to_string()).collect()
}
