//! The export driver: fetch, group, format and write.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, LazyLock};
use std::vec;

use chrono::{DateTime, Utc};
use regex::Regex;

use preset_export_catalog::{ConfigurationResolver, Preset, PresetSource, ProductCatalog};
use preset_export_core::ProductId;

use crate::context::{ExportContext, ExportRun};
use crate::csv_writer::CsvSink;
use crate::error::{ExportError, ExportResult};
use crate::format::{catalog_headers, format_product_rows, format_raw_row, raw_headers};
use crate::group::{build_product_group, group_presets_by_product};
use crate::hooks::ExportHooks;
use crate::request::{ExportFormat, ExportRequest, ExportScope};
use crate::row::Row;
use crate::settings::ExportSettings;
use crate::variant::build_preset_details;

pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const CATALOG_FILENAME_PREFIX: &str = "preset-export";
pub const RAW_FILENAME_PREFIX: &str = "preset-raw-export";

static UNSAFE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-_]+").expect("valid regex"));

/// `<prefix>-<YYYYMMDD-HHMMSS>.csv`, the prefix reduced to `[a-z0-9_-]`.
pub fn export_filename(prefix: &str, now: DateTime<Utc>) -> String {
    let prefix = UNSAFE_FILENAME
        .replace_all(&prefix.to_lowercase(), "-")
        .into_owned();
    let prefix = if prefix.is_empty() { CATALOG_FILENAME_PREFIX } else { prefix.as_str() };
    format!("{prefix}-{}.csv", now.format("%Y%m%d-%H%M%S"))
}

/// Runs exports against a preset source and the shared context.
#[derive(Clone)]
pub struct Exporter {
    presets: Arc<dyn PresetSource>,
    ctx: ExportContext,
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter").field("ctx", &self.ctx).finish_non_exhaustive()
    }
}

impl Exporter {
    pub fn new(
        presets: Arc<dyn PresetSource>,
        products: Arc<dyn ProductCatalog>,
        configurations: Arc<dyn ConfigurationResolver>,
    ) -> Self {
        Self {
            presets,
            ctx: ExportContext::new(products, configurations),
        }
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.ctx.settings = settings;
        self
    }

    pub fn with_hooks(mut self, hooks: ExportHooks) -> Self {
        self.ctx.hooks = Arc::new(hooks);
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.ctx.settings
    }

    /// Select and format the presets of `request`.
    ///
    /// Fails with [`ExportError::Empty`] before anything is written when no
    /// row survives. In streaming mode only the first non-empty batch is
    /// produced here; the rest is pulled while writing.
    pub fn prepare(&self, request: &ExportRequest) -> ExportResult<PreparedExport> {
        let hooks = self.ctx.hooks.clone();
        let query = hooks.query(request.to_query(), request);
        let presets = self.presets.fetch(&query);
        if presets.is_empty() {
            tracing::info!(scope = request.scope.as_str(), "no presets matched export query");
            return Err(ExportError::Empty);
        }
        let fetched = presets.len();

        let mut run = ExportRun::new(self.ctx.clone(), request.overrides.clone());
        let (headers, prefix) = match request.format {
            ExportFormat::Catalog => (catalog_headers(), CATALOG_FILENAME_PREFIX),
            ExportFormat::Raw => (raw_headers(), RAW_FILENAME_PREFIX),
        };
        let headers = hooks.headers(headers);

        let body = match (request.format, request.scope.is_streaming()) {
            (ExportFormat::Catalog, false) => {
                let groups = group_presets_by_product(presets);
                if groups.is_empty() {
                    return Err(ExportError::Empty);
                }
                let rows: Vec<Row> = CatalogBatches::new(run, groups, false).flatten().collect();
                Body::Buffered(hooks.catalog_rows(rows))
            }
            (ExportFormat::Raw, false) => {
                let rows: Vec<Row> = presets
                    .iter()
                    .map(|preset| {
                        let details = build_preset_details(&mut run, preset);
                        format_raw_row(preset, &details, run.settings())
                    })
                    .collect();
                Body::Buffered(hooks.raw_rows(rows, &presets))
            }
            (ExportFormat::Catalog, true) => {
                let groups = group_presets_by_product(presets);
                if groups.is_empty() {
                    return Err(ExportError::Empty);
                }
                Body::streaming(Box::new(CatalogBatches::new(run, groups, true)))
            }
            (ExportFormat::Raw, true) => Body::streaming(Box::new(RawBatches {
                run,
                presets: presets.into_iter(),
            })),
        };

        let body = match body {
            Body::Buffered(rows) if rows.is_empty() => None,
            Body::Buffered(rows) => Some(Body::Buffered(rows)),
            Body::Streaming { first, .. } if first.is_empty() => None,
            streaming => Some(streaming),
        };
        let Some(body) = body else {
            tracing::info!(
                scope = request.scope.as_str(),
                format = request.format.as_str(),
                presets = fetched,
                "export produced no rows"
            );
            return Err(ExportError::Empty);
        };

        tracing::info!(
            scope = request.scope.as_str(),
            format = request.format.as_str(),
            presets = fetched,
            streaming = request.scope.is_streaming(),
            "export prepared"
        );

        Ok(PreparedExport {
            scope: request.scope,
            format: request.format,
            headers,
            prefix,
            body,
        })
    }
}

type Batches = Box<dyn Iterator<Item = Vec<Row>> + Send>;

enum Body {
    Buffered(Vec<Row>),
    Streaming { first: Vec<Row>, rest: Batches },
}

impl Body {
    /// Pull batches until one carries rows.
    fn streaming(mut batches: Batches) -> Self {
        let first = batches.by_ref().find(|batch| !batch.is_empty()).unwrap_or_default();
        Self::Streaming { first, rest: batches }
    }
}

/// Catalog rows, one batch per product group.
///
/// When `per_row_hook` is set the rows hook sees each row on its own, which
/// is how streamed exports apply it.
struct CatalogBatches {
    run: ExportRun,
    groups: vec::IntoIter<(ProductId, Vec<Preset>)>,
    per_row_hook: bool,
}

impl CatalogBatches {
    fn new(run: ExportRun, groups: Vec<(ProductId, Vec<Preset>)>, per_row_hook: bool) -> Self {
        Self {
            run,
            groups: groups.into_iter(),
            per_row_hook,
        }
    }
}

impl Iterator for CatalogBatches {
    type Item = Vec<Row>;

    fn next(&mut self) -> Option<Vec<Row>> {
        loop {
            let (product_id, presets) = self.groups.next()?;
            let Some(group) = build_product_group(&mut self.run, product_id, &presets) else {
                continue;
            };
            let hooks = self.run.hooks();
            let rows = format_product_rows(&group, self.run.settings(), hooks);
            if !self.per_row_hook {
                return Some(rows);
            }
            let rows: Vec<Row> = rows
                .into_iter()
                .flat_map(|row| hooks.catalog_rows(vec![row]))
                .collect();
            if !rows.is_empty() {
                return Some(rows);
            }
        }
    }
}

/// Raw rows, one single-row batch per preset, rows hook applied per batch.
struct RawBatches {
    run: ExportRun,
    presets: vec::IntoIter<Preset>,
}

impl Iterator for RawBatches {
    type Item = Vec<Row>;

    fn next(&mut self) -> Option<Vec<Row>> {
        let preset = self.presets.next()?;
        let details = build_preset_details(&mut self.run, &preset);
        let row = format_raw_row(&preset, &details, self.run.settings());
        Some(self.run.hooks().raw_rows(vec![row], std::slice::from_ref(&preset)))
    }
}

/// An export that is known to produce rows, ready to be written.
pub struct PreparedExport {
    scope: ExportScope,
    format: ExportFormat,
    headers: Vec<String>,
    prefix: &'static str,
    body: Body,
}

impl fmt::Debug for PreparedExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedExport")
            .field("scope", &self.scope)
            .field("format", &self.format)
            .field("headers", &self.headers.len())
            .field("streaming", &self.is_streaming())
            .finish()
    }
}

impl PreparedExport {
    pub fn scope(&self) -> ExportScope {
        self.scope
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn filename(&self, now: DateTime<Utc>) -> String {
        export_filename(self.prefix, now)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming { .. })
    }

    /// Write the CSV document and return the number of data rows.
    ///
    /// Streamed exports flush after every batch.
    pub fn write_to<W: Write>(self, out: W) -> ExportResult<usize> {
        let mut sink = CsvSink::start(out, self.headers)?;
        match self.body {
            Body::Buffered(rows) => sink.write_batch(&rows)?,
            Body::Streaming { first, rest } => {
                sink.write_batch(&first)?;
                for batch in rest {
                    sink.write_batch(&batch)?;
                }
            }
        }
        let (mut out, rows) = sink.finish()?;
        out.flush()?;
        tracing::info!(
            scope = self.scope.as_str(),
            format = self.format.as_str(),
            rows,
            "export written"
        );
        Ok(rows)
    }

    /// Buffer the whole document in memory.
    pub fn to_bytes(self) -> ExportResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use preset_export_catalog::InMemoryCatalog;

    use crate::csv_writer::BOM;
    use crate::fixtures::{dec, payload, preset, product, size_colour};
    use crate::request::ExportForm;

    fn exporter(catalog: InMemoryCatalog) -> Exporter {
        let catalog = Arc::new(catalog);
        Exporter::new(catalog.clone(), catalog.clone(), catalog)
    }

    fn bench_catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        let mut bench = product(100, "Workbench Pro");
        bench.price = Some(dec("100"));
        catalog.insert_product(bench);
        catalog.insert_preset(preset(5, Some(100), &size_colour("Large", "Red")));
        catalog.insert_preset(preset(7, Some(100), &size_colour("Small", "Blue")));
        catalog
    }

    fn request(form: ExportForm) -> ExportRequest {
        ExportRequest::from_form(&form)
    }

    fn read(bytes: &[u8]) -> (Vec<String>, Vec<csv::StringRecord>) {
        assert!(bytes.starts_with(BOM));
        let mut reader = csv::Reader::from_reader(&bytes[BOM.len()..]);
        let headers = reader.headers().unwrap().iter().map(str::to_string).collect();
        let records = reader.records().map(Result::unwrap).collect();
        (headers, records)
    }

    fn cell<'a>(headers: &[String], record: &'a csv::StringRecord, name: &str) -> &'a str {
        let idx = headers.iter().position(|h| h == name).unwrap();
        record.get(idx).unwrap()
    }

    #[test]
    fn selection_exports_one_product_with_two_variants() {
        let exporter = exporter(bench_catalog());
        let prepared = exporter
            .prepare(&request(ExportForm {
                scope: Some("selection".into()),
                preset_ids: Some("5,7".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        assert!(!prepared.is_streaming());

        let (headers, records) = read(&prepared.to_bytes().unwrap());
        assert_eq!(headers.len(), 74);
        assert_eq!(records.len(), 2);

        let (first, second) = (&records[0], &records[1]);
        assert_eq!(cell(&headers, first, "Handle"), "workbench-pro");
        assert_eq!(cell(&headers, second, "Handle"), "workbench-pro");
        assert_eq!(cell(&headers, first, "Title"), "Workbench Pro");
        assert_eq!(cell(&headers, second, "Title"), "");
        assert_eq!(cell(&headers, second, "Vendor"), "");
        assert_eq!(cell(&headers, first, "Option1 Value"), "Large");
        assert_eq!(cell(&headers, second, "Option1 Value"), "Small");
        assert_eq!(cell(&headers, first, "Option2 Value"), "red");
        assert_eq!(cell(&headers, second, "Option2 Value"), "blue");
        assert_eq!(cell(&headers, first, "Variant Price"), "100.00");
    }

    #[test]
    fn selection_order_is_preserved() {
        let exporter = exporter(bench_catalog());
        let prepared = exporter
            .prepare(&request(ExportForm {
                preset_ids: Some("7 5".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        let (headers, records) = read(&prepared.to_bytes().unwrap());
        assert_eq!(cell(&headers, &records[0], "Option1 Value"), "Small");
    }

    #[test]
    fn duplicate_variants_keep_the_first_preset() {
        let catalog = bench_catalog();
        catalog.insert_preset(preset(8, Some(100), &size_colour("large", "RED")));
        let exporter = exporter(catalog);

        let prepared = exporter
            .prepare(&request(ExportForm {
                preset_ids: Some("5,8,7".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        let (headers, records) = read(&prepared.to_bytes().unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(cell(&headers, &records[0], "Variant SKU"), "preset-100-5");
    }

    #[test]
    fn nothing_matching_is_empty() {
        let exporter = exporter(bench_catalog());
        let err = exporter
            .prepare(&request(ExportForm {
                preset_ids: Some("99".into()),
                ..ExportForm::default()
            }))
            .unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let exporter = exporter(bench_catalog());
        for per_page in ["20", "9223372036854775807"] {
            let err = exporter
                .prepare(&request(ExportForm {
                    paged: Some("9223372036854775807".into()),
                    per_page: Some(per_page.into()),
                    ..ExportForm::default()
                }))
                .unwrap_err();
            assert!(matches!(err, ExportError::Empty));
        }
    }

    #[test]
    fn oversized_catalog_numbers_do_not_abort_the_export() {
        let catalog = bench_catalog();
        let mut heavy = product(200, "Heavy Bench");
        heavy.weight = Some(rust_decimal::Decimal::MAX);
        heavy.price = Some(dec("10"));
        catalog.insert_product(heavy);
        catalog.insert_preset(preset(9, Some(200), &size_colour("Large", "Red")));
        let mut dear = product(300, "Dear Bench");
        dear.price = Some(rust_decimal::Decimal::MAX);
        catalog.insert_product(dear);
        catalog.insert_preset(preset(11, Some(300), &payload(&[("Size", "L", Some("1")), ("Colour", "Red", None)])));
        let exporter = exporter(catalog);

        let prepared = exporter
            .prepare(&request(ExportForm {
                preset_ids: Some("9,11,5".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        let (headers, records) = read(&prepared.to_bytes().unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(cell(&headers, &records[0], "Handle"), "heavy-bench");
        assert_eq!(cell(&headers, &records[0], "Variant Grams"), "");
        assert_eq!(cell(&headers, &records[1], "Handle"), "workbench-pro");
    }

    #[test]
    fn presets_without_variants_are_empty() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product(100, "Workbench"));
        catalog.insert_preset(preset(1, Some(100), &payload(&[("Worktop", "Oak", None)])));
        catalog.insert_preset(preset(2, None, &size_colour("Large", "Red")));
        let exporter = exporter(catalog);

        for export_all in ["0", "1"] {
            let err = exporter
                .prepare(&request(ExportForm {
                    export_all: Some(export_all.into()),
                    ..ExportForm::default()
                }))
                .unwrap_err();
            assert!(matches!(err, ExportError::Empty));
        }
    }

    #[test]
    fn export_all_streams_every_group() {
        let catalog = bench_catalog();
        let mut cart = product(200, "Tool Trolley");
        cart.price = Some(dec("50"));
        catalog.insert_product(cart);
        catalog.insert_preset(preset(9, Some(200), &size_colour("Mini", "Black")));
        catalog.insert_preset(preset(10, Some(404), &size_colour("Mini", "Black")));
        let exporter = exporter(catalog);

        let prepared = exporter
            .prepare(&request(ExportForm {
                export_all: Some("1".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        assert!(prepared.is_streaming());
        let (headers, records) = read(&prepared.to_bytes().unwrap());
        let handles: Vec<&str> = records.iter().map(|r| cell(&headers, r, "Handle")).collect();
        assert_eq!(handles, vec!["workbench-pro", "workbench-pro", "tool-trolley"]);
    }

    #[test]
    fn streaming_applies_rows_hook_per_row() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let hooks = ExportHooks::new().on_catalog_rows(move |rows| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            assert_eq!(rows.len(), 1);
            rows.into_iter()
                .filter(|row| row.get("Option1 Value") != "Large")
                .collect()
        });
        let exporter = exporter(bench_catalog()).with_hooks(hooks);

        let prepared = exporter
            .prepare(&request(ExportForm {
                scope: Some("all".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        let rows = prepared.write_to(Vec::new()).unwrap();
        assert_eq!(rows, 1);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn rows_hook_filtering_everything_is_empty() {
        let hooks = ExportHooks::new().on_catalog_rows(|_| Vec::new());
        let exporter = exporter(bench_catalog()).with_hooks(hooks);
        let err = exporter
            .prepare(&request(ExportForm {
                preset_ids: Some("5".into()),
                ..ExportForm::default()
            }))
            .unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn query_and_headers_hooks_apply() {
        let hooks = ExportHooks::new()
            .on_query(|mut query, _| {
                query.ids = Some(vec![preset_export_core::PresetId::new(7).unwrap()]);
                query
            })
            .on_headers(|mut headers| {
                headers.truncate(2);
                headers
            });
        let exporter = exporter(bench_catalog()).with_hooks(hooks);
        let prepared = exporter.prepare(&request(ExportForm::default())).unwrap();
        assert_eq!(prepared.headers(), ["Handle", "Title"]);

        let (_, records) = read(&prepared.to_bytes().unwrap());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn raw_export_has_one_row_per_preset() {
        let catalog = bench_catalog();
        catalog.insert_preset(preset(8, Some(100), &size_colour("Large", "Red")));
        catalog.insert_preset(preset(11, None, "garbage"));
        let exporter = exporter(catalog);

        let prepared = exporter
            .prepare(&request(ExportForm {
                export_format: Some("raw".into()),
                ..ExportForm::default()
            }))
            .unwrap();
        let filename = prepared.filename(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap());
        assert_eq!(filename, "preset-raw-export-20240305-140709.csv");

        let (headers, records) = read(&prepared.to_bytes().unwrap());
        assert_eq!(headers.len(), 44);
        let ids: Vec<&str> = records.iter().map(|r| cell(&headers, r, "Preset ID")).collect();
        assert_eq!(ids, vec!["5", "7", "8", "11"]);
    }

    #[test]
    fn filename_prefix_is_sanitised() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(export_filename("My Export!", now), "my-export--20240102-030405.csv");
        assert_eq!(export_filename("", now), "preset-export-20240102-030405.csv");
    }
}
