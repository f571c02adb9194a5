//! CSV export endpoints.

use std::io::{self, Write};
use std::sync::Arc;

use axum::{
    Form,
    body::{Body, Bytes},
    extract::{Extension, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use preset_export_pipeline::{CONTENT_TYPE, ExportError, ExportForm, ExportFormat, ExportRequest, PreparedExport};

use crate::app::errors;
use crate::app::services::ExportServices;
use crate::context::PrincipalContext;

/// Encoded chunks buffered between the export task and the response body.
const STREAM_CHANNEL_CAPACITY: usize = 16;

const EXPIRES_IN_THE_PAST: &str = "Wed, 11 Jan 1984 05:00:00 GMT";

pub async fn export_presets(
    Extension(services): Extension<Arc<ExportServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Form(form): Form<ExportForm>,
) -> Response {
    run_export(services, principal, ExportRequest::from_form(&form)).await
}

pub async fn export_presets_query(
    Extension(services): Extension<Arc<ExportServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(form): Query<ExportForm>,
) -> Response {
    run_export(services, principal, ExportRequest::from_form(&form)).await
}

pub async fn export_raw(
    Extension(services): Extension<Arc<ExportServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Form(form): Form<ExportForm>,
) -> Response {
    let request = ExportRequest::from_form(&form).with_format(ExportFormat::Raw);
    run_export(services, principal, request).await
}

pub async fn export_raw_query(
    Extension(services): Extension<Arc<ExportServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(form): Query<ExportForm>,
) -> Response {
    let request = ExportRequest::from_form(&form).with_format(ExportFormat::Raw);
    run_export(services, principal, request).await
}

async fn run_export(
    services: Arc<ExportServices>,
    principal: PrincipalContext,
    request: ExportRequest,
) -> Response {
    if let Err(e) = crate::authz::authorize_export(&principal) {
        tracing::info!(principal_id = %principal.principal_id(), error = %e, "export denied");
        return errors::export_error_to_response(ExportError::Unauthorized);
    }

    let exporter = match services.exporter() {
        Ok(exporter) => exporter.clone(),
        Err(e) => return errors::export_error_to_response(e),
    };

    let prepared = match tokio::task::spawn_blocking(move || exporter.prepare(&request)).await {
        Ok(Ok(prepared)) => prepared,
        Ok(Err(e)) => return errors::export_error_to_response(e),
        Err(e) => return task_failed(e),
    };

    let filename = prepared.filename(Utc::now());
    let body = if prepared.is_streaming() {
        stream_body(prepared)
    } else {
        match tokio::task::spawn_blocking(move || prepared.to_bytes()).await {
            Ok(Ok(bytes)) => Body::from(bytes),
            Ok(Err(e)) => return errors::export_error_to_response(e),
            Err(e) => return task_failed(e),
        }
    };

    csv_response(&filename, body)
}

fn task_failed(err: tokio::task::JoinError) -> Response {
    tracing::error!(error = %err, "export task failed");
    errors::json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "export_failed",
        "export task failed",
    )
}

fn csv_response(filename: &str, body: Body) -> Response {
    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
            (
                header::CACHE_CONTROL,
                "no-cache, must-revalidate, max-age=0".to_string(),
            ),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, EXPIRES_IN_THE_PAST.to_string()),
        ],
        body,
    )
        .into_response()
}

/// Write the export on a blocking task and forward chunks to the body.
///
/// A client disconnect closes the channel, which surfaces as a write error
/// and stops the export.
fn stream_body(prepared: PreparedExport) -> Body {
    let (tx, rx) = mpsc::channel::<Result<Bytes, io::Error>>(STREAM_CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let mut writer = ChannelWriter { tx: tx.clone() };
        if let Err(e) = prepared.write_to(&mut writer) {
            tracing::warn!(error = %e, "streamed export aborted");
            let _ = tx.blocking_send(Err(io::Error::other(e.to_string())));
        }
    });

    Body::from_stream(ReceiverStream::new(rx))
}

/// `io::Write` adapter that sends every write as a body chunk.
struct ChannelWriter {
    tx: mpsc::Sender<Result<Bytes, io::Error>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client disconnected"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
