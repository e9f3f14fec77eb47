use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use sqlx::SqlitePool;

use contract_engine::{assemble, contract_number, LogoAsset, RenderOptions};
use contract_export::{export_doc, export_pdf, ExportError, PdfMetadata, RenderSurface};
use lease_types::ClauseRecord;

use crate::error::ApiError;
use crate::models::{ClauseRow, HealthResponse, LandlordRow, LeaseRow, TenantRow};
use crate::state::AppState;

/// Export variants offered by the download endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Doc,
}

pub(crate) fn parse_format(raw: &str) -> Result<ExportFormat, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "pdf" => Ok(ExportFormat::Pdf),
        "doc" => Ok(ExportFormat::Doc),
        other => Err(ApiError::InvalidRequest(format!(
            "Format d'export inconnu: {other}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "pdf".to_string()
}

/// A fully assembled contract plus the fields the response headers need.
struct AssembledContract {
    html: String,
    tenant_name: String,
    number: String,
}

/// GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "gestloc-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/contracts/:lease_id/preview
///
/// Returns the assembled contract as HTML, exactly what the exporters
/// consume, so the operator can proof a contract without producing a file.
pub async fn handle_preview(
    State(state): State<Arc<AppState>>,
    Path(lease_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let contract = load_contract(&state, &lease_id).await?;
    Ok(Html(contract.html))
}

/// GET /api/contracts/:lease_id/download?format=pdf|doc
pub async fn handle_download(
    State(state): State<Arc<AppState>>,
    Path(lease_id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    let format = parse_format(&params.format)?;
    let contract = load_contract(&state, &lease_id).await?;

    let (bytes, content_type, extension) = match format {
        ExportFormat::Pdf => {
            let meta = PdfMetadata {
                title: format!("Contrat de location - {}", contract.tenant_name),
                author: state.config.building_name.clone(),
                creator: format!("gestloc-server {}", env!("CARGO_PKG_VERSION")),
                created: chrono::Local::now().date_naive(),
            };

            // The surface is scoped to this one export and must be torn down
            // on the error and timeout paths too.
            let surface = RenderSurface::launch().await?;
            let produced = tokio::time::timeout(
                Duration::from_millis(state.config.timeout_ms),
                export_pdf(&surface, &contract.html, &meta),
            )
            .await;
            let _ = surface.close().await;

            let bytes = match produced {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ExportError::Render(format!(
                        "timed out after {}ms",
                        state.config.timeout_ms
                    ))
                    .into())
                }
            };
            (bytes, "application/pdf", "pdf")
        }
        ExportFormat::Doc => (export_doc(&contract.html), "application/msword", "doc"),
    };

    tracing::info!(
        "Exported contract {} as {} ({} bytes)",
        contract.number,
        extension,
        bytes.len()
    );

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), content_type.to_string()),
            (
                "Content-Disposition".to_string(),
                format!(
                    "attachment; filename=\"Contrat_{}.{}\"",
                    contract.number, extension
                ),
            ),
        ],
        bytes,
    ))
}

/// Loads everything a contract needs and assembles the document.
async fn load_contract(state: &AppState, lease_id: &str) -> Result<AssembledContract, ApiError> {
    let lease_row = sqlx::query_as::<_, LeaseRow>("SELECT * FROM leases WHERE id = ?")
        .bind(lease_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::LeaseNotFound(lease_id.to_string()))?;

    let tenant_row = sqlx::query_as::<_, TenantRow>("SELECT * FROM tenants WHERE id = ?")
        .bind(&lease_row.tenant_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!(
                "Lease {} references missing tenant {}",
                lease_id,
                lease_row.tenant_id
            ))
        })?;

    let landlord_row = sqlx::query_as::<_, LandlordRow>(
        "SELECT * FROM landlord_profiles ORDER BY created_at LIMIT 1",
    )
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::LandlordMissing)?;

    let main_clauses = load_clauses(&state.db, false).await?;
    let annex_clauses = load_clauses(&state.db, true).await?;

    let landlord = landlord_row.into_profile();
    let tenant = tenant_row.into_snapshot();
    let lease = lease_row.into_snapshot();

    let logo = fetch_logo(&state.config.logo_url).await;

    let opts = RenderOptions {
        building_name: state.config.building_name.clone(),
        ..RenderOptions::default()
    };

    let html = assemble(
        &landlord,
        &tenant,
        &lease,
        &main_clauses,
        &annex_clauses,
        logo.as_ref(),
        &opts,
    );

    Ok(AssembledContract {
        tenant_name: tenant.full_name(),
        number: contract_number(&lease.property.unit_number, opts.issue_date),
        html,
    })
}

async fn load_clauses(db: &SqlitePool, annex: bool) -> Result<Vec<ClauseRecord>, ApiError> {
    let rows =
        sqlx::query_as::<_, ClauseRow>("SELECT * FROM clauses WHERE is_annex = ? ORDER BY order_index")
            .bind(annex)
            .fetch_all(db)
            .await?;

    rows.into_iter()
        .map(|row| row.into_record().map_err(|e| ApiError::Internal(e.into())))
        .collect()
}

/// Fetches the configured logo, returning `None` on any failure.
///
/// A missing logo only degrades the contract header; every error path here
/// logs a warning and lets the render continue without the image.
pub(crate) async fn fetch_logo(url: &str) -> Option<LogoAsset> {
    if url.is_empty() {
        return None;
    }

    let response = match reqwest::get(url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Logo fetch failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::warn!("Logo fetch returned {} for {}", response.status(), url);
        return None;
    }

    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();

    match response.bytes().await {
        Ok(bytes) => Some(LogoAsset {
            bytes: bytes.to_vec(),
            mime,
        }),
        Err(e) => {
            tracing::warn!("Logo body read failed: {}", e);
            None
        }
    }
}
