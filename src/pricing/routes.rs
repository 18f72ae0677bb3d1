//! HTTP handlers for the costing API.
//!
//! Stateless endpoints price a profile in one call; draft endpoints hold a
//! profile across edits for the package creation and edit screens.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::extract::{AppJson, AppPath};
use crate::AppState;

use super::models::{CategoryId, PackageCostProfile};
use super::requests::{OpenDraftRequest, UpdateDraftRequest};
use super::responses::{
    DraftResponse, LineItemResponse, SubmissionResponse, TotalsResponse, ValidationResponse,
};
use super::services::{validate_for_save, CostingError, CostingSession};
use super::store::{LineItemDraft, LineItemPatch};
use super::totals::compute_totals;

/// Costing routes, mounted under `/api/costing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/totals", post(calculate_totals))
        .route("/validate", post(validate_profile))
        .route("/drafts", post(open_draft))
        .route(
            "/drafts/:draft_id",
            get(get_draft).patch(update_draft).delete(discard_draft),
        )
        .route("/drafts/:draft_id/submit", post(submit_draft))
        .route("/drafts/:draft_id/categories/:category/items", post(add_item))
        .route(
            "/drafts/:draft_id/categories/:category/items/:item_id",
            patch(update_item).delete(remove_item),
        )
}

fn parse_category(raw: &str) -> std::result::Result<CategoryId, CostingError> {
    raw.parse().map_err(CostingError::UnknownCategory)
}

/// Price a profile without opening a draft
async fn calculate_totals(
    AppJson(profile): AppJson<PackageCostProfile>,
) -> Json<TotalsResponse> {
    Json(TotalsResponse {
        totals: compute_totals(&profile),
    })
}

/// Run save-time validation on a profile
async fn validate_profile(
    AppJson(profile): AppJson<PackageCostProfile>,
) -> (StatusCode, Json<ValidationResponse>) {
    let totals = compute_totals(&profile);
    match validate_for_save(&profile, &totals) {
        Ok(()) => (
            StatusCode::OK,
            Json(ValidationResponse {
                valid: true,
                errors: vec![],
                totals,
            }),
        ),
        Err(CostingError::Validation { errors, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationResponse {
                valid: false,
                errors,
                totals,
            }),
        ),
        Err(other) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationResponse {
                valid: false,
                errors: vec![other.to_string()],
                totals,
            }),
        ),
    }
}

/// Open a draft: empty for a new package, seeded for an existing one
async fn open_draft(
    State(state): State<AppState>,
    AppJson(request): AppJson<OpenDraftRequest>,
) -> (StatusCode, Json<DraftResponse>) {
    let session = match request.profile {
        Some(profile) => CostingSession::from_profile(profile),
        None => CostingSession::for_new_package(),
    };
    let session = state.cache.open(session).await;
    (StatusCode::CREATED, Json(DraftResponse::from(&*session)))
}

async fn get_draft(
    State(state): State<AppState>,
    AppPath(draft_id): AppPath<Uuid>,
) -> Result<Json<DraftResponse>> {
    let session = state.cache.get(draft_id).await?;
    Ok(Json(DraftResponse::from(&*session)))
}

/// Edit package type, exchange rate, discount and fixed fields
async fn update_draft(
    State(state): State<AppState>,
    AppPath(draft_id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateDraftRequest>,
) -> Result<Json<DraftResponse>> {
    let (_, session) = state
        .cache
        .edit(draft_id, |session| {
            if let Some(package_type) = request.package_type {
                session.set_package_type(package_type);
            }
            if request.toggle_package_type {
                session.toggle_package_type();
            }
            if let Some(raw) = &request.exchange_rate {
                session.set_exchange_rate(raw);
            }
            if let Some(raw) = &request.discount {
                session.set_discount(raw);
            }
            for (field, raw) in &request.bangladesh_fixed {
                session.set_bangladesh_fixed(*field, raw);
            }
            for (field, raw) in &request.saudi_fixed {
                session.set_saudi_fixed(*field, raw);
            }
            Ok(())
        })
        .await?;

    Ok(Json(DraftResponse::from(&*session)))
}

async fn discard_draft(
    State(state): State<AppState>,
    AppPath(draft_id): AppPath<Uuid>,
) -> Result<StatusCode> {
    state
        .cache
        .close(draft_id)
        .await
        .ok_or(CostingError::DraftNotFound(draft_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a draft and hand back the submission for persistence
async fn submit_draft(
    State(state): State<AppState>,
    AppPath(draft_id): AppPath<Uuid>,
) -> Result<Json<SubmissionResponse>> {
    let submission = state
        .cache
        .close_if(draft_id, CostingSession::submission)
        .await?;

    info!(
        draft_id = %draft_id,
        grand_total = %submission.totals.grand_total,
        "Costing draft submitted"
    );
    Ok(Json(SubmissionResponse {
        draft_id,
        submission,
    }))
}

async fn add_item(
    State(state): State<AppState>,
    AppPath((draft_id, category)): AppPath<(Uuid, String)>,
    AppJson(draft): AppJson<LineItemDraft>,
) -> Result<(StatusCode, Json<LineItemResponse>)> {
    let category = parse_category(&category)?;
    let (item_id, session) = state
        .cache
        .edit(draft_id, |session| session.add_item(category, draft))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LineItemResponse {
            draft_id,
            item: session.profile().categories.get(category, item_id).cloned(),
            applied: true,
            totals: session.totals().clone(),
        }),
    ))
}

async fn update_item(
    State(state): State<AppState>,
    AppPath((draft_id, category, item_id)): AppPath<(Uuid, String, Uuid)>,
    AppJson(patch): AppJson<LineItemPatch>,
) -> Result<Json<LineItemResponse>> {
    let category = parse_category(&category)?;
    let (applied, session) = state
        .cache
        .edit(draft_id, |session| Ok(session.update_item(category, item_id, &patch)))
        .await?;

    if !applied {
        warn!(draft_id = %draft_id, item_id = %item_id, "Ignoring edit of missing line item");
    }
    Ok(Json(LineItemResponse {
        draft_id,
        item: session.profile().categories.get(category, item_id).cloned(),
        applied,
        totals: session.totals().clone(),
    }))
}

async fn remove_item(
    State(state): State<AppState>,
    AppPath((draft_id, category, item_id)): AppPath<(Uuid, String, Uuid)>,
) -> Result<Json<LineItemResponse>> {
    let category = parse_category(&category)?;
    let (applied, session) = state
        .cache
        .edit(draft_id, |session| Ok(session.remove_item(category, item_id)))
        .await?;

    if !applied {
        warn!(draft_id = %draft_id, item_id = %item_id, "Ignoring removal of missing line item");
    }
    Ok(Json(LineItemResponse {
        draft_id,
        item: None,
        applied,
        totals: session.totals().clone(),
    }))
}
