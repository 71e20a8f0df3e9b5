//! Axum route handlers for the Messages API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::messages::assist::{suggest_template, AssistRequest, TemplateSuggestion};
use crate::messages::compose::{generate_messages, GeneratedBatch, MessageSource};
use crate::messages::drafts::{check_draft, DraftInput, MessageDraft};
use crate::messages::templates::{find_template, list_templates, Channel, MessageTemplate};
use crate::spintax::RandomPicker;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    pub channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: Uuid,
}

/// Exactly one of `template_id`, `draft_id` or `body` selects the source.
/// `subject` only accompanies an inline `body`; `owner_id` must own `draft_id`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub template_id: Option<String>,
    pub draft_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub subject: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, String>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<&'static MessageTemplate>,
}

#[derive(Debug, Serialize)]
pub struct DraftListResponse {
    pub drafts: Vec<MessageDraft>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Loads a draft, treating someone else's draft as missing.
async fn find_owned_draft(
    state: &AppState,
    id: Uuid,
    owner_id: Uuid,
) -> Result<MessageDraft, AppError> {
    state
        .drafts
        .get(id)
        .await?
        .filter(|d| d.owner_id == owner_id)
        .ok_or_else(|| AppError::NotFound(format!("Draft {id} not found")))
}

/// GET /api/v1/messages/templates
pub async fn handle_list_templates(
    Query(params): Query<ChannelQuery>,
) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: list_templates(params.channel),
    })
}

/// POST /api/v1/messages/generate
///
/// Resolves a built-in template, a stored draft or an inline body into
/// distinct messages. Invalid spintax is reported, not rejected.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedBatch>, AppError> {
    let selectors = [
        request.template_id.is_some(),
        request.draft_id.is_some(),
        request.body.is_some(),
    ];
    if selectors.iter().filter(|&&s| s).count() != 1 {
        return Err(AppError::Validation(
            "provide exactly one of template_id, draft_id or body".to_string(),
        ));
    }
    if request.subject.is_some() && request.body.is_none() {
        return Err(AppError::Validation(
            "subject can only be given with an inline body".to_string(),
        ));
    }

    let draft = match request.draft_id {
        Some(id) => {
            let owner_id = request.owner_id.ok_or_else(|| {
                AppError::Validation("owner_id is required with draft_id".to_string())
            })?;
            Some(find_owned_draft(&state, id, owner_id).await?)
        }
        None => None,
    };

    let source = if let Some(id) = request.template_id.as_deref() {
        let template = find_template(id)
            .ok_or_else(|| AppError::NotFound(format!("Template '{id}' not found")))?;
        MessageSource {
            subject: template.subject,
            body: template.body,
        }
    } else if let Some(draft) = &draft {
        MessageSource {
            subject: draft.subject.as_deref(),
            body: &draft.body,
        }
    } else {
        let body = request.body.as_deref().unwrap_or_default();
        if body.trim().is_empty() {
            return Err(AppError::Validation("body cannot be empty".to_string()));
        }
        MessageSource {
            subject: request.subject.as_deref(),
            body,
        }
    };

    let count = request.count.unwrap_or(1).clamp(1, state.config.max_batch);
    let batch = match request.seed {
        Some(seed) => generate_messages(source, &request.fields, count, &mut RandomPicker::seeded(seed)),
        None => generate_messages(source, &request.fields, count, &mut RandomPicker::thread()),
    };

    info!(
        "Generated {} of {} requested messages",
        batch.messages.len(),
        count
    );
    Ok(Json(batch))
}

/// POST /api/v1/messages/assist
pub async fn handle_assist(
    State(state): State<AppState>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<TemplateSuggestion>, AppError> {
    let suggestion = suggest_template(&request, state.generator.as_ref()).await?;
    Ok(Json(suggestion))
}

/// POST /api/v1/messages/drafts
pub async fn handle_create_draft(
    State(state): State<AppState>,
    Json(input): Json<DraftInput>,
) -> Result<(StatusCode, Json<MessageDraft>), AppError> {
    check_draft(&input)?;
    let draft = MessageDraft::create(input);
    state.drafts.save(&draft).await?;
    info!("Created draft {} for owner {}", draft.id, draft.owner_id);
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /api/v1/messages/drafts?owner_id=
pub async fn handle_list_drafts(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<DraftListResponse>, AppError> {
    let drafts = state.drafts.list_for_owner(params.owner_id).await?;
    Ok(Json(DraftListResponse { drafts }))
}

/// GET /api/v1/messages/drafts/:id?owner_id=
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<MessageDraft>, AppError> {
    let draft = find_owned_draft(&state, id, params.owner_id).await?;
    Ok(Json(draft))
}

/// PUT /api/v1/messages/drafts/:id
///
/// Ownership cannot change: `owner_id` must match the stored draft.
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DraftInput>,
) -> Result<Json<MessageDraft>, AppError> {
    let mut draft = find_owned_draft(&state, id, input.owner_id).await?;

    check_draft(&input)?;
    draft.replace(input);
    state.drafts.save(&draft).await?;
    Ok(Json(draft))
}

/// DELETE /api/v1/messages/drafts/:id?owner_id=
pub async fn handle_delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    find_owned_draft(&state, id, params.owner_id).await?;
    if !state.drafts.delete(id).await? {
        return Err(AppError::NotFound(format!("Draft {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
