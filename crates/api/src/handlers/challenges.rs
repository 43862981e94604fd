//! Handlers for the `/challenges` resource.
//!
//! Covers the challenge lifecycle (create, edit before start, delete), the
//! join/approve membership flow, invite-code resolution, and per-challenge
//! rankings. Private challenges are hidden (404, not 403) from everyone but
//! their creator and participants; knowing the invite code or id is enough
//! to *request* to join, approval still gates membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use grit_core::challenge::{
    derive_end_date, ensure_not_started, generate_invite_code, validate_duration_days,
    validate_modality, validate_rules, validate_target, validate_title,
};
use grit_core::error::CoreError;
use grit_core::period::Period;
use grit_core::types::DbId;
use grit_db::models::challenge::{Challenge, ChallengeDetail, CreateChallenge, UpdateChallenge};
use grit_db::models::notification::kinds;
use grit_db::models::participant::{ChallengeParticipant, ParticipantWithUser, Participation};
use grit_db::models::ranking::ChallengeStanding;
use grit_db::repositories::{
    ChallengeRepo, NotificationRepo, ParticipantRepo, RankingRepo, UserRepo,
};
use serde::Deserialize;

use crate::engine::challenge_ledger;
use crate::engine::ranking::{podium_ranking, PodiumRanking};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts to find an unused invite code before giving up.
const MAX_CODE_ATTEMPTS: usize = 3;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /challenges/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// The user whose pending join request is being approved.
    pub user_id: DbId,
}

/// Query parameters for `GET /challenges/{id}/ranking`.
#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    /// `weekly` (default) or `overall`.
    pub period: Option<String>,
}

// ---------------------------------------------------------------------------
// Challenge lifecycle
// ---------------------------------------------------------------------------

/// GET /api/v1/challenges
///
/// Challenges visible to the caller: public ones plus any they created or
/// participate in.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Challenge>>>> {
    let challenges = ChallengeRepo::list_visible(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: challenges }))
}

/// POST /api/v1/challenges
///
/// Create a challenge. The caller becomes its creator and is enrolled as an
/// approved participant. Scoring rules, when supplied, are validated and
/// stored alongside.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChallenge>,
) -> AppResult<(StatusCode, Json<DataResponse<ChallengeDetail>>)> {
    validate_title(&input.title)?;
    validate_modality(&input.modality)?;
    validate_target(input.target)?;
    validate_duration_days(input.duration_days)?;
    if let Some(ref rules) = input.rules {
        validate_rules(&rules.scoring())?;
    }

    let end_date = derive_end_date(input.start_date, input.duration_days);

    // Codes are random; on the rare collision, roll a fresh one.
    let mut created = None;
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_invite_code();
        let mut tx = state.pool.begin().await?;
        match ChallengeRepo::create(&mut tx, auth.user_id, &input, &code, end_date).await {
            Ok(challenge) => {
                created = Some((tx, challenge));
                break;
            }
            Err(e) => {
                let err = AppError::from(e);
                if err.is_unique_violation("uq_challenges_code") {
                    tx.rollback().await?;
                    continue;
                }
                return Err(err);
            }
        }
    }
    let Some((mut tx, challenge)) = created else {
        return Err(AppError::InternalError(
            "Could not allocate a unique invite code".into(),
        ));
    };

    let rules = match &input.rules {
        Some(rules) => Some(ChallengeRepo::create_rules(&mut tx, challenge.id, rules).await?),
        None => None,
    };

    ParticipantRepo::create(&mut tx, challenge.id, auth.user_id, true).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ChallengeDetail { challenge, rules },
        }),
    ))
}

/// GET /api/v1/challenges/{id}
///
/// Challenge detail including its scoring rules, if any.
pub async fn detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChallengeDetail>>> {
    let challenge = find_visible(&state, &auth, challenge_id).await?;
    let rules = ChallengeRepo::find_rules(&state.pool, challenge_id).await?;

    Ok(Json(DataResponse {
        data: ChallengeDetail { challenge, rules },
    }))
}

/// PUT /api/v1/challenges/{id}
///
/// Edit a challenge. Creator only, and only before `start_date`; after that
/// the window is locked and edits are rejected with 400.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
    Json(input): Json<UpdateChallenge>,
) -> AppResult<Json<DataResponse<Challenge>>> {
    let challenge = find_challenge(&state, challenge_id).await?;
    if challenge.created_by != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the challenge creator can edit it".into(),
        )));
    }
    ensure_not_started(challenge.start_date, Utc::now())?;

    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    if let Some(ref modality) = input.modality {
        validate_modality(modality)?;
    }
    if let Some(target) = input.target {
        validate_target(target)?;
    }
    if let Some(duration_days) = input.duration_days {
        validate_duration_days(duration_days)?;
    }

    let mut tx = state.pool.begin().await?;
    let updated = ChallengeRepo::update(&mut tx, challenge_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id: challenge_id,
        }))?;
    tx.commit().await?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/challenges/{id}
///
/// Delete a challenge (creator or admin). Tagged check-ins are removed with
/// it and the weekly ledger is repaired in the same transaction. Returns 204.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let challenge = find_challenge(&state, challenge_id).await?;
    if challenge.created_by != auth.user_id && !auth.is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the challenge creator or an admin can delete it".into(),
        )));
    }

    challenge_ledger::remove_challenge(&state, challenge_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/challenges/invite/{code}
///
/// Resolve an invite code to its challenge. Holding the code grants
/// visibility even for private challenges.
pub async fn by_invite(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<ChallengeDetail>>> {
    let challenge = ChallengeRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("No challenge with that invite code".into()))?;

    let rules = ChallengeRepo::find_rules(&state.pool, challenge.id).await?;
    Ok(Json(DataResponse {
        data: ChallengeDetail { challenge, rules },
    }))
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// POST /api/v1/challenges/{id}/join
///
/// Ask to join a challenge. The request stays pending until the creator
/// approves it. Returns 409 if the caller already has a participation row,
/// 400 if the challenge has already ended.
pub async fn join(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ChallengeParticipant>>)> {
    let challenge = find_challenge(&state, challenge_id).await?;

    if Utc::now() > challenge.end_date {
        return Err(AppError::Core(CoreError::InvalidState(
            "Challenge has already ended".into(),
        )));
    }

    let joiner = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let mut tx = state.pool.begin().await?;
    // Re-joining trips the unique member constraint and surfaces as 409.
    let participant = ParticipantRepo::create(&mut tx, challenge_id, auth.user_id, false).await?;

    if challenge.created_by != auth.user_id {
        NotificationRepo::create(
            &mut tx,
            challenge.created_by,
            Some(auth.user_id),
            Some(challenge_id),
            kinds::JOIN_REQUEST,
            &format!("{} asked to join {}", joiner.username, challenge.title),
        )
        .await?;
    }
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: participant }),
    ))
}

/// POST /api/v1/challenges/{id}/approve
///
/// Approve a pending join request. Creator only.
pub async fn approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<Json<DataResponse<ChallengeParticipant>>> {
    let challenge = find_challenge(&state, challenge_id).await?;
    if challenge.created_by != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the challenge creator can approve participants".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    let participant = ParticipantRepo::approve(&mut tx, challenge_id, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Participant",
            id: input.user_id,
        }))?;

    NotificationRepo::create(
        &mut tx,
        input.user_id,
        Some(auth.user_id),
        Some(challenge_id),
        kinds::JOIN_APPROVED,
        &format!("Your request to join {} was approved", challenge.title),
    )
    .await?;
    tx.commit().await?;

    Ok(Json(DataResponse { data: participant }))
}

/// GET /api/v1/challenges/{id}/participants
///
/// Participants (pending and approved, with profile info) of a challenge the
/// caller can see.
pub async fn participants(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ParticipantWithUser>>>> {
    find_visible(&state, &auth, challenge_id).await?;

    let members = ParticipantRepo::list_for_challenge(&state.pool, challenge_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/challenge-participation
///
/// The caller's participations, each with its challenge.
pub async fn my_participation(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Participation>>>> {
    let participations = ParticipantRepo::list_participations(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: participations,
    }))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// GET /api/v1/challenges/{id}/ranking?period=weekly|overall
///
/// Standings among approved participants. `weekly` ranks by check-ins in the
/// current period, `overall` by total progress. Participants and the creator
/// only.
pub async fn ranking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
    Query(params): Query<RankingQuery>,
) -> AppResult<Json<DataResponse<PodiumRanking<ChallengeStanding>>>> {
    let challenge = find_challenge(&state, challenge_id).await?;

    let is_member = ParticipantRepo::find(&state.pool, challenge_id, auth.user_id)
        .await?
        .is_some_and(|p| p.approved);
    if !is_member && challenge.created_by != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only participants can view this ranking".into(),
        )));
    }

    let rows = match params.period.as_deref().unwrap_or("weekly") {
        "weekly" => {
            let period = Period::containing(Utc::now());
            RankingRepo::challenge_weekly_standings(
                &state.pool,
                challenge_id,
                period.start,
                period.end,
            )
            .await?
        }
        "overall" => RankingRepo::challenge_overall_standings(&state.pool, challenge_id).await?,
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown ranking period '{other}' (expected 'weekly' or 'overall')"
            )));
        }
    };

    Ok(Json(DataResponse {
        data: podium_ranking(rows, |row| row.score),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_challenge(state: &AppState, challenge_id: DbId) -> AppResult<Challenge> {
    ChallengeRepo::find_by_id(&state.pool, challenge_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id: challenge_id,
        }))
}

/// Fetch a challenge, hiding private ones from non-members.
///
/// Private challenges answer 404 (not 403) to outsiders so their existence
/// leaks nothing.
async fn find_visible(
    state: &AppState,
    auth: &AuthUser,
    challenge_id: DbId,
) -> AppResult<Challenge> {
    let challenge = find_challenge(state, challenge_id).await?;

    if challenge.is_private && challenge.created_by != auth.user_id {
        let is_member = ParticipantRepo::find(&state.pool, challenge_id, auth.user_id)
            .await?
            .is_some();
        if !is_member {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Challenge",
                id: challenge_id,
            }));
        }
    }

    Ok(challenge)
}
