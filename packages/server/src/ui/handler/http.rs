//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};

use crate::{
    domain::{QuestionId, QuestionText, QuestionnaireId, Title, VoterToken},
    infrastructure::dto::http::{
        AskQuestionRequest, CreateQuestionnaireRequest, QuestionDto, QuestionListDto,
        QuestionnaireDto, VoteResultDto,
    },
    ui::{
        cookie::{HOST_COOKIE, VOTER_COOKIE, read_cookie},
        error::ApiError,
        state::AppState,
    },
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /questionnaires`
///
/// 作成者に `host` Cookie（ホストシークレット）を発行する。
pub async fn create_questionnaire(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateQuestionnaireRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = Title::new(request.title)?;
    let questionnaire = state.create_questionnaire_usecase.execute(title).await?;

    let cookie = state
        .cookies
        .build(HOST_COOKIE, questionnaire.host_secret.as_str());
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(QuestionnaireDto::from(&questionnaire)),
    ))
}

/// `GET /questionnaires/{id}`
pub async fn get_questionnaire(
    State(state): State<Arc<AppState>>,
    Path(questionnaire_id): Path<String>,
) -> Result<Json<QuestionnaireDto>, ApiError> {
    let questionnaire_id = QuestionnaireId::new(questionnaire_id)?;
    let questionnaire = state
        .get_questionnaire_usecase
        .execute(&questionnaire_id)
        .await?;
    Ok(Json(QuestionnaireDto::from(&questionnaire)))
}

/// `DELETE /questionnaires/{id}`（ホストのみ）
pub async fn delete_questionnaire(
    State(state): State<Arc<AppState>>,
    Path(questionnaire_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let questionnaire_id = QuestionnaireId::new(questionnaire_id)?;
    let host_secret = read_cookie(&headers, HOST_COOKIE).ok_or(ApiError::Forbidden)?;
    state
        .delete_questionnaire_usecase
        .execute(&questionnaire_id, host_secret)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /questionnaires/{id}/questions`
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Path(questionnaire_id): Path<String>,
    Json(request): Json<AskQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionDto>), ApiError> {
    let questionnaire_id = QuestionnaireId::new(questionnaire_id)?;
    let text = QuestionText::new(request.question)?;
    let question = state
        .ask_question_usecase
        .execute(questionnaire_id, text)
        .await?;
    Ok((StatusCode::CREATED, Json(QuestionDto::from(&question))))
}

/// `GET /questionnaires/{id}/questions`
pub async fn get_questions(
    State(state): State<Arc<AppState>>,
    Path(questionnaire_id): Path<String>,
) -> Result<Json<QuestionListDto>, ApiError> {
    let questionnaire_id = QuestionnaireId::new(questionnaire_id)?;
    let questions = state
        .get_questions_usecase
        .execute(&questionnaire_id)
        .await?;
    Ok(Json(QuestionListDto::from(questions)))
}

/// `PUT /questionnaires/{id}/questions/{question_id}/vote`
///
/// `voter` Cookie が必要。ない場合は 403 で、Cookie の発行はしない。
pub async fn vote_question(
    State(state): State<Arc<AppState>>,
    Path((questionnaire_id, question_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<VoteResultDto>, ApiError> {
    let questionnaire_id = QuestionnaireId::new(questionnaire_id)?;
    let question_id = QuestionId::new(question_id)?;
    let voter = read_cookie(&headers, VOTER_COOKIE).ok_or(ApiError::Forbidden)?;
    let voter = VoterToken::new(voter.to_string())?;

    let votes = state
        .vote_question_usecase
        .execute(&questionnaire_id, &question_id, &voter)
        .await?;
    Ok(Json(VoteResultDto {
        id: question_id.into_string(),
        votes,
    }))
}

/// `PUT /questionnaires/{id}/questions/{question_id}/answer`（ホストのみ）
pub async fn answer_question(
    State(state): State<Arc<AppState>>,
    Path((questionnaire_id, question_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let questionnaire_id = QuestionnaireId::new(questionnaire_id)?;
    let question_id = QuestionId::new(question_id)?;
    let host_secret = read_cookie(&headers, HOST_COOKIE).ok_or(ApiError::Forbidden)?;

    state
        .answer_question_usecase
        .execute(&questionnaire_id, &question_id, host_secret)
        .await?;
    Ok(StatusCode::OK)
}
