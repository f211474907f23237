//! # Example ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /v1/examples` - 一覧（`limit` / `offset` クエリ）
//! - `POST /v1/examples` - 作成
//! - `GET /v1/examples/{id}` - 取得
//! - `PATCH /v1/examples/{id}` - 更新
//! - `DELETE /v1/examples/{id}` - 論理削除
//!
//! リクエストボディは [`ExampleInputData`] のフラットな JSON オブジェクト。
//! JSON として解釈できないボディは `BadRequestError`、
//! ルール違反は違反ごとの `ValidationError` を返す。

use std::sync::Arc;

use axum::{
   Extension,
   Json,
   extract::{
      Path,
      Query,
      State,
      rejection::{JsonRejection, PathRejection, QueryRejection},
   },
   http::{HeaderMap, StatusCode},
   response::IntoResponse,
};
use gosk_domain::{
   DomainModel,
   example::{ExampleId, ExampleInputData},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
   error::ApiError,
   middleware::RequestLocals,
   usecase::ExampleUseCaseImpl,
   validation::validate_body,
};

/// 操作者 ID を運ぶヘッダー
const ACTOR_HEADER: &str = "x-actor-id";

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

/// Example API の共有状態
pub struct ExampleState {
   pub usecase:     ExampleUseCaseImpl,
   /// Correlation ミドルウェアが `RequestLocals` に使うキー
   pub context_key: String,
}

/// 一覧のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
   pub limit:  Option<u64>,
   pub offset: Option<u64>,
}

impl ListQuery {
   /// `limit` は 1〜100 に丸める
   fn limit(&self) -> u64 {
      self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
   }

   fn offset(&self) -> u64 {
      self.offset.unwrap_or(0)
   }
}

/// 操作者 ID を読む（認証は扱わないため、未指定は 0）
fn actor_id(headers: &HeaderMap) -> Result<u32, ApiError> {
   let Some(value) = headers.get(ACTOR_HEADER) else {
      return Ok(0);
   };
   value
      .to_str()
      .ok()
      .and_then(|v| v.parse().ok())
      .ok_or_else(|| ApiError::BadRequest(format!("{ACTOR_HEADER} ヘッダーが不正です")))
}

fn request_id<'a>(locals: Option<&'a Extension<RequestLocals>>, key: &str) -> &'a str {
   locals
      .and_then(|Extension(locals)| locals.trace(key))
      .map_or("-", |trace| trace.request_id.as_str())
}

fn parse_body(
   payload: Result<Json<ExampleInputData>, JsonRejection>,
) -> Result<ExampleInputData, ApiError> {
   let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
   validate_body(&input)?;
   Ok(input)
}

fn parse_id(path: Result<Path<Uuid>, PathRejection>) -> Result<ExampleId, ApiError> {
   let Path(id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
   Ok(ExampleId::from_uuid(id))
}

/// GET /v1/examples
#[tracing::instrument(skip_all)]
pub async fn list_examples(
   State(state): State<Arc<ExampleState>>,
   query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
   let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

   let model = state.usecase.list(query.limit(), query.offset()).await?;

   Ok((StatusCode::OK, Json(model.format_response()?)))
}

/// POST /v1/examples
///
/// ## レスポンス
///
/// - `201 Created`: 作成された Example
/// - `400 Bad Request`: JSON 不正、バリデーション違反
#[tracing::instrument(skip_all)]
pub async fn create_example(
   State(state): State<Arc<ExampleState>>,
   locals: Option<Extension<RequestLocals>>,
   headers: HeaderMap,
   payload: Result<Json<ExampleInputData>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
   let input = parse_body(payload)?;
   let actor = actor_id(&headers)?;

   let example = state.usecase.create(input, actor).await?;
   tracing::info!(
      request_id = request_id(locals.as_ref(), &state.context_key),
      example_id = %example.id(),
      "Example を作成しました"
   );

   let response = DomainModel::single(example).format_response()?;
   Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/examples/{id}
#[tracing::instrument(skip_all)]
pub async fn get_example(
   State(state): State<Arc<ExampleState>>,
   path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_id(path)?;

   let example = state.usecase.get(&id).await?;

   let response = DomainModel::single(example).format_response()?;
   Ok((StatusCode::OK, Json(response)))
}

/// PATCH /v1/examples/{id}
///
/// ボディの内容で title / description / status / enabled / deleted を置き換える。
#[tracing::instrument(skip_all)]
pub async fn update_example(
   State(state): State<Arc<ExampleState>>,
   locals: Option<Extension<RequestLocals>>,
   headers: HeaderMap,
   path: Result<Path<Uuid>, PathRejection>,
   payload: Result<Json<ExampleInputData>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_id(path)?;
   let input = parse_body(payload)?;
   let actor = actor_id(&headers)?;

   let example = state.usecase.update(&id, input, actor).await?;
   tracing::info!(
      request_id = request_id(locals.as_ref(), &state.context_key),
      example_id = %id,
      "Example を更新しました"
   );

   let response = DomainModel::single(example).format_response()?;
   Ok((StatusCode::OK, Json(response)))
}

/// DELETE /v1/examples/{id}
#[tracing::instrument(skip_all)]
pub async fn delete_example(
   State(state): State<Arc<ExampleState>>,
   locals: Option<Extension<RequestLocals>>,
   headers: HeaderMap,
   path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_id(path)?;
   let actor = actor_id(&headers)?;

   state.usecase.delete(&id, actor).await?;
   tracing::info!(
      request_id = request_id(locals.as_ref(), &state.context_key),
      example_id = %id,
      "Example を論理削除しました"
   );

   Ok(StatusCode::NO_CONTENT)
}
