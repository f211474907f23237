//! # API エラーハンドリング
//!
//! API 層のエラー定義と、JSON:API 形式のエラーレスポンスへの変換を行う。
//!
//! ## エラーの階層
//!
//! ```text
//! RuleError / FormatError / DomainError / ValidationFailure
//!        ↓ From
//! ApiError
//!        ↓ IntoResponse
//! HTTP レスポンス (StatusCode + ErrorResponse)
//! ```
//!
//! ## HTTP ステータスとの対応
//!
//! | ApiError | HTTP Status | title |
//! |----------|-------------|-------|
//! | Validation | 400 | `ValidationError`（違反ごとに 1 件） |
//! | BadRequest | 400 | `BadRequestError` |
//! | NotFound | 404 | `NotFoundError` |
//! | Rule / Format / Internal | 500 | `InternalServerError` |
//!
//! 500 系の詳細はログにのみ出力し、クライアントには固定メッセージを返す。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use gosk_domain::{DomainError, FormatError};
use gosk_shared::{ErrorResponse, RuleError};
use thiserror::Error;

use crate::validation::ValidationFailure;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 入力値のバリデーション違反（違反一覧をそのまま返す）
   #[error("バリデーションエラー: {} 件", .0.errors.len())]
   Validation(ErrorResponse),

   /// リクエストの形式が不正（JSON として解釈できない など）
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// ルール宣言の誤り
   #[error("ルールエンジンエラー: {0}")]
   Rule(#[from] RuleError),

   /// レスポンス整形の契約違反
   #[error("レスポンス整形エラー: {0}")]
   Format(#[from] FormatError),

   #[error("内部サーバーエラー: {0}")]
   Internal(#[from] anyhow::Error),
}

impl From<DomainError> for ApiError {
   fn from(error: DomainError) -> Self {
      match error {
         DomainError::NotFound { .. } => Self::NotFound(error.to_string()),
      }
   }
}

impl From<ValidationFailure> for ApiError {
   fn from(failure: ValidationFailure) -> Self {
      match failure {
         ValidationFailure::Rejected(response) => Self::Validation(response),
         ValidationFailure::Engine(error) => Self::Rule(error),
      }
   }
}

impl ApiError {
   fn into_error_response(self) -> ErrorResponse {
      match self {
         Self::Validation(response) => response,
         Self::BadRequest(detail) => ErrorResponse::bad_request(detail),
         Self::NotFound(detail) => ErrorResponse::not_found(detail),
         Self::Rule(e) => {
            tracing::error!(error = %e, "ルール宣言が不正です");
            ErrorResponse::internal_error()
         }
         Self::Format(e) => {
            tracing::error!(error = %e, "レスポンスの整形に失敗しました");
            ErrorResponse::internal_error()
         }
         Self::Internal(e) => {
            tracing::error!(error = ?e, "内部エラー");
            ErrorResponse::internal_error()
         }
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let body = self.into_error_response();
      let status =
         StatusCode::from_u16(body.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

      (status, Json(body)).into_response()
   }
}
