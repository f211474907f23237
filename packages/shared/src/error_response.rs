//! # エラーレスポンス（JSON:API Error Objects）
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は API クレートの責務（shared に axum 依存を入れない）
//! - よく使うエラー種別は便利コンストラクタで提供する
//! - 1 レスポンスに複数のエラーを含められる（バリデーション違反の一括返却）
//!
//! ## JSON 形式
//!
//! ```json
//! {
//!   "errors": [
//!    {
//!      "status": 400,
//!      "source": { "pointer": "/title" },
//!      "title": "ValidationError",
//!      "detail": "'title' field is required"
//!    }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// エラーのカテゴリ
///
/// `ErrorData.title` に出力される機械可読なカテゴリタグ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, strum::Display)]
pub enum ErrorType {
   #[strum(serialize = "BadRequestError")]
   BadRequest,
   #[strum(serialize = "NotFoundError")]
   NotFound,
   #[strum(serialize = "ValidationError")]
   Validation,
   #[strum(serialize = "InternalServerError")]
   Internal,
}

impl ErrorType {
   pub fn as_str(self) -> &'static str {
      self.into()
   }
}

/// エラーの発生箇所
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
   /// リクエストボディ内の該当フィールドを指す JSON Pointer（例: `/title`）
   pub pointer: String,
}

/// エラー 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
   pub status: u16,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub source: Option<ErrorSource>,
   pub title:  String,
   pub detail: String,
}

impl ErrorData {
   /// 汎用コンストラクタ
   pub fn new(error_type: ErrorType, status: u16, detail: impl Into<String>) -> Self {
      Self {
         status,
         source: None,
         title: error_type.to_string(),
         detail: detail.into(),
      }
   }

   /// 400 Validation Error（フィールド単位）
   pub fn validation(pointer: impl Into<String>, detail: impl Into<String>) -> Self {
      Self::new(ErrorType::Validation, 400, detail).with_pointer(pointer)
   }

   /// 発生箇所の JSON Pointer を設定する
   pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
      self.source = Some(ErrorSource {
         pointer: pointer.into(),
      });
      self
   }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub errors: Vec<ErrorData>,
}

impl ErrorResponse {
   pub fn new(errors: Vec<ErrorData>) -> Self {
      Self { errors }
   }

   /// 400 Bad Request
   pub fn bad_request(detail: impl Into<String>) -> Self {
      Self::new(vec![ErrorData::new(ErrorType::BadRequest, 400, detail)])
   }

   /// 404 Not Found
   pub fn not_found(detail: impl Into<String>) -> Self {
      Self::new(vec![ErrorData::new(ErrorType::NotFound, 404, detail)])
   }

   /// 500 Internal Server Error
   ///
   /// detail は固定値（内部情報を漏らさないため）。
   pub fn internal_error() -> Self {
      Self::new(vec![ErrorData::new(
         ErrorType::Internal,
         500,
         "内部エラーが発生しました",
      )])
   }

   /// レスポンス全体の HTTP ステータス
   ///
   /// 先頭のエラーのステータスを採用する。エラーが空の場合は 500。
   pub fn status(&self) -> u16 {
      self.errors.first().map_or(500, |e| e.status)
   }
}
