//! # gosk 共有ユーティリティ
//!
//! このクレートは、gosk のワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, api）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - Web フレームワーク（axum）には依存しない
//!
//! ## モジュール構成
//!
//! - [`jsonapi`] - JSON:API 形式のレスポンスエンベロープ（`data` / `meta`）
//! - [`error_response`] - JSON:API 形式のエラーレスポンス（`errors`）
//! - [`pagination`] - ページング情報（limit / offset / total）
//! - [`validation`] - 宣言的なフィールドルールを評価するルールエンジン
//! - [`observability`] - トレーシング初期化とログ出力形式

pub mod error_response;
pub mod jsonapi;
pub mod observability;
pub mod pagination;
pub mod validation;

pub use error_response::{ErrorData, ErrorResponse, ErrorSource, ErrorType};
pub use jsonapi::{Response, ResponseData, ResponseMetadata, ResponseResource};
pub use pagination::PageMetadata;
pub use validation::{FieldViolation, Rule, RuleError, RuleSet, Validate};
