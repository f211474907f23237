//! # gosk API サーバー
//!
//! JSON:API 準拠の CRUD サービスのスターターキット。
//!
//! ## リクエストの流れ
//!
//! ```text
//! リクエスト
//!   → Correlation ミドルウェア（相関 ID を決定し TraceContext を保存）
//!   → TraceLayer（相関 ID 付きのリクエストスパン）
//!   → ハンドラ（ボディのパース → バリデーション → ユースケース）
//!   → レスポンス整形（DomainModel → data / meta エンベロープ）
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と JSON:API エラーレスポンスへの変換
//! - [`middleware`] - Correlation ミドルウェア
//! - [`validation`] - バリデーション違反のエラーレコードへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`usecase`] - ビジネスロジック
//! - [`repository`] - 永続化の抽象とインメモリ実装

pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod repository;
pub mod usecase;
pub mod validation;

use std::sync::Arc;

use axum::{
   Router,
   body::Body,
   middleware::from_fn_with_state,
   routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{
   handler::{
      ExampleState,
      create_example,
      delete_example,
      get_example,
      health_check,
      list_examples,
      update_example,
   },
   middleware::{ResolvedCorrelation, correlation_middleware, make_request_span},
};

/// ルーターを構築する
///
/// Correlation ミドルウェアを最も外側に置き、`TraceLayer` のスパンが
/// 相関 ID を参照できるようにする。
pub fn app(state: Arc<ExampleState>, correlation: ResolvedCorrelation) -> Router {
   let make_span = make_request_span::<Body>(correlation.context_key());

   Router::new()
      .route("/health", get(health_check))
      .route("/v1/examples", get(list_examples).post(create_example))
      .route(
         "/v1/examples/{id}",
         get(get_example)
            .patch(update_example)
            .delete(delete_example),
      )
      .with_state(state)
      .layer(TraceLayer::new_for_http().make_span_with(make_span))
      .layer(from_fn_with_state(correlation, correlation_middleware))
}
