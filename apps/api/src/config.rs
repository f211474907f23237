//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `API_PORT` | No | `8080` | ポート番号 |
//! | `REQUEST_ID_HEADER` | No | `X-Request-ID` | 相関 ID を運ぶヘッダー名 |
//! | `LOG_FORMAT` | No | `pretty` | ログ出力形式（`json` / `pretty`） |
//!
//! 開発環境では `.env` ファイルから読み込める（`main` が `dotenvy` で読み込む）。

use std::env;

use axum::http::HeaderName;
use gosk_shared::observability::LogFormat;
use thiserror::Error;

use crate::middleware::correlation::DEFAULT_HEADER;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("API_PORT が不正です: {value}")]
   InvalidPort { value: String },

   #[error("REQUEST_ID_HEADER がヘッダー名として不正です: {value}")]
   InvalidHeader { value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
   /// バインドアドレス（例: `0.0.0.0`, `127.0.0.1`）
   pub host:              String,
   pub port:              u16,
   /// 相関 ID ヘッダー名
   pub request_id_header: HeaderName,
   pub log_format:        LogFormat,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 任意の参照関数から設定を読み込む
   fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

      let port = match lookup("API_PORT") {
         Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidPort { value })?,
         None => 8080,
      };

      let request_id_header = match lookup("REQUEST_ID_HEADER") {
         Some(value) => HeaderName::try_from(value.as_str())
            .map_err(|_| ConfigError::InvalidHeader { value })?,
         None => DEFAULT_HEADER,
      };

      let log_format = lookup("LOG_FORMAT")
         .map(|value| LogFormat::parse(&value))
         .unwrap_or_default();

      Ok(Self {
         host,
         port,
         request_id_header,
         log_format,
      })
   }
}
