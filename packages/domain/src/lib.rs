//! # gosk ドメイン層
//!
//! ビジネスエンティティと、その JSON:API レスポンスへの整形規則を定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → domain → shared
//! ```
//!
//! ドメイン層は `shared` のみに依存し、Web フレームワークや永続化には依存しない。
//!
//! ## モジュール構成
//!
//! - [`model`] - ドメインモデル（コレクション / 単一）と JSON:API レスポンスへの整形
//! - [`example`] - サンプルリソース `example` のエンティティと入力契約
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層で発生するエラーの定義

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod example;
pub mod model;

pub use error::DomainError;
pub use model::{DomainModel, FormatError, ModelMetadata, ResourceObject};
