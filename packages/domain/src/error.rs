//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! レスポンス整形時の契約違反は [`FormatError`](crate::model::FormatError) として
//! 別に定義する。こちらは呼び出し側のプログラミングエラーであり、
//! クライアントに返すべき業務エラーではないため。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `NotFound` | 404 Not Found | エンティティが存在しない（論理削除済みを含む） |

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
   /// エンティティが見つからない
   ///
   /// `entity_type` にはリソース種別（`"example"` など）を指定する。
   #[error("{entity_type} が見つかりません: {id}")]
   NotFound {
      entity_type: &'static str,
      id:          String,
   },
}
