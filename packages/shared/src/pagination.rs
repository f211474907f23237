//! # ページング情報
//!
//! コレクションレスポンスの `meta.paging` に載せるページング情報。
//!
//! ページングの計算（total の集計や offset の算出）はこのクレートの責務ではない。
//! 呼び出し元（リポジトリ）が計算した値をそのまま運ぶだけの型。

use serde::{Deserialize, Serialize};

/// オフセットベースのページング情報
///
/// ## JSON 形式
///
/// ```json
/// { "limit": 10, "offset": 0, "total": 3 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMetadata {
   pub limit:  u64,
   pub offset: u64,
   pub total:  u64,
}

impl PageMetadata {
   pub fn new(limit: u64, offset: u64, total: u64) -> Self {
      Self {
         limit,
         offset,
         total,
      }
   }
}
