//! # JSON:API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式を提供する。
//!
//! ## JSON 形式
//!
//! 単一リソース:
//!
//! ```json
//! { "data": { "type": "example", "id": "…", "attributes": { … } } }
//! ```
//!
//! コレクション:
//!
//! ```json
//! {
//!   "data": [ { "type": "example", "id": "…", "attributes": { … } } ],
//!   "meta": { "paging": { "limit": 10, "offset": 0, "total": 3 } }
//! }
//! ```
//!
//! `meta` はコレクションレスポンスにのみ含まれる。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::PageMetadata;

/// 公開 API の統一レスポンス型
///
/// ## 使用例
///
/// ```
/// use gosk_shared::{Response, ResponseResource};
/// use uuid::Uuid;
///
/// let resource = ResponseResource::new("example", Uuid::nil(), "attrs");
/// let response = Response::single(resource);
/// assert!(response.meta.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<A> {
   pub data: ResponseData<A>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub meta: Option<ResponseMetadata>,
}

impl<A> Response<A> {
   /// 単一リソースのレスポンスを作成する（`meta` なし）
   pub fn single(resource: ResponseResource<A>) -> Self {
      Self {
         data: ResponseData::Single(resource),
         meta: None,
      }
   }

   /// コレクションのレスポンスを作成する（`meta.paging` 付き）
   pub fn collection(resources: Vec<ResponseResource<A>>, paging: PageMetadata) -> Self {
      Self {
         data: ResponseData::Collection(resources),
         meta: Some(ResponseMetadata { paging }),
      }
   }
}

/// `data` セクション
///
/// 単一リソースはオブジェクト、コレクションは配列としてシリアライズされる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData<A> {
   Collection(Vec<ResponseResource<A>>),
   Single(ResponseResource<A>),
}

impl<A> ResponseData<A> {
   /// 含まれるリソース数
   pub fn len(&self) -> usize {
      match self {
         Self::Collection(resources) => resources.len(),
         Self::Single(_) => 1,
      }
   }

   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }
}

/// `meta` セクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
   pub paging: PageMetadata,
}

/// リソースレコード
///
/// ドメインオブジェクト 1 件のワイヤ表現。識別子は `attributes` の外に置く。
/// `meta` / `related` は任意のサイドチャネルで、`None` の場合は出力しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseResource<A> {
   #[serde(rename = "type")]
   pub resource_type: String,
   pub id:            Uuid,
   pub attributes:    A,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub meta:          Option<serde_json::Value>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub related:       Option<serde_json::Value>,
}

impl<A> ResponseResource<A> {
   pub fn new(resource_type: impl Into<String>, id: Uuid, attributes: A) -> Self {
      Self {
         resource_type: resource_type.into(),
         id,
         attributes,
         meta: None,
         related: None,
      }
   }
}
