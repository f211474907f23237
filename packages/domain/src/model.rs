//! # ドメインモデルとレスポンス整形
//!
//! ドメインオブジェクトの列（またはその 1 件）を JSON:API の
//! `data` / `meta` エンベロープへ変換する。
//!
//! ## 整形規則
//!
//! - `solo` が真ならちょうど 1 件を要求し、`data` に単一リソースを置く（`meta` なし）
//! - `solo` が偽なら全件を順序どおり整形し、`meta.paging` をそのまま写す
//! - 入力は借用のみで、変更しない
//!
//! 契約違反（単一レスポンスに 0 件など）は [`FormatError`] として返す。
//! これは呼び出し側の誤りであり、クライアントへは内部エラーとして扱う。

use gosk_shared::{PageMetadata, Response, ResponseResource};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// JSON:API リソースとして出力できるドメインオブジェクト
///
/// リソース種別タグは型ごとに [`RESOURCE_TYPE`](ResourceObject::RESOURCE_TYPE) で固定する。
/// 識別子は `attributes` ではなくリソースのトップレベルに出力されるため、
/// [`Attributes`](ResourceObject::Attributes) には含めないこと。
pub trait ResourceObject {
   /// リソース種別（`type` フィールド）
   const RESOURCE_TYPE: &'static str;

   /// 外部公開する属性のワイヤ表現
   type Attributes: Serialize;

   fn resource_id(&self) -> Uuid;

   fn attributes(&self) -> Self::Attributes;

   fn meta(&self) -> Option<serde_json::Value> {
      None
   }

   fn related(&self) -> Option<serde_json::Value> {
      None
   }
}

/// ドメインオブジェクト 1 件をリソースレコードに変換する
pub fn format_resource<T: ResourceObject>(object: &T) -> ResponseResource<T::Attributes> {
   let mut resource =
      ResponseResource::new(T::RESOURCE_TYPE, object.resource_id(), object.attributes());
   resource.meta = object.meta();
   resource.related = object.related();
   resource
}

/// レスポンス整形時の契約違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
   #[error("単一リソースのレスポンスに対象が存在しません")]
   EmptyResultForSingleton,

   #[error("単一リソースのレスポンスに {count} 件が含まれています")]
   MultipleResultsForSingleton { count: usize },

   #[error("コレクションのレスポンスにページング情報がありません")]
   MissingPagingMetadata,
}

/// モデルのメタデータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelMetadata {
   pub paging: PageMetadata,
}

/// ドメインオブジェクトの列
///
/// [`single`](DomainModel::single) / [`collection`](DomainModel::collection)
/// で構築すれば整形時の契約を満たす。フィールドは公開されているため、
/// 直接構築した値の検証は [`format_response`](DomainModel::format_response) が行う。
#[derive(Debug, Clone, PartialEq)]
pub struct DomainModel<T> {
   pub data: Vec<T>,
   pub meta: Option<ModelMetadata>,
   /// 単一リソースとして出力するか
   pub solo: bool,
}

impl<T> DomainModel<T> {
   pub fn single(object: T) -> Self {
      Self {
         data: vec![object],
         meta: None,
         solo: true,
      }
   }

   pub fn collection(data: Vec<T>, paging: PageMetadata) -> Self {
      Self {
         data,
         meta: Some(ModelMetadata { paging }),
         solo: false,
      }
   }
}

impl<T: ResourceObject> DomainModel<T> {
   /// JSON:API エンベロープに整形する
   pub fn format_response(&self) -> Result<Response<T::Attributes>, FormatError> {
      if self.solo {
         return match self.data.as_slice() {
            [object] => Ok(Response::single(format_resource(object))),
            [] => Err(FormatError::EmptyResultForSingleton),
            many => Err(FormatError::MultipleResultsForSingleton { count: many.len() }),
         };
      }

      let meta = self.meta.ok_or(FormatError::MissingPagingMetadata)?;
      let resources = self.data.iter().map(format_resource).collect();
      Ok(Response::collection(resources, meta.paging))
   }
}
