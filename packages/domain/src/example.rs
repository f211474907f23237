//! # Example リソース
//!
//! スターターキットのサンプルリソース。入力契約（[`ExampleInputData`]）と
//! そのルール宣言、エンティティ（[`ExampleObject`]）、ワイヤ表現
//! （[`ExampleAttributes`]）を定義する。
//!
//! ## 論理削除
//!
//! `deleted` フラグは内部専用。ビジネスロジックからは [`ExampleObject::is_deleted`]
//! で参照できるが、レスポンスの `attributes` には含めない。

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use gosk_shared::{RuleError, RuleSet, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::model::ResourceObject;

define_uuid_id! {
   /// Example の一意識別子
   pub struct ExampleId;
}

/// 作成・更新リクエストのボディ
///
/// 欠落したフィールドと `Option` でないフィールドの `null` はゼロ値で補う。
/// 値の妥当性は [`Validate`] で検証する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleInputData {
   #[serde(deserialize_with = "null_as_default")]
   pub deleted:     bool,
   pub description: Option<String>,
   #[serde(deserialize_with = "null_as_default")]
   pub enabled:     bool,
   pub status:      Option<u32>,
   #[serde(deserialize_with = "null_as_default")]
   pub title:       String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
   D: Deserializer<'de>,
   T: Default + Deserialize<'de>,
{
   Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Validate for ExampleInputData {
   fn rule_set() -> Result<&'static RuleSet, RuleError> {
      static RULES: OnceLock<Result<RuleSet, RuleError>> = OnceLock::new();
      RULES
         .get_or_init(|| {
            RuleSet::new("JSONRequestBody")
               .field("deleted", "omitempty,boolean")?
               .nullable_field("description", "omitempty,min=3,max=999")?
               .field("enabled", "omitempty,boolean")?
               .nullable_field("status", "omitempty,numeric")?
               .field("title", "required,omitempty,min=2,max=255")
         })
         .as_ref()
         .map_err(Clone::clone)
   }
}

/// Example の属性（内部表現）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleObjectAttributes {
   pub id:          ExampleId,
   pub title:       String,
   pub description: Option<String>,
   pub status:      Option<u32>,
   pub enabled:     bool,
   pub deleted:     bool,
   pub created_on:  DateTime<Utc>,
   pub created_by:  u32,
   pub modified_on: Option<DateTime<Utc>>,
   pub modified_by: Option<u32>,
}

/// Example の属性（ワイヤ表現）
///
/// `id` はリソースのトップレベルに出力されるため含めない。`deleted` は内部専用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleAttributes {
   pub title:       String,
   pub description: Option<String>,
   pub status:      Option<u32>,
   pub enabled:     bool,
   pub created_on:  DateTime<Utc>,
   pub created_by:  u32,
   pub modified_on: Option<DateTime<Utc>>,
   pub modified_by: Option<u32>,
}

/// Example エンティティ
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleObject {
   attributes: ExampleObjectAttributes,
   meta:       Option<serde_json::Value>,
   related:    Option<serde_json::Value>,
}

impl ExampleObject {
   /// 入力から新しい Example を作成する
   pub fn create(input: ExampleInputData, actor: u32, now: DateTime<Utc>) -> Self {
      Self::from_attributes(ExampleObjectAttributes {
         id:          ExampleId::new(),
         title:       input.title,
         description: input.description,
         status:      input.status,
         enabled:     input.enabled,
         deleted:     input.deleted,
         created_on:  now,
         created_by:  actor,
         modified_on: None,
         modified_by: None,
      })
   }

   pub fn from_attributes(attributes: ExampleObjectAttributes) -> Self {
      Self {
         attributes,
         meta: None,
         related: None,
      }
   }

   /// 入力の内容で置き換えた新しいインスタンスを返す
   ///
   /// 識別子と作成者情報は変更しない。
   pub fn update(self, input: ExampleInputData, actor: u32, now: DateTime<Utc>) -> Self {
      Self {
         attributes: ExampleObjectAttributes {
            title: input.title,
            description: input.description,
            status: input.status,
            enabled: input.enabled,
            deleted: input.deleted,
            modified_on: Some(now),
            modified_by: Some(actor),
            ..self.attributes
         },
         ..self
      }
   }

   /// 論理削除した新しいインスタンスを返す
   pub fn soft_delete(self, actor: u32, now: DateTime<Utc>) -> Self {
      Self {
         attributes: ExampleObjectAttributes {
            deleted: true,
            modified_on: Some(now),
            modified_by: Some(actor),
            ..self.attributes
         },
         ..self
      }
   }

   pub fn id(&self) -> ExampleId {
      self.attributes.id
   }

   pub fn is_deleted(&self) -> bool {
      self.attributes.deleted
   }

   pub fn object_attributes(&self) -> &ExampleObjectAttributes {
      &self.attributes
   }

   pub fn with_meta(self, meta: serde_json::Value) -> Self {
      Self {
         meta: Some(meta),
         ..self
      }
   }

   pub fn with_related(self, related: serde_json::Value) -> Self {
      Self {
         related: Some(related),
         ..self
      }
   }
}

impl ResourceObject for ExampleObject {
   const RESOURCE_TYPE: &'static str = "example";
   type Attributes = ExampleAttributes;

   fn resource_id(&self) -> Uuid {
      self.attributes.id.into()
   }

   fn attributes(&self) -> ExampleAttributes {
      let a = &self.attributes;
      ExampleAttributes {
         title:       a.title.clone(),
         description: a.description.clone(),
         status:      a.status,
         enabled:     a.enabled,
         created_on:  a.created_on,
         created_by:  a.created_by,
         modified_on: a.modified_on,
         modified_by: a.modified_by,
      }
   }

   fn meta(&self) -> Option<serde_json::Value> {
      self.meta.clone()
   }

   fn related(&self) -> Option<serde_json::Value> {
      self.related.clone()
   }
}

#[cfg(test)]
mod tests {
   use chrono::TimeZone;
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};
   use serde_json::json;

   use super::*;
   use crate::model::{DomainModel, format_resource};

   #[fixture]
   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap()
   }

   #[fixture]
   fn input() -> ExampleInputData {
      ExampleInputData {
         deleted:     false,
         description: Some("説明文".to_string()),
         enabled:     true,
         status:      Some(2),
         title:       "サンプル".to_string(),
      }
   }

   fn tags(input: &ExampleInputData) -> Vec<(String, &'static str)> {
      input
         .validate()
         .unwrap()
         .into_iter()
         .map(|v| (v.field, v.tag))
         .collect()
   }

   // =========================================================================
   // ExampleInputData
   // =========================================================================

   #[rstest]
   fn test_正しい入力は違反なし(input: ExampleInputData) {
      assert!(input.validate().unwrap().is_empty());
   }

   #[test]
   fn test_欠落したフィールドはゼロ値になる() {
      let input: ExampleInputData = serde_json::from_value(json!({ "title": "ab" })).unwrap();

      assert_eq!(
         input,
         ExampleInputData {
            title: "ab".to_string(),
            ..Default::default()
         }
      );
   }

   #[test]
   fn test_nullはOptionでないフィールドでゼロ値になる() {
      let input: ExampleInputData = serde_json::from_value(json!({
         "deleted": null,
         "enabled": null,
         "title": null,
      }))
      .unwrap();

      assert_eq!(input, ExampleInputData::default());
      assert_eq!(tags(&input), vec![("title".to_string(), "required")]);
   }

   #[test]
   fn test_空のボディはtitleのrequiredだけが違反する() {
      assert_eq!(
         tags(&ExampleInputData::default()),
         vec![("title".to_string(), "required")]
      );
   }

   #[rstest]
   fn test_titleが1文字ならminに違反する(input: ExampleInputData) {
      let input = ExampleInputData {
         title: "a".to_string(),
         ..input
      };

      let violations = input.validate().unwrap();

      assert_eq!(violations.len(), 1);
      assert_eq!(violations[0].namespace, "JSONRequestBody.title");
      assert_eq!(violations[0].tag, "min");
      assert_eq!(violations[0].param, "2");
   }

   #[rstest]
   fn test_複数フィールドの違反を宣言順にすべて返す(input: ExampleInputData) {
      let input = ExampleInputData {
         description: Some("x".repeat(1000)),
         title: "a".to_string(),
         ..input
      };

      assert_eq!(
         tags(&input),
         vec![
            ("description".to_string(), "max"),
            ("title".to_string(), "min"),
         ]
      );
   }

   #[rstest]
   fn test_空文字列のdescriptionはminに違反する(input: ExampleInputData) {
      let input = ExampleInputData {
         description: Some(String::new()),
         ..input
      };

      let violations = input.validate().unwrap();

      assert_eq!(violations.len(), 1);
      assert_eq!(violations[0].field, "description");
      assert_eq!(violations[0].tag, "min");
      assert_eq!(violations[0].param, "3");
   }

   #[rstest]
   fn test_descriptionとstatusの省略は違反にならない(input: ExampleInputData) {
      let input = ExampleInputData {
         description: None,
         status: None,
         ..input
      };

      assert!(input.validate().unwrap().is_empty());
   }

   #[rstest]
   fn test_status0は値として受け付ける(input: ExampleInputData) {
      let input = ExampleInputData {
         status: Some(0),
         ..input
      };

      assert!(input.validate().unwrap().is_empty());
   }

   #[test]
   fn test_ルールセットは一度だけ構築される() {
      let first = ExampleInputData::rule_set().unwrap();
      let second = ExampleInputData::rule_set().unwrap();

      assert!(std::ptr::eq(first, second));
      assert_eq!(first.container(), "JSONRequestBody");
      assert_eq!(first.fields().len(), 5);
   }

   // =========================================================================
   // ExampleObject
   // =========================================================================

   #[rstest]
   fn test_createで作成者情報が設定される(input: ExampleInputData, now: DateTime<Utc>) {
      let object = ExampleObject::create(input, 7, now);
      let attributes = object.object_attributes();

      assert_eq!(attributes.title, "サンプル");
      assert_eq!(attributes.created_on, now);
      assert_eq!(attributes.created_by, 7);
      assert_eq!(attributes.modified_on, None);
      assert_eq!(attributes.modified_by, None);
      assert!(!object.is_deleted());
   }

   #[rstest]
   fn test_updateで識別子を保ち更新者情報が設定される(
      input: ExampleInputData,
      now: DateTime<Utc>,
   ) {
      let object = ExampleObject::create(input.clone(), 7, now);
      let id = object.id();
      let later = now + chrono::Duration::hours(1);

      let updated = object.update(
         ExampleInputData {
            title: "更新後".to_string(),
            description: None,
            ..input
         },
         9,
         later,
      );

      let attributes = updated.object_attributes();
      assert_eq!(updated.id(), id);
      assert_eq!(attributes.title, "更新後");
      assert_eq!(attributes.description, None);
      assert_eq!(attributes.created_by, 7);
      assert_eq!(attributes.modified_on, Some(later));
      assert_eq!(attributes.modified_by, Some(9));
   }

   #[rstest]
   fn test_soft_deleteで削除フラグが立つ(input: ExampleInputData, now: DateTime<Utc>) {
      let object = ExampleObject::create(input, 7, now).soft_delete(3, now);

      assert!(object.is_deleted());
      assert_eq!(object.object_attributes().modified_by, Some(3));
   }

   // =========================================================================
   // ResourceObject
   // =========================================================================

   #[rstest]
   fn test_リソースレコードはidを外に出し削除フラグを含めない(
      input: ExampleInputData,
      now: DateTime<Utc>,
   ) {
      let object = ExampleObject::create(input, 7, now).soft_delete(7, now);

      let json = serde_json::to_value(format_resource(&object)).unwrap();

      assert_eq!(json["type"], "example");
      assert_eq!(json["id"], object.id().to_string());
      assert_eq!(
         json["attributes"],
         json!({
            "title": "サンプル",
            "description": "説明文",
            "status": 2,
            "enabled": true,
            "created_on": "2026-01-15T09:30:00Z",
            "created_by": 7,
            "modified_on": "2026-01-15T09:30:00Z",
            "modified_by": 7
         })
      );
   }

   #[rstest]
   fn test_nullableな属性はnullとして出力する(now: DateTime<Utc>) {
      let object = ExampleObject::create(
         ExampleInputData {
            title: "ab".to_string(),
            ..Default::default()
         },
         0,
         now,
      );

      let json = serde_json::to_value(format_resource(&object)).unwrap();

      assert_eq!(json["attributes"]["description"], json!(null));
      assert_eq!(json["attributes"]["status"], json!(null));
      assert_eq!(json["attributes"]["modified_on"], json!(null));
      assert_eq!(json["attributes"]["modified_by"], json!(null));
   }

   #[rstest]
   fn test_サイドチャネルはリソースレコードに載る(
      input: ExampleInputData,
      now: DateTime<Utc>,
   ) {
      let object = ExampleObject::create(input, 0, now)
         .with_meta(json!({ "revision": 1 }))
         .with_related(json!({ "owner": "u-1" }));

      let response = DomainModel::single(object).format_response().unwrap();
      let json = serde_json::to_value(response).unwrap();

      assert_eq!(json["data"]["meta"], json!({ "revision": 1 }));
      assert_eq!(json["data"]["related"], json!({ "owner": "u-1" }));
   }
}
