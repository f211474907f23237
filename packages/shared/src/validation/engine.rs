//! # ルールエンジン
//!
//! [`RuleSet`] に宣言されたルールを JSON オブジェクトに対して評価する。
//!
//! ## 評価規則
//!
//! - 全フィールドを宣言順に評価する（最初の違反で打ち切らない）
//! - 1 フィールド内ではルールを宣言順に評価し、最初に違反したルールで打ち切る
//! - `omitempty` は値が空ならそのフィールドの評価を終える
//! - 空とみなす値: 欠落、`null`、`""`、`false`、`0`、空配列、空オブジェクト
//! - `null` 許容のフィールド（[`RuleSet::nullable_field`]）は欠落と `null` だけを空とみなす

use serde_json::{Map, Value};

use super::{FieldRules, Rule, RuleError};

/// 違反 1 件（フィールドとルールの組）
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
   /// `<コンテナ名>.<フィールド名>` 形式のパス
   pub namespace: String,
   /// 宣言されたフィールド名
   pub field:     String,
   /// 違反したルールのタグ
   pub tag:       &'static str,
   /// 違反したルールのパラメータ（無い場合は空文字列）
   pub param:     String,
   /// 評価した値（欠落は `null`）
   pub value:     Value,
}

/// フィールドルールの集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
   container: String,
   fields:    Vec<FieldRules>,
}

impl RuleSet {
   /// 空のルールセットを作成する
   ///
   /// `container` は違反の namespace の先頭セグメントになる。
   pub fn new(container: impl Into<String>) -> Self {
      Self {
         container: container.into(),
         fields:    Vec::new(),
      }
   }

   /// フィールドのルール宣言を追加する
   ///
   /// ```
   /// use gosk_shared::RuleSet;
   ///
   /// let rules = RuleSet::new("JSONRequestBody")
   ///    .field("title", "required,min=2")?
   ///    .field("status", "omitempty,numeric")?;
   /// assert_eq!(rules.fields().len(), 2);
   /// # Ok::<(), gosk_shared::RuleError>(())
   /// ```
   pub fn field(self, name: &str, declarations: &str) -> Result<Self, RuleError> {
      self.push(FieldRules::parse(name, declarations)?)
   }

   /// `null` 許容フィールドのルール宣言を追加する
   ///
   /// `Option` で受けるフィールドに使う。`omitempty` / `required` は値の有無だけを見るため、
   /// `""` は省略扱いにならず長さ 0 の文字列として `min` などで評価される。
   pub fn nullable_field(self, name: &str, declarations: &str) -> Result<Self, RuleError> {
      self.push(FieldRules::parse(name, declarations)?.nullable())
   }

   fn push(mut self, field_rules: FieldRules) -> Result<Self, RuleError> {
      if self.fields.iter().any(|f| f.field == field_rules.field) {
         return Err(RuleError::DuplicateField {
            field: field_rules.field,
         });
      }
      self.fields.push(field_rules);
      Ok(self)
   }

   pub fn container(&self) -> &str {
      &self.container
   }

   pub fn fields(&self) -> &[FieldRules] {
      &self.fields
   }

   /// JSON オブジェクトを評価し、全違反を返す
   pub fn evaluate(&self, body: &Value) -> Result<Vec<FieldViolation>, RuleError> {
      let object = body.as_object().ok_or_else(|| RuleError::NotAnObject {
         container: self.container.clone(),
      })?;

      let mut violations = Vec::new();
      for field_rules in &self.fields {
         if let Some(violation) = self.evaluate_field(object, field_rules)? {
            violations.push(violation);
         }
      }
      Ok(violations)
   }

   fn evaluate_field(
      &self,
      object: &Map<String, Value>,
      field_rules: &FieldRules,
   ) -> Result<Option<FieldViolation>, RuleError> {
      let value = object.get(&field_rules.field).unwrap_or(&Value::Null);
      let empty = if field_rules.nullable {
         value.is_null()
      } else {
         is_empty(value)
      };

      for rule in &field_rules.rules {
         let satisfied = match rule {
            Rule::OmitEmpty => {
               if empty {
                  return Ok(None);
               }
               true
            }
            Rule::Required => !empty,
            Rule::Min(bound) => {
               measure(value, rule, &field_rules.field)?.is_some_and(|m| m >= *bound as f64)
            }
            Rule::Max(bound) => {
               measure(value, rule, &field_rules.field)?.is_some_and(|m| m <= *bound as f64)
            }
            Rule::Numeric => is_numeric(value),
            Rule::Boolean => is_boolean(value),
         };

         if !satisfied {
            return Ok(Some(FieldViolation {
               namespace: format!("{}.{}", self.container, field_rules.field),
               field:     field_rules.field.clone(),
               tag:       rule.tag(),
               param:     rule.param(),
               value:     value.clone(),
            }));
         }
      }
      Ok(None)
   }
}

fn is_empty(value: &Value) -> bool {
   match value {
      Value::Null => true,
      Value::Bool(b) => !b,
      Value::Number(n) => n.as_f64() == Some(0.0),
      Value::String(s) => s.is_empty(),
      Value::Array(a) => a.is_empty(),
      Value::Object(o) => o.is_empty(),
   }
}

/// `min` / `max` の比較対象となる量を求める
///
/// `null` は比較できる量を持たないため `None`（違反扱い）。
/// 真偽値に長さ・大小は定義できないため宣言の誤りとする。
fn measure(value: &Value, rule: &Rule, field: &str) -> Result<Option<f64>, RuleError> {
   match value {
      Value::Null => Ok(None),
      Value::String(s) => Ok(Some(s.chars().count() as f64)),
      Value::Number(n) => Ok(n.as_f64()),
      Value::Array(a) => Ok(Some(a.len() as f64)),
      Value::Object(o) => Ok(Some(o.len() as f64)),
      Value::Bool(_) => Err(RuleError::InapplicableRule {
         field: field.to_string(),
         tag:   rule.tag().to_string(),
         kind:  "boolean",
      }),
   }
}

fn is_numeric(value: &Value) -> bool {
   match value {
      Value::Number(_) => true,
      Value::String(s) => is_numeric_str(s),
      _ => false,
   }
}

/// 符号付きの整数または小数（指数表記は受け付けない）
fn is_numeric_str(s: &str) -> bool {
   let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
   let (int_part, frac_part) = match unsigned.split_once('.') {
      Some((int_part, frac_part)) => (int_part, Some(frac_part)),
      None => (unsigned, None),
   };
   let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

   all_digits(int_part) && frac_part.is_none_or(all_digits)
}

fn is_boolean(value: &Value) -> bool {
   match value {
      Value::Bool(_) => true,
      Value::String(s) => matches!(
         s.as_str(),
         "1" | "t" | "T" | "true" | "TRUE" | "True" | "0" | "f" | "F" | "false" | "FALSE" | "False"
      ),
      _ => false,
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::json;

   use super::*;

   fn title_rules() -> RuleSet {
      RuleSet::new("JSONRequestBody")
         .field("title", "required,omitempty,min=2,max=255")
         .unwrap()
   }

   fn tags(violations: &[FieldViolation]) -> Vec<(&str, &str)> {
      violations
         .iter()
         .map(|v| (v.field.as_str(), v.tag))
         .collect()
   }

   #[test]
   fn test_違反が無い場合は空を返す() {
      let violations = title_rules().evaluate(&json!({ "title": "ok" })).unwrap();

      assert!(violations.is_empty());
   }

   #[rstest]
   #[case(json!({}))]
   #[case(json!({ "title": null }))]
   #[case(json!({ "title": "" }))]
   fn test_required_は空の値で違反する(#[case] body: Value) {
      let violations = title_rules().evaluate(&body).unwrap();

      assert_eq!(tags(&violations), vec![("title", "required")]);
   }

   #[test]
   fn test_1フィールドにつき最初の違反だけを返す() {
      let rules = RuleSet::new("JSONRequestBody")
         .field("code", "min=5,numeric")
         .unwrap();

      let violations = rules.evaluate(&json!({ "code": "ab" })).unwrap();

      assert_eq!(tags(&violations), vec![("code", "min")]);
      assert_eq!(violations[0].param, "5");
   }

   #[test]
   fn test_全フィールドを宣言順に評価する() {
      let rules = RuleSet::new("JSONRequestBody")
         .field("title", "required,min=2")
         .unwrap()
         .field("description", "omitempty,max=3")
         .unwrap();

      let violations = rules
         .evaluate(&json!({ "description": "long", "title": "a" }))
         .unwrap();

      assert_eq!(
         tags(&violations),
         vec![("title", "min"), ("description", "max")]
      );
      assert_eq!(violations[0].namespace, "JSONRequestBody.title");
      assert_eq!(violations[1].namespace, "JSONRequestBody.description");
   }

   #[rstest]
   #[case(json!(false))]
   #[case(json!(0))]
   #[case(json!(null))]
   fn test_omitempty_は空の値で以降のルールを評価しない(#[case] value: Value) {
      let rules = RuleSet::new("JSONRequestBody")
         .field("flag", "omitempty,min=10")
         .unwrap();

      let violations = rules.evaluate(&json!({ "flag": value })).unwrap();

      assert!(violations.is_empty());
   }

   #[test]
   fn test_null許容フィールドの空文字列はomitemptyで省略されない() {
      let rules = RuleSet::new("JSONRequestBody")
         .nullable_field("description", "omitempty,min=3")
         .unwrap();

      let violations = rules.evaluate(&json!({ "description": "" })).unwrap();

      assert_eq!(tags(&violations), vec![("description", "min")]);
      assert_eq!(violations[0].value, json!(""));
   }

   #[rstest]
   #[case(json!({}))]
   #[case(json!({ "description": null }))]
   fn test_null許容フィールドは欠落とnullだけを空とみなす(#[case] body: Value) {
      let rules = RuleSet::new("JSONRequestBody")
         .nullable_field("description", "omitempty,min=3")
         .unwrap();

      assert!(rules.evaluate(&body).unwrap().is_empty());
   }

   #[rstest]
   #[case(json!({ "status": 0 }), true)]
   #[case(json!({ "status": null }), false)]
   fn test_null許容フィールドのrequiredは値の有無だけを見る(
      #[case] body: Value,
      #[case] satisfied: bool,
   ) {
      let rules = RuleSet::new("JSONRequestBody")
         .nullable_field("status", "required")
         .unwrap();

      assert_eq!(rules.evaluate(&body).unwrap().is_empty(), satisfied);
   }

   #[test]
   fn test_min_max_は文字数で比較する() {
      let rules = RuleSet::new("JSONRequestBody")
         .field("title", "min=2,max=3")
         .unwrap();

      // マルチバイト文字もバイト数ではなく文字数で数える
      assert!(rules.evaluate(&json!({ "title": "稟議" })).unwrap().is_empty());
      assert_eq!(
         tags(&rules.evaluate(&json!({ "title": "稟議書類" })).unwrap()),
         vec![("title", "max")]
      );
   }

   #[test]
   fn test_min_max_は数値を値で比較する() {
      let rules = RuleSet::new("JSONRequestBody")
         .field("count", "min=1,max=10")
         .unwrap();

      assert!(rules.evaluate(&json!({ "count": 10 })).unwrap().is_empty());
      assert_eq!(
         tags(&rules.evaluate(&json!({ "count": 11 })).unwrap()),
         vec![("count", "max")]
      );
   }

   #[test]
   fn test_min_を真偽値に適用すると宣言エラーになる() {
      let rules = RuleSet::new("JSONRequestBody")
         .field("enabled", "min=1")
         .unwrap();

      let error = rules.evaluate(&json!({ "enabled": true })).unwrap_err();

      assert_eq!(
         error,
         RuleError::InapplicableRule {
            field: "enabled".to_string(),
            tag:   "min".to_string(),
            kind:  "boolean",
         }
      );
   }

   #[rstest]
   #[case(json!(42), true)]
   #[case(json!("42"), true)]
   #[case(json!("-1.5"), true)]
   #[case(json!("1e5"), false)]
   #[case(json!("1."), false)]
   #[case(json!("abc"), false)]
   #[case(json!(true), false)]
   fn test_numeric_の判定(#[case] value: Value, #[case] expected: bool) {
      assert_eq!(is_numeric(&value), expected);
   }

   #[rstest]
   #[case(json!(true), true)]
   #[case(json!("false"), true)]
   #[case(json!("T"), true)]
   #[case(json!("yes"), false)]
   #[case(json!(1), false)]
   fn test_boolean_の判定(#[case] value: Value, #[case] expected: bool) {
      assert_eq!(is_boolean(&value), expected);
   }

   #[test]
   fn test_オブジェクト以外はエラーになる() {
      let error = title_rules().evaluate(&json!(["title"])).unwrap_err();

      assert_eq!(
         error,
         RuleError::NotAnObject {
            container: "JSONRequestBody".to_string(),
         }
      );
   }

   #[test]
   fn test_同じフィールドの二重宣言はエラーになる() {
      let error = RuleSet::new("JSONRequestBody")
         .field("title", "required")
         .unwrap()
         .field("title", "min=2")
         .unwrap_err();

      assert_eq!(
         error,
         RuleError::DuplicateField {
            field: "title".to_string(),
         }
      );
   }

   #[test]
   fn test_null許容フィールドも二重宣言はエラーになる() {
      let error = RuleSet::new("JSONRequestBody")
         .field("status", "numeric")
         .unwrap()
         .nullable_field("status", "omitempty,numeric")
         .unwrap_err();

      assert_eq!(
         error,
         RuleError::DuplicateField {
            field: "status".to_string(),
         }
      );
   }
}
