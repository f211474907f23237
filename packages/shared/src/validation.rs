//! # 宣言的フィールドバリデーション
//!
//! リクエストボディのフィールドごとにルール列を宣言し、汎用のインタプリタで評価する。
//! リフレクションやタグ文字列の実行時解析に頼らず、ルールはデータ構造として保持する。
//!
//! ## 構成
//!
//! - [`Rule`] / [`FieldRules`]: ルール宣言とそのパース
//! - [`RuleSet`]: フィールド名 → ルール列の順序付き集合と評価
//! - [`Validate`]: リクエストボディ型がルールセットを提供するためのトレイト
//!
//! ## エラーの区別
//!
//! 評価結果の違反（[`FieldViolation`]）はユーザー入力の誤りであり、
//! [`RuleError`] はルール宣言そのものの誤り（プログラミング・設定の誤り）である。
//! 呼び出し側は後者を 400 ではなく内部エラーとして扱うこと。

mod engine;
mod rule;

pub use engine::{FieldViolation, RuleSet};
pub use rule::{FieldRules, Rule};
use serde::Serialize;
use thiserror::Error;

/// ルール宣言の誤り、またはルールエンジンを起動できない状態
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
   #[error("空のルール宣言があります")]
   EmptyDeclaration,

   #[error("未知のルールです: {tag}")]
   UnknownRule { tag: String },

   #[error("ルール {tag} にはパラメータが必要です")]
   MissingParam { tag: String },

   #[error("ルール {tag} のパラメータが不正です: {param}")]
   InvalidParam { tag: String, param: String },

   #[error("ルール {tag} はパラメータを取りません: {param}")]
   UnexpectedParam { tag: String, param: String },

   #[error("フィールド {field} のルールが二重に宣言されています")]
   DuplicateField { field: String },

   #[error("ルール {tag} は {kind} 型のフィールド {field} に適用できません")]
   InapplicableRule {
      field: String,
      tag:   String,
      kind:  &'static str,
   },

   #[error("{container} は JSON オブジェクトではありません")]
   NotAnObject { container: String },

   #[error("評価対象のシリアライズに失敗しました: {0}")]
   Serialize(String),
}

/// ルールセットを持つリクエストボディ
///
/// 実装側はルールセットを一度だけ構築してキャッシュする（`OnceLock` など）。
///
/// ```
/// use std::sync::OnceLock;
///
/// use gosk_shared::{RuleError, RuleSet, Validate};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Body {
///    title: String,
/// }
///
/// impl Validate for Body {
///    fn rule_set() -> Result<&'static RuleSet, RuleError> {
///       static RULES: OnceLock<Result<RuleSet, RuleError>> = OnceLock::new();
///       RULES
///          .get_or_init(|| RuleSet::new("Body").field("title", "required"))
///          .as_ref()
///          .map_err(Clone::clone)
///    }
/// }
///
/// let violations = Body { title: String::new() }.validate()?;
/// assert_eq!(violations[0].tag, "required");
/// # Ok::<(), RuleError>(())
/// ```
pub trait Validate: Serialize {
   /// このボディ型に宣言されたルールセット
   fn rule_set() -> Result<&'static RuleSet, RuleError>;

   /// 全フィールドを評価し、全違反を返す
   fn validate(&self) -> Result<Vec<FieldViolation>, RuleError>
   where
      Self: Sized,
   {
      let rules = Self::rule_set()?;
      let value =
         serde_json::to_value(self).map_err(|e| RuleError::Serialize(e.to_string()))?;
      rules.evaluate(&value)
   }
}
