//! # ルール宣言
//!
//! `"required,omitempty,min=2,max=255"` 形式の宣言を [`Rule`] の列にパースする。
//! 宣言の誤り（未知のタグ、パラメータ不足など）は [`RuleError`] として返し、
//! 入力値のバリデーションエラーとは区別する。

use std::fmt;

use super::RuleError;

/// 1 つのフィールドルール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
   /// 値が空（ゼロ値）であってはならない
   Required,
   /// 値が空ならば以降のルールを評価しない
   OmitEmpty,
   /// 最小値（文字列は文字数、配列・オブジェクトは要素数）
   Min(u64),
   /// 最大値（文字列は文字数、配列・オブジェクトは要素数）
   Max(u64),
   /// 数値、または数値として解釈できる文字列
   Numeric,
   /// 真偽値、または真偽値として解釈できる文字列
   Boolean,
}

impl Rule {
   /// 小文字のタグ名
   pub fn tag(&self) -> &'static str {
      match self {
         Self::Required => "required",
         Self::OmitEmpty => "omitempty",
         Self::Min(_) => "min",
         Self::Max(_) => "max",
         Self::Numeric => "numeric",
         Self::Boolean => "boolean",
      }
   }

   /// パラメータの文字列表現（パラメータを持たないルールは空文字列）
   pub fn param(&self) -> String {
      match self {
         Self::Min(n) | Self::Max(n) => n.to_string(),
         _ => String::new(),
      }
   }

   /// ルール宣言を 1 つパースする
   ///
   /// ```
   /// use gosk_shared::Rule;
   ///
   /// assert_eq!(Rule::parse("min=2").unwrap(), Rule::Min(2));
   /// assert_eq!(Rule::parse("required").unwrap(), Rule::Required);
   /// assert!(Rule::parse("min").is_err());
   /// ```
   pub fn parse(declaration: &str) -> Result<Self, RuleError> {
      let declaration = declaration.trim();
      if declaration.is_empty() {
         return Err(RuleError::EmptyDeclaration);
      }

      let (tag, param) = match declaration.split_once('=') {
         Some((tag, param)) => (tag.trim(), Some(param.trim())),
         None => (declaration, None),
      };

      match (tag, param) {
         ("required", None) => Ok(Self::Required),
         ("omitempty", None) => Ok(Self::OmitEmpty),
         ("numeric", None) => Ok(Self::Numeric),
         ("boolean", None) => Ok(Self::Boolean),
         ("min", Some(param)) => parse_bound(tag, param).map(Self::Min),
         ("max", Some(param)) => parse_bound(tag, param).map(Self::Max),
         ("min" | "max", None) => Err(RuleError::MissingParam {
            tag: tag.to_string(),
         }),
         ("required" | "omitempty" | "numeric" | "boolean", Some(param)) => {
            Err(RuleError::UnexpectedParam {
               tag:   tag.to_string(),
               param: param.to_string(),
            })
         }
         (other, _) => Err(RuleError::UnknownRule {
            tag: other.to_string(),
         }),
      }
   }
}

impl fmt::Display for Rule {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Self::Min(n) | Self::Max(n) => write!(f, "{}={n}", self.tag()),
         _ => f.write_str(self.tag()),
      }
   }
}

fn parse_bound(tag: &str, param: &str) -> Result<u64, RuleError> {
   param.parse().map_err(|_| RuleError::InvalidParam {
      tag:   tag.to_string(),
      param: param.to_string(),
   })
}

/// 1 フィールド分のルール宣言
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
   /// リクエストボディ上のフィールド名
   pub field:    String,
   /// 評価順のルール列
   pub rules:    Vec<Rule>,
   /// `null` 許容のフィールドか
   ///
   /// 真の場合、空とみなすのは欠落と `null` のみ（`""` や `0` は値として評価する）。
   pub nullable: bool,
}

impl FieldRules {
   /// カンマ区切りのルール宣言をパースする
   pub fn parse(field: impl Into<String>, declarations: &str) -> Result<Self, RuleError> {
      let rules = declarations
         .split(',')
         .map(Rule::parse)
         .collect::<Result<Vec<_>, _>>()?;

      Ok(Self {
         field: field.into(),
         rules,
         nullable: false,
      })
   }

   /// `null` 許容として扱う
   pub fn nullable(self) -> Self {
      Self {
         nullable: true,
         ..self
      }
   }
}
