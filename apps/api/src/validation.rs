//! # バリデーションアダプタ
//!
//! ルールエンジンの違反一覧を JSON:API のエラーレコードへ変換する。
//!
//! - 違反が無ければ `Ok(())`（処理を続行してよい）
//! - 違反があれば違反 1 件につき 1 つの [`ErrorData`] を評価順に並べて返す
//! - ルール宣言の誤りは入力エラーではないため [`ValidationFailure::Engine`] として区別する

use gosk_shared::{ErrorData, ErrorResponse, FieldViolation, RuleError, Validate};

/// バリデーションの失敗
#[derive(Debug)]
pub enum ValidationFailure {
   /// 入力値がルールに違反した（400）
   Rejected(ErrorResponse),
   /// ルールエンジンを実行できなかった（500）
   Engine(RuleError),
}

/// リクエストボディを検証する
pub fn validate_body<T: Validate>(body: &T) -> Result<(), ValidationFailure> {
   let violations = body.validate().map_err(ValidationFailure::Engine)?;
   if violations.is_empty() {
      return Ok(());
   }

   tracing::error!(?violations, "リクエストボディのバリデーションに失敗しました");

   let errors = violations.iter().map(to_error_data).collect();
   Err(ValidationFailure::Rejected(ErrorResponse::new(errors)))
}

fn to_error_data(violation: &FieldViolation) -> ErrorData {
   ErrorData::validation(
      format_pointer(&violation.namespace),
      format_error_detail(&violation.field, &violation.param, violation.tag),
   )
}

/// 名前空間を JSON Pointer に変換する
///
/// 最外側のコンテナ名を除き、各セグメントを小文字にして `/` で連結する。
///
/// ```
/// use gosk_api::validation::format_pointer;
///
/// assert_eq!(format_pointer("JSONRequestBody.Title"), "/title");
/// assert_eq!(format_pointer("JSONRequestBody.Data.Title"), "/data/title");
/// ```
pub fn format_pointer(namespace: &str) -> String {
   let mut pointer = String::new();
   for segment in namespace.split('.').skip(1) {
      pointer.push('/');
      pointer.push_str(&segment.to_lowercase());
   }
   pointer
}

/// ルール種別ごとのエラーメッセージを組み立てる
pub fn format_error_detail(field: &str, param: &str, tag: &str) -> String {
   let field = field.to_lowercase();
   let tag = tag.to_lowercase();

   match tag.as_str() {
      "max" => format!("'{field}' field must contain a maximum of {param} characters"),
      "min" => format!("'{field}' field must contain at least {param} characters"),
      "required" => format!("'{field}' field is required"),
      _ => format!("validation error on field '{field}' with tag '{tag}'"),
   }
}
