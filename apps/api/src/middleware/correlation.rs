//! # Correlation ミドルウェア
//!
//! リクエストごとに相関 ID を決定し、下流で参照できるよう
//! [`TraceContext`] をリクエストスコープの [`RequestLocals`] に保存する。
//!
//! ## 処理の流れ
//!
//! 1. スキップ条件が真ならそのまま次へ渡す
//! 2. 設定されたヘッダーの値を相関 ID とする（欠落・空・非 UTF-8 なら生成する）
//! 3. ヘッダーが無かった場合は、下流に渡すヘッダーにも相関 ID を補う
//! 4. `TraceContext` を設定されたキーで `RequestLocals` に保存する
//! 5. 相関 ID を持つスパン内で後続を実行する
//! 6. レスポンスヘッダーに相関 ID を設定する
//!
//! ## 使用例
//!
//! ```rust,ignore
//! let correlation = CorrelationConfig::default().resolve();
//!
//! let app = Router::new()
//!    .route("/health", get(health_check))
//!    .layer(TraceLayer::new_for_http().make_span_with(make_request_span(correlation.context_key())))
//!    .layer(from_fn_with_state(correlation, correlation_middleware));
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use axum::{
   body::Body,
   extract::State,
   http::{HeaderMap, HeaderName, HeaderValue, Request},
   middleware::Next,
   response::Response,
};
use tracing::{Instrument, Span};
use uuid::Uuid;

/// 相関 ID を運ぶデフォルトのヘッダー名
pub const DEFAULT_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// `RequestLocals` に保存するデフォルトのキー
pub const DEFAULT_CONTEXT_KEY: &str = "trace";

/// 相関 ID の生成関数
pub type Generator = Arc<dyn Fn() -> String + Send + Sync>;

/// ミドルウェアをスキップするかの判定関数
pub type SkipFn = Arc<dyn Fn(&Request<Body>) -> bool + Send + Sync>;

/// Correlation ミドルウェアの設定
///
/// すべて省略可能で、省略した項目は [`resolve`](CorrelationConfig::resolve) でデフォルト値になる。
#[derive(Clone, Default)]
pub struct CorrelationConfig {
   pub context_key: Option<String>,
   pub generator:   Option<Generator>,
   pub header:      Option<HeaderName>,
   pub skip:        Option<SkipFn>,
}

impl CorrelationConfig {
   pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
      self.context_key = Some(key.into());
      self
   }

   pub fn with_generator(mut self, generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
      self.generator = Some(Arc::new(generator));
      self
   }

   pub fn with_header(mut self, header: HeaderName) -> Self {
      self.header = Some(header);
      self
   }

   pub fn with_skip(
      mut self,
      skip: impl Fn(&Request<Body>) -> bool + Send + Sync + 'static,
   ) -> Self {
      self.skip = Some(Arc::new(skip));
      self
   }

   /// 省略された項目をデフォルト値で埋める
   ///
   /// | 項目 | デフォルト |
   /// |------|-----------|
   /// | `context_key` | `"trace"` |
   /// | `generator` | UUID v4 |
   /// | `header` | `x-request-id` |
   /// | `skip` | なし（常に実行） |
   pub fn resolve(self) -> ResolvedCorrelation {
      ResolvedCorrelation {
         context_key: self
            .context_key
            .unwrap_or_else(|| DEFAULT_CONTEXT_KEY.to_string()),
         generator:   self.generator.unwrap_or_else(uuid_v4_generator),
         header:      self.header.unwrap_or(DEFAULT_HEADER),
         skip:        self.skip,
      }
   }
}

fn uuid_v4_generator() -> Generator {
   Arc::new(|| Uuid::new_v4().to_string())
}

impl fmt::Debug for CorrelationConfig {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("CorrelationConfig")
         .field("context_key", &self.context_key)
         .field("generator", &self.generator.as_ref().map(|_| "<fn>"))
         .field("header", &self.header)
         .field("skip", &self.skip.as_ref().map(|_| "<fn>"))
         .finish()
   }
}

/// デフォルト値を適用済みの設定（ミドルウェアの State）
#[derive(Clone)]
pub struct ResolvedCorrelation {
   context_key: String,
   generator:   Generator,
   header:      HeaderName,
   skip:        Option<SkipFn>,
}

impl ResolvedCorrelation {
   pub fn context_key(&self) -> &str {
      &self.context_key
   }

   pub fn header(&self) -> &HeaderName {
      &self.header
   }

   fn should_skip(&self, request: &Request<Body>) -> bool {
      self.skip.as_ref().is_some_and(|skip| skip(request))
   }

   fn generate(&self) -> String {
      (self.generator)()
   }
}

impl fmt::Debug for ResolvedCorrelation {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("ResolvedCorrelation")
         .field("context_key", &self.context_key)
         .field("header", &self.header)
         .field("skip", &self.skip.is_some())
         .finish_non_exhaustive()
   }
}

/// リクエスト単位のトレースコンテキスト
#[derive(Debug, Clone, PartialEq)]
pub struct TraceContext {
   /// 相関 ID を補った受信ヘッダー
   pub headers:    HeaderMap,
   pub request_id: String,
}

/// リクエストスコープの保存領域
///
/// リクエストの extensions に 1 つだけ置かれ、文字列キーで値を引く。
#[derive(Debug, Clone, Default)]
pub struct RequestLocals {
   traces: HashMap<String, TraceContext>,
}

impl RequestLocals {
   pub fn insert_trace(&mut self, key: impl Into<String>, trace: TraceContext) {
      self.traces.insert(key.into(), trace);
   }

   pub fn trace(&self, key: &str) -> Option<&TraceContext> {
      self.traces.get(key)
   }
}

/// 受信ヘッダーから相関 ID を読む（空・非 UTF-8 は無いものとみなす）
fn inbound_request_id(headers: &HeaderMap, header: &HeaderName) -> Option<String> {
   headers
      .get(header)
      .and_then(|value| value.to_str().ok())
      .filter(|value| !value.is_empty())
      .map(str::to_string)
}

/// Correlation ミドルウェア
///
/// `axum::middleware::from_fn_with_state` で [`ResolvedCorrelation`] を State として渡す。
pub async fn correlation_middleware(
   State(config): State<ResolvedCorrelation>,
   mut request: Request<Body>,
   next: Next,
) -> Response {
   if config.should_skip(&request) {
      return next.run(request).await;
   }

   let mut headers = request.headers().clone();
   let inbound = inbound_request_id(&headers, &config.header);
   let generated = inbound.is_none();
   let request_id = inbound.unwrap_or_else(|| config.generate());

   let header_value = HeaderValue::from_str(&request_id).ok();
   if generated && let Some(value) = &header_value {
      headers.insert(config.header.clone(), value.clone());
      request
         .headers_mut()
         .insert(config.header.clone(), value.clone());
   }

   let trace = TraceContext {
      headers,
      request_id: request_id.clone(),
   };
   let extensions = request.extensions_mut();
   match extensions.get_mut::<RequestLocals>() {
      Some(locals) => locals.insert_trace(config.context_key.clone(), trace),
      None => {
         let mut locals = RequestLocals::default();
         locals.insert_trace(config.context_key.clone(), trace);
         extensions.insert(locals);
      }
   }

   let span = tracing::info_span!("correlation", request_id = %request_id);
   let mut response = next.run(request).instrument(span).await;

   match header_value {
      Some(value) => {
         response.headers_mut().insert(config.header.clone(), value);
      }
      None => tracing::warn!(
         request_id = %request_id,
         header = %config.header,
         "相関 ID をヘッダー値にできないため、レスポンスヘッダーを設定しません"
      ),
   }

   response
}

/// `TraceLayer` 用のスパン生成関数を作る
///
/// Correlation ミドルウェアの内側に置くこと。`RequestLocals` から相関 ID を読み、
/// メソッド・URI とともにスパンに記録する。相関 ID が無い場合は `-` を記録する。
pub fn make_request_span<B>(context_key: &str) -> impl Fn(&Request<B>) -> Span + Clone + use<B> {
   let context_key = context_key.to_string();
   move |request: &Request<B>| {
      let request_id = request
         .extensions()
         .get::<RequestLocals>()
         .and_then(|locals| locals.trace(&context_key))
         .map_or("-", |trace| trace.request_id.as_str());

      tracing::info_span!(
         "request",
         method = %request.method(),
         uri = %request.uri(),
         request_id = %request_id,
      )
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_resolve_はデフォルト値で埋める() {
      let resolved = CorrelationConfig::default().resolve();

      assert_eq!(resolved.context_key(), "trace");
      assert_eq!(resolved.header(), &DEFAULT_HEADER);
      assert!(resolved.skip.is_none());

      let id = resolved.generate();
      let uuid = Uuid::parse_str(&id).unwrap();
      assert_eq!(uuid.get_version(), Some(uuid::Version::Random));
   }

   #[test]
   fn test_resolve_は指定された値を優先する() {
      let resolved = CorrelationConfig::default()
         .with_context_key("correlation")
         .with_generator(|| "fixed-id".to_string())
         .with_header(HeaderName::from_static("x-correlation-id"))
         .with_skip(|_| true)
         .resolve();

      assert_eq!(resolved.context_key(), "correlation");
      assert_eq!(resolved.header(), "x-correlation-id");
      assert_eq!(resolved.generate(), "fixed-id");
      assert!(resolved.should_skip(&Request::new(Body::empty())));
   }

   #[test]
   fn test_デフォルトのジェネレータは毎回異なるidを返す() {
      let resolved = CorrelationConfig::default().resolve();

      assert_ne!(resolved.generate(), resolved.generate());
   }

   #[test]
   fn test_受信ヘッダーの空値は無いものとみなす() {
      let mut headers = HeaderMap::new();
      headers.insert(DEFAULT_HEADER, HeaderValue::from_static(""));

      assert_eq!(inbound_request_id(&headers, &DEFAULT_HEADER), None);

      headers.insert(DEFAULT_HEADER, HeaderValue::from_static("abc"));
      assert_eq!(
         inbound_request_id(&headers, &DEFAULT_HEADER),
         Some("abc".to_string())
      );
   }

   #[test]
   fn test_request_localsはキーごとに値を保持する() {
      let mut locals = RequestLocals::default();
      let trace = TraceContext {
         headers:    HeaderMap::new(),
         request_id: "r-1".to_string(),
      };

      locals.insert_trace("trace", trace.clone());

      assert_eq!(locals.trace("trace"), Some(&trace));
      assert_eq!(locals.trace("other"), None);
   }
}
