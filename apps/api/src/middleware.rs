//! # ミドルウェア
//!
//! - [`correlation`]: 相関 ID（Request ID）の付与・伝播とリクエストスコープのトレースコンテキスト

pub mod correlation;

pub use correlation::{
   CorrelationConfig,
   RequestLocals,
   ResolvedCorrelation,
   TraceContext,
   correlation_middleware,
   make_request_span,
};
