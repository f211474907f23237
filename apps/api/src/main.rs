//! # gosk API サーバー
//!
//! ## 環境変数
//!
//! [`ApiConfig`](gosk_api::config::ApiConfig) を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p gosk-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use gosk_api::{
   app,
   config::ApiConfig,
   handler::ExampleState,
   middleware::CorrelationConfig,
   repository::InMemoryExampleRepository,
   usecase::ExampleUseCaseImpl,
};
use gosk_domain::clock::SystemClock;
use gosk_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let config = ApiConfig::from_env()?;

   let tracing_config = TracingConfig::new("gosk-api", config.log_format);
   init_tracing(&tracing_config)?;

   let correlation = CorrelationConfig::default()
      .with_header(config.request_id_header.clone())
      .resolve();

   let state = Arc::new(ExampleState {
      usecase:     ExampleUseCaseImpl::new(
         Arc::new(InMemoryExampleRepository::new()),
         Arc::new(SystemClock),
      ),
      context_key: correlation.context_key().to_string(),
   });

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .with_context(|| format!("アドレスのパースに失敗しました: {}:{}", config.host, config.port))?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!(service = %tracing_config.service_name, %addr, "API サーバーが起動しました");

   axum::serve(listener, app(state, correlation)).await?;

   Ok(())
}
