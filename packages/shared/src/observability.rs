//! # ログ出力の初期化
//!
//! `tracing-subscriber` の初期化を一箇所にまとめる。
//! 出力形式は [`TracingConfig`] で渡す（API では環境変数 `LOG_FORMAT` から読む）。
//! ログレベルは `RUST_LOG` で制御する。
//!
//! 相関 ID は API の Correlation ミドルウェアがスパンフィールドとして載せるため、
//! JSON 形式では各ログ行の `span` に `request_id` が含まれる。

use strum::{Display, EnumString};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,gosk=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
   /// 1 行 1 JSON（本番向け）
   Json,
   /// 人間向けの整形出力（開発向け）
   #[default]
   Pretty,
}

impl LogFormat {
   /// ログ形式をパースする
   ///
   /// 未知の値は [`Pretty`](LogFormat::Pretty) として扱う。
   /// サブスクライバ初期化前に呼ばれるため、警告は stderr に直接書く。
   pub fn parse(s: &str) -> Self {
      s.parse().unwrap_or_else(|_| {
         eprintln!("WARNING: LOG_FORMAT={s:?} は未知の値です。pretty を使います");
         Self::Pretty
      })
   }
}

/// サブスクライバの初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// 起動ログなどに載せるサービス名
   pub service_name:   String,
   pub log_format:     LogFormat,
   /// `RUST_LOG` 未設定時に使うフィルタ
   pub default_filter: String,
}

impl TracingConfig {
   pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
      Self {
         service_name: service_name.into(),
         log_format,
         default_filter: DEFAULT_FILTER.to_string(),
      }
   }

   pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
      self.default_filter = filter.into();
      self
   }
}

/// グローバルサブスクライバを登録する
///
/// 既に登録済みの場合はエラーを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(
   config: &TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
   use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let filter = EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

   let output = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
   };

   tracing_subscriber::registry()
      .with(filter)
      .with(output)
      .try_init()
}
