//! # 時刻プロバイダ
//!
//! 監査フィールド（`created_on` / `modified_on`）に刻む時刻の取得元。
//! ユースケースは [`Clock`] 経由で時刻を得るため、テストでは [`FixedClock`] を注入できる。

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// システム時刻
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 明示的に進めない限り同じ時刻を返す時計
#[derive(Debug)]
pub struct FixedClock {
   now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を `by` だけ進める
   pub fn advance(&self, by: Duration) {
      let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
      *now += by;
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(PoisonError::into_inner)
   }
}
