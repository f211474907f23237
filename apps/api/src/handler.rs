//! # HTTP リクエストハンドラ
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── example.rs  # Example CRUD
//!     └── health.rs   # ヘルスチェック
//! ```

pub mod example;
pub mod health;

pub use example::{
   ExampleState,
   create_example,
   delete_example,
   get_example,
   list_examples,
   update_example,
};
pub use health::health_check;
