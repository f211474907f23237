//! # ユースケース層
//!
//! ハンドラとリポジトリの間でビジネスロジックを実行する。

pub mod example;

pub use example::ExampleUseCaseImpl;
