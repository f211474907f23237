//! # リポジトリ
//!
//! Example の永続化を抽象化するトレイトと、インメモリ実装。
//!
//! 永続化とページングの計算はこのサービスの外側の責務とし、
//! ここではトレイト境界の背後に差し替え可能な実装を置く。

use async_trait::async_trait;
use gosk_domain::example::{ExampleId, ExampleObject};
use tokio::sync::RwLock;

/// Example リポジトリ
#[async_trait]
pub trait ExampleRepository: Send + Sync {
   async fn insert(&self, example: &ExampleObject) -> anyhow::Result<()>;

   /// ID で検索する（論理削除済みも返す）
   async fn find_by_id(&self, id: &ExampleId) -> anyhow::Result<Option<ExampleObject>>;

   /// 論理削除されていない Example を挿入順に取得する
   ///
   /// 戻り値は `(ページ内の Example, 論理削除されていない全件数)`。
   async fn list(&self, limit: u64, offset: u64) -> anyhow::Result<(Vec<ExampleObject>, u64)>;

   /// 既存の Example を置き換える
   async fn update(&self, example: &ExampleObject) -> anyhow::Result<()>;
}

/// インメモリ実装（挿入順を保持する）
#[derive(Debug, Default)]
pub struct InMemoryExampleRepository {
   examples: RwLock<Vec<ExampleObject>>,
}

impl InMemoryExampleRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl ExampleRepository for InMemoryExampleRepository {
   async fn insert(&self, example: &ExampleObject) -> anyhow::Result<()> {
      let mut examples = self.examples.write().await;
      if examples.iter().any(|e| e.id() == example.id()) {
         anyhow::bail!("Example が既に存在します: {}", example.id());
      }
      examples.push(example.clone());
      Ok(())
   }

   async fn find_by_id(&self, id: &ExampleId) -> anyhow::Result<Option<ExampleObject>> {
      let examples = self.examples.read().await;
      Ok(examples.iter().find(|e| e.id() == *id).cloned())
   }

   async fn list(&self, limit: u64, offset: u64) -> anyhow::Result<(Vec<ExampleObject>, u64)> {
      let examples = self.examples.read().await;
      let live = examples.iter().filter(|e| !e.is_deleted());

      let total = live.clone().count() as u64;
      let page = live
         .skip(usize::try_from(offset)?)
         .take(usize::try_from(limit)?)
         .cloned()
         .collect();

      Ok((page, total))
   }

   async fn update(&self, example: &ExampleObject) -> anyhow::Result<()> {
      let mut examples = self.examples.write().await;
      let slot = examples
         .iter_mut()
         .find(|e| e.id() == example.id())
         .ok_or_else(|| anyhow::anyhow!("更新対象の Example が存在しません: {}", example.id()))?;
      *slot = example.clone();
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use chrono::Utc;
   use gosk_domain::example::ExampleInputData;
   use pretty_assertions::assert_eq;

   use super::*;

   fn example(title: &str) -> ExampleObject {
      ExampleObject::create(
         ExampleInputData {
            title: title.to_string(),
            ..Default::default()
         },
         0,
         Utc::now(),
      )
   }

   fn titles(examples: &[ExampleObject]) -> Vec<&str> {
      examples
         .iter()
         .map(|e| e.object_attributes().title.as_str())
         .collect()
   }

   #[tokio::test]
   async fn test_listは挿入順にページを返す() {
      let repository = InMemoryExampleRepository::new();
      for title in ["a", "b", "c", "d"] {
         repository.insert(&example(title)).await.unwrap();
      }

      let (page, total) = repository.list(2, 1).await.unwrap();

      assert_eq!(titles(&page), vec!["b", "c"]);
      assert_eq!(total, 4);
   }

   #[tokio::test]
   async fn test_listは論理削除済みを含めない() {
      let repository = InMemoryExampleRepository::new();
      let kept = example("kept");
      let removed = example("removed");
      repository.insert(&kept).await.unwrap();
      repository.insert(&removed).await.unwrap();

      repository
         .update(&removed.soft_delete(0, Utc::now()))
         .await
         .unwrap();

      let (page, total) = repository.list(10, 0).await.unwrap();
      assert_eq!(titles(&page), vec!["kept"]);
      assert_eq!(total, 1);
   }

   #[tokio::test]
   async fn test_find_by_idは論理削除済みも返す() {
      let repository = InMemoryExampleRepository::new();
      let removed = example("removed");
      repository.insert(&removed).await.unwrap();
      repository
         .update(&removed.clone().soft_delete(0, Utc::now()))
         .await
         .unwrap();

      let found = repository.find_by_id(&removed.id()).await.unwrap().unwrap();

      assert!(found.is_deleted());
   }

   #[tokio::test]
   async fn test_存在しないexampleの更新はエラーになる() {
      let repository = InMemoryExampleRepository::new();

      let result = repository.update(&example("ghost")).await;

      assert!(result.is_err());
   }
}
