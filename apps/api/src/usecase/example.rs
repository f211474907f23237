//! Example 管理ユースケース

use std::sync::Arc;

use gosk_domain::{
   DomainError,
   DomainModel,
   clock::Clock,
   example::{ExampleId, ExampleInputData, ExampleObject},
};
use gosk_shared::PageMetadata;

use crate::{error::ApiError, repository::ExampleRepository};

/// Example 管理ユースケース
pub struct ExampleUseCaseImpl {
   repository: Arc<dyn ExampleRepository>,
   clock:      Arc<dyn Clock>,
}

impl ExampleUseCaseImpl {
   pub fn new(repository: Arc<dyn ExampleRepository>, clock: Arc<dyn Clock>) -> Self {
      Self { repository, clock }
   }

   /// 論理削除されていない Example の一覧をページ単位で取得する
   pub async fn list(&self, limit: u64, offset: u64) -> Result<DomainModel<ExampleObject>, ApiError> {
      let (examples, total) = self.repository.list(limit, offset).await?;
      Ok(DomainModel::collection(
         examples,
         PageMetadata::new(limit, offset, total),
      ))
   }

   /// Example を 1 件取得する（論理削除済みは存在しないものとして扱う）
   pub async fn get(&self, id: &ExampleId) -> Result<ExampleObject, ApiError> {
      let example = self
         .repository
         .find_by_id(id)
         .await?
         .filter(|e| !e.is_deleted())
         .ok_or_else(|| DomainError::NotFound {
            entity_type: "example",
            id:          id.to_string(),
         })?;
      Ok(example)
   }

   pub async fn create(&self, input: ExampleInputData, actor: u32) -> Result<ExampleObject, ApiError> {
      let example = ExampleObject::create(input, actor, self.clock.now());
      self.repository.insert(&example).await?;
      Ok(example)
   }

   pub async fn update(
      &self,
      id: &ExampleId,
      input: ExampleInputData,
      actor: u32,
   ) -> Result<ExampleObject, ApiError> {
      let updated = self.get(id).await?.update(input, actor, self.clock.now());
      self.repository.update(&updated).await?;
      Ok(updated)
   }

   /// 論理削除する
   pub async fn delete(&self, id: &ExampleId, actor: u32) -> Result<(), ApiError> {
      let deleted = self.get(id).await?.soft_delete(actor, self.clock.now());
      self.repository.update(&deleted).await?;
      Ok(())
   }
}
