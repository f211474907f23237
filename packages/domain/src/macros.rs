/// リソース識別子の Newtype を定義する
///
/// 生成される型は UUID をラップし、JSON では UUID 文字列そのものとして表現される。
/// 新規採番は時系列順に並ぶ UUID v7 を使う。
///
/// ```rust
/// use gosk_domain::example::ExampleId;
///
/// let id = ExampleId::new();
/// let parsed: ExampleId = id.to_string().parse()?;
/// assert_eq!(parsed, id);
/// assert_eq!(uuid::Uuid::from(id), *id.as_uuid());
/// # Ok::<(), uuid::Error>(())
/// ```
macro_rules! define_uuid_id {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident;
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, Copy, PartialEq, Eq, Hash,
         serde::Serialize, serde::Deserialize,
         derive_more::Display,
      )]
      #[serde(transparent)]
      #[display("{_0}")]
      $vis struct $Name(uuid::Uuid);

      impl $Name {
         /// UUID v7 で採番する
         pub fn new() -> Self {
            Self(uuid::Uuid::now_v7())
         }

         pub fn from_uuid(uuid: uuid::Uuid) -> Self {
            Self(uuid)
         }

         pub fn as_uuid(&self) -> &uuid::Uuid {
            &self.0
         }
      }

      impl Default for $Name {
         fn default() -> Self {
            Self::new()
         }
      }

      impl From<$Name> for uuid::Uuid {
         fn from(id: $Name) -> Self {
            id.0
         }
      }

      impl std::str::FromStr for $Name {
         type Err = uuid::Error;

         fn from_str(s: &str) -> Result<Self, Self::Err> {
            uuid::Uuid::parse_str(s).map(Self)
         }
      }
   };
}
