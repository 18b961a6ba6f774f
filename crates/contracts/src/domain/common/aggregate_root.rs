use super::EntityMetadata;

/// Aggregate root
///
/// Instance accessors plus the static naming used for tables and logs.
pub trait AggregateRoot {
    /// Identifier type; `None` until the store assigns one
    type Id;

    fn id(&self) -> Option<Self::Id>;

    /// Lifecycle timestamps
    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index, e.g. "a001"
    fn aggregate_index() -> &'static str;

    /// Collection name, e.g. "car"
    fn collection_name() -> &'static str;

    /// Singular display name
    fn element_name() -> &'static str;

    /// Plural display name
    fn list_name() -> &'static str;

    /// Full aggregate name, also used as the table name (e.g. "a001_car")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
