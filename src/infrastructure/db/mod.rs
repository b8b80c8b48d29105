pub mod states;

use crate::domain::error::Result;
use crate::domain::region::StateRecord;
use async_trait::async_trait;

pub use states::SqliteStateStore;

/// Read access to the `states` lookup table.
#[async_trait]
pub trait StateLookupStore {
    /// All rows in table scan order.
    async fn load_states(&self) -> Result<Vec<StateRecord>>;
}
