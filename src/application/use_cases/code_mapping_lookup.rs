use crate::domain::error::Result;
use crate::domain::region::{CodeMapping, StateRecord};
use crate::infrastructure::db::StateLookupStore;
use std::sync::Arc;
use tracing::info;

/// Builds the case-insensitive state name -> LGD code dictionary.
pub struct CodeMappingLookupUseCase {
    store: Arc<dyn StateLookupStore + Send + Sync>,
}

impl CodeMappingLookupUseCase {
    pub fn new(store: Arc<dyn StateLookupStore + Send + Sync>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<CodeMapping> {
        let records = self.store.load_states().await?;
        let mapping = build_mapping(&records);

        info!(
            states = records.len(),
            keys = mapping.len(),
            "Built state code mapping"
        );

        Ok(mapping)
    }
}

/// Later records overwrite earlier keys.
pub fn build_mapping(records: &[StateRecord]) -> CodeMapping {
    let mut mapping = CodeMapping::new();
    for record in records {
        for key in record.lookup_keys() {
            mapping.insert(key, record.entity_lgd_code.clone());
        }
    }
    mapping
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::table::Cell;
    use async_trait::async_trait;

    pub(crate) struct FixedStore(pub Result<Vec<StateRecord>>);

    #[async_trait]
    impl StateLookupStore for FixedStore {
        async fn load_states(&self) -> Result<Vec<StateRecord>> {
            self.0.clone()
        }
    }

    #[test]
    fn test_aliases_share_the_row_code() {
        let mapping = build_mapping(&[StateRecord::new(
            "Kerala",
            Cell::Int(11),
            Some("KL, Keralam"),
        )]);

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping["kerala"], Cell::Int(11));
        assert_eq!(mapping["kl"], Cell::Int(11));
        assert_eq!(mapping["keralam"], Cell::Int(11));
    }

    #[test]
    fn test_keys_are_trimmed_and_lowercased() {
        let mapping = build_mapping(&[StateRecord::new(
            "Andhra Pradesh",
            Cell::Int(28),
            Some("A, B ,c"),
        )]);

        for key in ["andhra pradesh", "a", "b", "c"] {
            assert_eq!(mapping.get(key), Some(&Cell::Int(28)), "key {key}");
        }
        assert!(mapping.keys().all(|k| k == &k.trim().to_lowercase()));
    }

    #[test]
    fn test_last_row_wins_on_duplicate_alias() {
        let mapping = build_mapping(&[
            StateRecord::new("Jammu and Kashmir", Cell::Int(1), Some("JK")),
            StateRecord::new("Jammu & Kashmir", Cell::Int(37), Some("jk")),
        ]);

        assert_eq!(mapping["jk"], Cell::Int(37));
        assert_eq!(mapping["jammu and kashmir"], Cell::Int(1));
    }

    #[tokio::test]
    async fn test_execute_reads_store() {
        let store = FixedStore(Ok(vec![StateRecord::new("Goa", Cell::Int(30), None)]));
        let mapping = CodeMappingLookupUseCase::new(Arc::new(store))
            .execute()
            .await
            .unwrap();

        assert_eq!(mapping.get("goa"), Some(&Cell::Int(30)));
    }

    #[tokio::test]
    async fn test_execute_propagates_store_error() {
        let store = FixedStore(Err(AppError::StoreAccess("unreachable".to_string())));
        let err = CodeMappingLookupUseCase::new(Arc::new(store))
            .execute()
            .await
            .unwrap_err();

        assert_eq!(err, AppError::StoreAccess("unreachable".to_string()));
    }
}
