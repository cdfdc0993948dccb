// Read-only country views over the record store.

use std::sync::Arc;

use crate::core::catalog::country::{Country, CountryCode};
use crate::core::ports::{RecordStore, StoreError};

pub struct CountryQueries<TStore: RecordStore> {
    store: Arc<TStore>,
}

impl<TStore: RecordStore> CountryQueries<TStore> {
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> Result<Vec<Country>, StoreError> {
        self.store.all_countries().await
    }

    pub async fn by_code(&self, code: &CountryCode) -> Result<Option<Country>, StoreError> {
        self.store.country_by_code(code).await
    }
}

#[cfg(test)]
mod country_queries_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_record_store::InMemoryRecordStore;
    use crate::test_support::fixtures::catalog::fixture_countries;
    use rstest::{fixture, rstest};

    #[fixture]
    async fn before_each() -> CountryQueries<InMemoryRecordStore> {
        let store = Arc::new(InMemoryRecordStore::new());
        store
            .replace_all_countries(fixture_countries())
            .await
            .expect("seeding the store failed");
        CountryQueries::new(store)
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_all_countries(
        #[future] before_each: CountryQueries<InMemoryRecordStore>,
    ) {
        let queries = before_each.await;
        assert_eq!(queries.all().await.unwrap(), fixture_countries());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_look_up_a_country_by_code_regardless_of_case(
        #[future] before_each: CountryQueries<InMemoryRecordStore>,
    ) {
        let queries = before_each.await;

        let found = queries.by_code(&CountryCode::new("DE")).await.unwrap();
        assert_eq!(found.unwrap().name, "Deutschland");

        assert_eq!(queries.by_code(&CountryCode::new("xx")).await.unwrap(), None);
    }
}
