use std::collections::BTreeMap;
use std::sync::Mutex;

use super::domain::{ClassificationRecord, RecordId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ClassificationRepository: Send + Sync {
    /// All records ordered by id.
    fn list(&self) -> Result<Vec<ClassificationRecord>, RepositoryError>;
    fn fetch(&self, id: RecordId) -> Result<Option<ClassificationRecord>, RepositoryError>;
    /// Swap in a whole record. Fails with `NotFound` for ids outside the catalog.
    fn replace(&self, record: ClassificationRecord) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Session-owned catalog keyed by record id. The last replace wins.
#[derive(Debug, Default)]
pub struct InMemoryClassificationRepository {
    records: Mutex<BTreeMap<RecordId, ClassificationRecord>>,
}

impl InMemoryClassificationRepository {
    pub fn new(records: Vec<ClassificationRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<RecordId, ClassificationRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("catalog lock poisoned".to_string()))
    }
}

impl ClassificationRepository for InMemoryClassificationRepository {
    fn list(&self) -> Result<Vec<ClassificationRecord>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn fetch(&self, id: RecordId) -> Result<Option<ClassificationRecord>, RepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn replace(&self, record: ClassificationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
