use std::collections::HashMap;

use async_trait::async_trait;

use super::{ArchiveSource, MmsTable};
use crate::domain::Period;
use crate::error::{ArchiveError, Result};

/// Map-backed archive source for tests and offline use.
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    tables: HashMap<(Period, MmsTable), String>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        period: Period,
        table: MmsTable,
        text: impl Into<String>,
    ) -> &mut Self {
        self.tables.insert((period, table), text.into());
        self
    }
}

#[async_trait]
impl ArchiveSource for InMemoryArchive {
    async fn fetch_table(&self, period: Period, table: MmsTable) -> Result<String> {
        self.tables
            .get(&(period, table))
            .cloned()
            .ok_or_else(|| ArchiveError::not_found("fetch_table", format!("{table} {period}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let mut archive = InMemoryArchive::new();
        let period = Period::new(2023, 6).unwrap();
        archive.insert(period, MmsTable::ConstraintData, "C,hdr\n");

        let text = archive
            .fetch_table(period, MmsTable::ConstraintData)
            .await
            .unwrap();
        assert_eq!(text, "C,hdr\n");
    }

    #[tokio::test]
    async fn test_missing_table_is_not_found() {
        let archive = InMemoryArchive::new();
        let period = Period::new(2023, 6).unwrap();
        let err = archive
            .fetch_table(period, MmsTable::EmsMaster)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("EMSMASTER 2023-06"));
    }
}
