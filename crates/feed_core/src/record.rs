use serde::{Deserialize, Serialize};

/// One listing from the feed. Fields are empty when the listing did not render them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub location: String,
    pub employer: String,
    pub link: String,
}

impl ListingRecord {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        employer: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            employer: employer.into(),
            link: link.into(),
        }
    }
}

/// Append-only, ordered collection of every record seen during a session.
///
/// Records from page N always precede records from page N+1. Duplicates are
/// kept; callers that need uniqueness dedupe after export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultAggregator {
    records: Vec<ListingRecord>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, batch: impl IntoIterator<Item = ListingRecord>) {
        self.records.extend(batch);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}
