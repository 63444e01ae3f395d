// src/sink/accumulator.rs
// The growing result set. Records are appended in capture order and never
// de-duplicated: sequence ids are unique within a run by construction.

use crate::model::ListingRecord;
use serde::Serialize;

#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<ListingRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    // Picks up records captured by an earlier process of the same run
    pub fn from_records(records: Vec<ListingRecord>) -> Self {
        Self { records }
    }

    pub fn append(&mut self, record: ListingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn finalize(self) -> ResultTable {
        let mut rows = self.records;
        // stable, so records captured in the same instant keep append order
        rows.sort_by_key(|record| record.captured_at);
        ResultTable { rows }
    }
}

/// All records of a run, indexed by capture timestamp.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultTable {
    rows: Vec<ListingRecord>,
}

impl ResultTable {
    pub fn rows(&self) -> &[ListingRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListingDetail, ListingSummary, SequenceId};
    use chrono::{Duration, Local, NaiveDate};

    fn record(id: u64, captured_at: chrono::DateTime<Local>) -> ListingRecord {
        ListingRecord::new(
            captured_at,
            ListingSummary {
                link: format!("https://www.kosovajob.com/job/{id}"),
                title: "Engineer".into(),
                city: "Pristina".into(),
                sequence_id: SequenceId(id),
            },
            ListingDetail {
                company_name: "Acme".into(),
                expiration_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
                job_category: "IT".into(),
                job_description: "Hiring".into(),
                contract_type: "Full time".into(),
                view_count: 10,
                has_document: false,
            },
        )
    }

    #[test]
    fn test_finalize_orders_by_capture_time() {
        let now = Local::now();
        let mut acc = Accumulator::new();
        acc.append(record(2, now + Duration::seconds(5)));
        acc.append(record(1, now));
        assert_eq!(acc.len(), 2);

        let table = acc.finalize();
        let ids: Vec<_> = table.rows().iter().map(|r| r.sequence_id()).collect();
        assert_eq!(ids, vec![SequenceId(1), SequenceId(2)]);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = Accumulator::new();
        assert_eq!(acc.len(), 0);
        assert!(acc.finalize().is_empty());
    }

    #[test]
    fn test_restored_records_come_first() {
        let now = Local::now();
        let mut acc = Accumulator::from_records(vec![record(1, now)]);
        acc.append(record(2, now + Duration::seconds(1)));
        assert_eq!(acc.records().len(), 2);

        let ids: Vec<_> = acc.finalize().rows().iter().map(|r| r.sequence_id().0).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
