use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::{Mutex, PoisonError};

/// Produces identifiers unique among everything this allocator has handed out.
pub trait IdAllocator {
    fn allocate(&self) -> String;
}

/// `YYYYMMDDHHMMSS` followed by a zero-padded process-wide sequence number.
#[derive(Debug, Default)]
pub struct TimestampIdAllocator {
    counter: Mutex<u64>,
}

impl TimestampIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_at(&self, now: NaiveDateTime) -> String {
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        *counter += 1;
        format!("{}{:04}", now.format("%Y%m%d%H%M%S"), *counter)
    }
}

impl IdAllocator for TimestampIdAllocator {
    fn allocate(&self) -> String {
        self.allocate_at(Local::now().naive_local())
    }
}

/// `C-YYYYMMDD-NNNN`, continuing after the highest sequence already used that day.
#[derive(Debug, Default)]
pub struct DailySequenceAllocator {
    issued: Mutex<Vec<String>>,
}

impl DailySequenceAllocator {
    pub fn new<I, S>(existing_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            issued: Mutex::new(existing_ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn allocate_on(&self, day: NaiveDate) -> String {
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let prefix = format!("C-{}-", day.format("%Y%m%d"));

        let max_seq = issued
            .iter()
            .filter_map(|id| id.strip_prefix(&prefix))
            .filter_map(|seq| seq.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        let id = format!("{}{:04}", prefix, max_seq + 1);
        issued.push(id.clone());
        id
    }
}

impl IdAllocator for DailySequenceAllocator {
    fn allocate(&self) -> String {
        self.allocate_on(Local::now().date_naive())
    }
}
