#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use woonactie_contracts::{SubmissionId, SubmissionInput, Validate};

use crate::store::{StoreError, SubmissionRecord, SubmissionStore, FORM_SUBMISSIONS_TABLE};

fn fnv1a64(bytes: &[u8]) -> u64 {
    // FNV-1a 64-bit (stable across platforms, deterministic).
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut h = OFFSET;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}

fn hash_hex_64(s: &str) -> String {
    let mut h = fnv1a64(s.as_bytes());
    if h == 0 {
        h = 1;
    }
    format!("{:016x}", h)
}

/// In-memory table store for tests and local development. Mints ids and
/// timestamps the way the managed backend would: the caller never supplies
/// either. Ids embed a zero-padded sequence so lexical order is insert order.
#[derive(Debug, Clone, Default)]
pub struct MemorySubmissionStore {
    submissions: BTreeMap<String, SubmissionRecord>,
    next_submission_seq: u64,
}

impl MemorySubmissionStore {
    pub fn new_in_memory() -> Self {
        Self {
            submissions: BTreeMap::new(),
            next_submission_seq: 1,
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    /// Insert with an explicit creation instant. Test seeding uses this to
    /// build deterministic day boundaries; `insert` delegates here with the
    /// current wall clock.
    pub fn insert_at(
        &mut self,
        input: &SubmissionInput,
        created_at: DateTime<Utc>,
    ) -> Result<SubmissionRecord, StoreError> {
        input.validate()?;
        let payload = serde_json::to_string(input).map_err(|err| StoreError::Decode {
            detail: format!("submission encode failed: {err}"),
        })?;
        let seq = self.next_submission_seq;
        let payload_hash = hash_hex_64(&payload);
        let id = SubmissionId::new(format!("sub_{seq:06}_{payload_hash}"))?;
        if self.submissions.contains_key(id.as_str()) {
            return Err(StoreError::DuplicateKey {
                table: FORM_SUBMISSIONS_TABLE,
                key: id.as_str().to_string(),
            });
        }
        let record = SubmissionRecord::v1(id, input, created_at, created_at)?;
        self.submissions
            .insert(record.id.as_str().to_string(), record.clone());
        self.next_submission_seq = self.next_submission_seq.saturating_add(1);
        Ok(record)
    }
}

impl SubmissionStore for MemorySubmissionStore {
    fn insert(&mut self, input: &SubmissionInput) -> Result<SubmissionRecord, StoreError> {
        self.insert_at(input, Utc::now())
    }

    fn list_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let mut rows: Vec<SubmissionRecord> = self.submissions.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        Ok(rows)
    }
}
