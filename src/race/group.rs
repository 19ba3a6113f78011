use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::TargetSpec;
use crate::error::RaceError;
use crate::http::{ResponseHead, ResponseRecord};

/// The first response seen for an outcome, kept as the representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub head: ResponseHead,
    pub body: Vec<u8>,
}

impl ResponseSnapshot {
    fn matches(&self, head: &ResponseHead, body: &[u8]) -> bool {
        self.head.status_code == head.status_code
            && self.head.content_length == head.content_length
            && self.body == body
    }
}

/// Responses that share status code, body, and content length.
#[derive(Debug, Clone)]
pub struct OutcomeGroup {
    pub exemplar: ResponseSnapshot,
    pub count: usize,
    /// Distinct targets behind this outcome, in first-seen order.
    pub targets: Vec<Arc<TargetSpec>>,
}

impl OutcomeGroup {
    /// Responses beyond the exemplar.
    #[must_use]
    pub const fn similar(&self) -> usize {
        self.count.saturating_sub(1)
    }

    fn absorb(&mut self, origin: Arc<TargetSpec>) {
        self.count = self.count.saturating_add(1);
        if !self.targets.iter().any(|known| **known == *origin) {
            self.targets.push(origin);
        }
    }
}

/// Incrementally partitions response records into outcome groups.
///
/// Candidate groups are looked up by a fingerprint of the compared fields,
/// then confirmed by full comparison, so lookups stay cheap as the number of
/// distinct outcomes grows. Groups keep the order in which their first
/// member arrived.
#[derive(Debug, Default)]
pub struct ResponseGrouper {
    groups: Vec<OutcomeGroup>,
    index: HashMap<u64, Vec<usize>>,
    errors: Vec<RaceError>,
}

impl ResponseGrouper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: ResponseRecord) {
        let ResponseRecord {
            index,
            origin,
            head,
            body,
            ..
        } = record;
        let body = match body {
            Ok(body) => body,
            Err(source) => {
                self.errors.push(RaceError::BodyRead { index, source });
                return;
            }
        };

        let key = fingerprint(&head, &body);
        let candidates = self.index.entry(key).or_default();
        let found = candidates.iter().copied().find(|position| {
            self.groups
                .get(*position)
                .is_some_and(|group| group.exemplar.matches(&head, &body))
        });

        if let Some(group) = found.and_then(|position| self.groups.get_mut(position)) {
            group.absorb(origin);
            return;
        }

        candidates.push(self.groups.len());
        self.groups.push(OutcomeGroup {
            exemplar: ResponseSnapshot { head, body },
            count: 1,
            targets: vec![origin],
        });
    }

    #[must_use]
    pub fn finish(self) -> (Vec<OutcomeGroup>, Vec<RaceError>) {
        (self.groups, self.errors)
    }
}

/// Groups a complete set of records. Records whose body could not be read
/// are left out and reported as errors.
#[must_use]
pub fn group_responses<I>(records: I) -> (Vec<OutcomeGroup>, Vec<RaceError>)
where
    I: IntoIterator<Item = ResponseRecord>,
{
    let mut grouper = ResponseGrouper::new();
    for record in records {
        grouper.add(record);
    }
    grouper.finish()
}

fn fingerprint(head: &ResponseHead, body: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    head.status_code.hash(&mut hasher);
    head.content_length.hash(&mut hasher);
    body.hash(&mut hasher);
    hasher.finish()
}
