use serde::ser::{Serialize, SerializeMap, Serializer};

/// Comparison applied to a PR's days-open value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Below(u64),
    AtLeast(u64),
}

impl Threshold {
    pub fn matches(self, days_open: u64) -> bool {
        match self {
            Threshold::Below(n) => days_open < n,
            Threshold::AtLeast(n) => days_open >= n,
        }
    }
}

/// Age buckets. They are cumulative: one PR lands in every bucket whose
/// threshold it satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    Under5,
    Under10,
    Under15,
    AtLeast5,
    AtLeast10,
    AtLeast15,
    AtLeast20,
    AtLeast30,
}

/// Every bucket with its threshold, in report order
const BUCKET_TABLE: [(AgeBucket, Threshold); 8] = [
    (AgeBucket::Under5, Threshold::Below(5)),
    (AgeBucket::Under10, Threshold::Below(10)),
    (AgeBucket::Under15, Threshold::Below(15)),
    (AgeBucket::AtLeast5, Threshold::AtLeast(5)),
    (AgeBucket::AtLeast10, Threshold::AtLeast(10)),
    (AgeBucket::AtLeast15, Threshold::AtLeast(15)),
    (AgeBucket::AtLeast20, Threshold::AtLeast(20)),
    (AgeBucket::AtLeast30, Threshold::AtLeast(30)),
];

impl AgeBucket {
    pub fn all() -> impl Iterator<Item = AgeBucket> {
        BUCKET_TABLE.iter().map(|(bucket, _)| *bucket)
    }

    pub fn threshold(self) -> Threshold {
        BUCKET_TABLE[self.index()].1
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Under5 => "<5",
            AgeBucket::Under10 => "<10",
            AgeBucket::Under15 => "<15",
            AgeBucket::AtLeast5 => "≥5",
            AgeBucket::AtLeast10 => "≥10",
            AgeBucket::AtLeast15 => "≥15",
            AgeBucket::AtLeast20 => "≥20",
            AgeBucket::AtLeast30 => "≥30",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Buckets a given days-open value qualifies for
pub fn buckets_for(days_open: u64) -> impl Iterator<Item = AgeBucket> {
    BUCKET_TABLE
        .into_iter()
        .filter(move |(_, threshold)| threshold.matches(days_open))
        .map(|(bucket, _)| bucket)
}

/// Per-bucket PR counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    counts: [u64; BUCKET_TABLE.len()],
}

impl BucketCounts {
    pub fn record(&mut self, days_open: u64) {
        for bucket in buckets_for(days_open) {
            self.counts[bucket.index()] += 1;
        }
    }

    pub fn get(&self, bucket: AgeBucket) -> u64 {
        self.counts[bucket.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgeBucket, u64)> + '_ {
        AgeBucket::all().map(move |bucket| (bucket, self.get(bucket)))
    }

    pub fn combine(&self, other: &BucketCounts) -> BucketCounts {
        let mut combined = *self;
        for (slot, extra) in combined.counts.iter_mut().zip(other.counts) {
            *slot += extra;
        }
        combined
    }
}

impl Serialize for BucketCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (bucket, count) in self.iter() {
            map.serialize_entry(bucket.label(), &count)?;
        }
        map.end()
    }
}
