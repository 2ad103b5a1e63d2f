//! Storage quota accounting.
//!
//! Every write is measured against a fixed capacity budget; usage is
//! classified into bands that drive the severity of user-facing warnings.
//! Eviction itself lives in [`super::lists`], next to the index/record
//! pairing it must keep intact; the policy is allow-then-evict: a save is
//! never blocked, and once usage reaches 100% the oldest list is evicted
//! right after the save that observed it. A single save can legally push
//! usage over budget before the next save triggers eviction.

use super::KvStore;

/// Fixed capacity budget: 3.5 MiB over the whole store namespace.
pub const MAX_CAPACITY_BYTES: u64 = 3_670_016;

/// Band thresholds in percent.
const WARNING_THRESHOLD: u32 = 70;
const DANGER_THRESHOLD: u32 = 90;

/// Usage band derived from the storage usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaBand {
    Safe,
    Warning,
    Danger,
}

impl QuotaBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaBand::Safe => "safe",
            QuotaBand::Warning => "warning",
            QuotaBand::Danger => "danger",
        }
    }
}

/// Classify a usage percentage: safe <70, warning 70-89, danger >=90.
pub fn classify(percentage: u32) -> QuotaBand {
    if percentage >= DANGER_THRESHOLD {
        QuotaBand::Danger
    } else if percentage >= WARNING_THRESHOLD {
        QuotaBand::Warning
    } else {
        QuotaBand::Safe
    }
}

/// Current usage as a rounded percentage of the budget. May exceed 100.
pub fn usage_percentage(store: &KvStore) -> u32 {
    let usage = store.usage_bytes() as f64;
    (usage / MAX_CAPACITY_BYTES as f64 * 100.0).round() as u32
}

/// Result of the advisory pre-write check.
#[derive(Debug, Clone, Copy)]
pub struct WriteCheck {
    pub percentage: u32,
    pub band: QuotaBand,
}

impl WriteCheck {
    /// Warning text for the caller to surface, graded by band. `None`
    /// below the warning threshold.
    pub fn warning(&self) -> Option<String> {
        match self.band {
            QuotaBand::Safe => None,
            QuotaBand::Warning => Some(format!(
                "Storage is {}% full. Consider deleting old lists.",
                self.percentage
            )),
            QuotaBand::Danger if self.percentage >= 100 => Some(format!(
                "Storage is full ({}%). The oldest list will be evicted after this save.",
                self.percentage
            )),
            QuotaBand::Danger => Some(format!(
                "Storage is almost full ({}%). The oldest list will be evicted once it fills up.",
                self.percentage
            )),
        }
    }
}

/// Advisory check run before a save. Never blocks the write; the caller
/// surfaces the warning at the matching severity.
pub fn check_before_write(store: &KvStore) -> WriteCheck {
    let percentage = usage_percentage(store);
    WriteCheck {
        percentage,
        band: classify(percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_band_boundaries() {
        assert_eq!(classify(0), QuotaBand::Safe);
        assert_eq!(classify(69), QuotaBand::Safe);
        assert_eq!(classify(70), QuotaBand::Warning);
        assert_eq!(classify(89), QuotaBand::Warning);
        assert_eq!(classify(90), QuotaBand::Danger);
        assert_eq!(classify(100), QuotaBand::Danger);
        assert_eq!(classify(130), QuotaBand::Danger);
    }

    #[test]
    fn test_warning_text_grades_by_band() {
        let safe = WriteCheck {
            percentage: 10,
            band: QuotaBand::Safe,
        };
        assert!(safe.warning().is_none());

        let warn = WriteCheck {
            percentage: 75,
            band: QuotaBand::Warning,
        };
        assert!(warn.warning().unwrap().contains("75%"));

        let danger = WriteCheck {
            percentage: 93,
            band: QuotaBand::Danger,
        };
        assert!(danger.warning().unwrap().contains("almost full"));

        let full = WriteCheck {
            percentage: 104,
            band: QuotaBand::Danger,
        };
        assert!(full.warning().unwrap().contains("full (104%)"));
    }
}
