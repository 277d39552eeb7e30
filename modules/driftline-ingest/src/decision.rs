//! Dedup/update decision engine.
//!
//! Pure decision logic: given an incoming discovery message and the existing
//! record for its canonical URL (if any), decide whether to create, update
//! in place, or skip as a stale duplicate. No side effects, deterministic,
//! testable with only (message, existing-or-none).

use uuid::Uuid;

use driftline_common::{ContentRecord, DiscoveryMessage};

/// The outcome of the dedup check for a single discovery message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestAction {
    /// No existing record — first sighting of this URL.
    Create,
    /// The message is strictly newer — replace the stored content fields.
    Update { existing_id: Uuid },
    /// Duplicate with no claim to recency — leave prior state untouched.
    Skip { reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither side carries a publish date; recency cannot be established.
    NoRecency,
    /// The incoming message is not strictly newer than the stored record.
    Stale,
}

/// Pure decision function. Rules are checked in order, first match wins:
///
/// 1. No existing record → Create
/// 2. Neither side has a publish date → Skip (NoRecency)
/// 3. Incoming date present and strictly newer than the stored date
///    (or the stored record has none) → Update
/// 4. Otherwise → Skip (Stale)
pub fn ingest_action(msg: &DiscoveryMessage, existing: Option<&ContentRecord>) -> IngestAction {
    let existing = match existing {
        Some(record) => record,
        None => return IngestAction::Create,
    };

    match (msg.publish_date, existing.publish_date) {
        (None, None) => IngestAction::Skip {
            reason: SkipReason::NoRecency,
        },
        (Some(incoming), Some(stored)) if incoming > stored => IngestAction::Update {
            existing_id: existing.id,
        },
        (Some(_), None) => IngestAction::Update {
            existing_id: existing.id,
        },
        _ => IngestAction::Skip {
            reason: SkipReason::Stale,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use driftline_common::{ContentType, Visibility};

    const URL: &str = "https://blog.example.com/post";

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn message(publish_date: Option<DateTime<Utc>>) -> DiscoveryMessage {
        DiscoveryMessage {
            user_id: Uuid::new_v4(),
            channel_id: Uuid::new_v4(),
            title: "A post".to_string(),
            description: None,
            content_type: ContentType::Article,
            url: URL.to_string(),
            publish_date,
            metadata: None,
        }
    }

    fn record(publish_date: Option<DateTime<Utc>>) -> ContentRecord {
        ContentRecord {
            id: Uuid::parse_str("00000000-0000-0000-0000-0000000000c1").unwrap(),
            user_id: Uuid::new_v4(),
            title: "A post".to_string(),
            description: None,
            content_type: ContentType::Article,
            visibility: Visibility::Community,
            urls: vec![URL.to_string()],
            publish_date,
            tags: vec![],
            embedding: None,
            metadata: None,
            created_at: date(1),
            updated_at: date(1),
        }
    }

    #[test]
    fn no_existing_record_creates() {
        assert_eq!(ingest_action(&message(None), None), IngestAction::Create);
        assert_eq!(
            ingest_action(&message(Some(date(5))), None),
            IngestAction::Create
        );
    }

    #[test]
    fn both_dates_absent_skips_no_recency() {
        let existing = record(None);
        assert_eq!(
            ingest_action(&message(None), Some(&existing)),
            IngestAction::Skip {
                reason: SkipReason::NoRecency
            }
        );
    }

    #[test]
    fn strictly_newer_date_updates() {
        let existing = record(Some(date(1)));
        assert_eq!(
            ingest_action(&message(Some(date(2))), Some(&existing)),
            IngestAction::Update {
                existing_id: existing.id
            }
        );
    }

    #[test]
    fn incoming_date_with_undated_record_updates() {
        let existing = record(None);
        assert_eq!(
            ingest_action(&message(Some(date(1))), Some(&existing)),
            IngestAction::Update {
                existing_id: existing.id
            }
        );
    }

    #[test]
    fn equal_dates_skip_stale() {
        let existing = record(Some(date(2)));
        assert_eq!(
            ingest_action(&message(Some(date(2))), Some(&existing)),
            IngestAction::Skip {
                reason: SkipReason::Stale
            }
        );
    }

    #[test]
    fn older_date_skips_stale() {
        let existing = record(Some(date(2)));
        assert_eq!(
            ingest_action(&message(Some(date(1))), Some(&existing)),
            IngestAction::Skip {
                reason: SkipReason::Stale
            }
        );
    }

    #[test]
    fn undated_message_against_dated_record_skips_stale() {
        let existing = record(Some(date(1)));
        assert_eq!(
            ingest_action(&message(None), Some(&existing)),
            IngestAction::Skip {
                reason: SkipReason::Stale
            }
        );
    }

    #[test]
    fn sub_second_difference_still_updates() {
        let stored = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let existing = record(Some(stored));
        let incoming = stored + chrono::Duration::milliseconds(1);
        assert_eq!(
            ingest_action(&message(Some(incoming)), Some(&existing)),
            IngestAction::Update {
                existing_id: existing.id
            }
        );
    }
}
