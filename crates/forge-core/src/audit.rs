//! Created/updated timestamps carried by every aggregate.
//!
//! Domain code never stamps itself. The persistence boundary calls
//! [`stamp`] once per aggregate per save, passing an explicit [`SaveState`].

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Audit timestamps. Both are `None` until the aggregate is first saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditStamps {
    created_utc: Option<DateTime<Utc>>,
    updated_utc: Option<DateTime<Utc>>,
}

impl AuditStamps {
    /// Stamps as read back from storage.
    pub fn restored(created_utc: DateTime<Utc>, updated_utc: DateTime<Utc>) -> Self {
        Self {
            created_utc: Some(created_utc),
            updated_utc: Some(updated_utc),
        }
    }

    pub fn created_utc(&self) -> Option<DateTime<Utc>> {
        self.created_utc
    }

    pub fn updated_utc(&self) -> Option<DateTime<Utc>> {
        self.updated_utc
    }

    /// First save: both timestamps become `now`.
    pub fn mark_created(&mut self, now: DateTime<Utc>) {
        self.created_utc = Some(now);
        self.updated_utc = Some(now);
    }

    /// Subsequent save: `updated` becomes `now`; `created` is backfilled if
    /// it was never set.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_utc.is_none() {
            self.created_utc = Some(now);
        }
        self.updated_utc = Some(now);
    }
}

/// Implemented by every aggregate so the save path can stamp it.
pub trait Auditable {
    fn audit(&self) -> &AuditStamps;
    fn audit_mut(&mut self) -> &mut AuditStamps;
}

/// How the caller is saving an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveState {
    /// Never persisted before.
    New,
    /// Already persisted and mutated since.
    Modified,
}

/// Apply the audit rule for one aggregate in one save operation.
pub fn stamp<A: Auditable + ?Sized>(entity: &mut A, state: SaveState, now: DateTime<Utc>) {
    match state {
        SaveState::New => entity.audit_mut().mark_created(now),
        SaveState::Modified => entity.audit_mut().touch(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Dummy(AuditStamps);

    impl Auditable for Dummy {
        fn audit(&self) -> &AuditStamps {
            &self.0
        }
        fn audit_mut(&mut self) -> &mut AuditStamps {
            &mut self.0
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn fresh_stamps_are_empty() {
        let stamps = AuditStamps::default();
        assert!(stamps.created_utc().is_none());
        assert!(stamps.updated_utc().is_none());
    }

    #[test]
    fn mark_created_sets_both() {
        let mut d = Dummy(AuditStamps::default());
        stamp(&mut d, SaveState::New, at(100));
        assert_eq!(d.audit().created_utc(), Some(at(100)));
        assert_eq!(d.audit().updated_utc(), Some(at(100)));
    }

    #[test]
    fn touch_only_moves_updated() {
        let mut d = Dummy(AuditStamps::default());
        stamp(&mut d, SaveState::New, at(100));
        stamp(&mut d, SaveState::Modified, at(200));
        assert_eq!(d.audit().created_utc(), Some(at(100)));
        assert_eq!(d.audit().updated_utc(), Some(at(200)));
    }

    #[test]
    fn touch_backfills_missing_created() {
        let mut d = Dummy(AuditStamps::default());
        stamp(&mut d, SaveState::Modified, at(300));
        assert_eq!(d.audit().created_utc(), Some(at(300)));
        assert_eq!(d.audit().updated_utc(), Some(at(300)));
    }

    #[test]
    fn restored_keeps_both_values() {
        let stamps = AuditStamps::restored(at(1), at(2));
        assert_eq!(stamps.created_utc(), Some(at(1)));
        assert_eq!(stamps.updated_utc(), Some(at(2)));
    }
}
