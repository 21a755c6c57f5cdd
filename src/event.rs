use std::fmt;

use crate::value::{ChangeRecord, Snapshot};

/// Kind of lifecycle transition; doubles as the channel keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Changed,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Changed => "changed",
            EventKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle event as delivered by the host, one per call.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    Created {
        realm: String,
        snapshot: Snapshot,
    },
    Changed {
        realm: String,
        snapshot: Snapshot,
        change: ChangeRecord,
        author: String,
        comment: String,
    },
    /// `snapshot` is the entity as it was immediately before removal.
    Deleted {
        realm: String,
        snapshot: Snapshot,
    },
}

impl LifecycleEvent {
    pub fn created(realm: impl Into<String>, snapshot: Snapshot) -> Self {
        LifecycleEvent::Created {
            realm: realm.into(),
            snapshot,
        }
    }

    pub fn changed(
        realm: impl Into<String>,
        snapshot: Snapshot,
        change: ChangeRecord,
        author: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        LifecycleEvent::Changed {
            realm: realm.into(),
            snapshot,
            change,
            author: author.into(),
            comment: comment.into(),
        }
    }

    pub fn deleted(realm: impl Into<String>, snapshot: Snapshot) -> Self {
        LifecycleEvent::Deleted {
            realm: realm.into(),
            snapshot,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::Created { .. } => EventKind::Created,
            LifecycleEvent::Changed { .. } => EventKind::Changed,
            LifecycleEvent::Deleted { .. } => EventKind::Deleted,
        }
    }

    pub fn realm(&self) -> &str {
        match self {
            LifecycleEvent::Created { realm, .. }
            | LifecycleEvent::Changed { realm, .. }
            | LifecycleEvent::Deleted { realm, .. } => realm,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        match self {
            LifecycleEvent::Created { snapshot, .. }
            | LifecycleEvent::Changed { snapshot, .. }
            | LifecycleEvent::Deleted { snapshot, .. } => snapshot,
        }
    }
}
