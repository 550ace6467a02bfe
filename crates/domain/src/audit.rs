use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

pub type UserId = Uuid;

/// Who invoked an operation and when. Built once per command from an
/// explicit identity and the injected clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub actor: UserId,
    pub now: DateTime<Utc>,
}

impl CommandContext {
    pub fn new(actor: UserId, clock: &dyn Clock) -> Self {
        Self {
            actor,
            now: clock.now(),
        }
    }
}

/// Creation and last-modification stamps carried by every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub last_modified_by: Option<UserId>,
}

impl Audit {
    pub fn created(ctx: &CommandContext) -> Self {
        Self {
            created_at: ctx.now,
            created_by: ctx.actor,
            last_modified_at: None,
            last_modified_by: None,
        }
    }

    pub(crate) fn touch(&mut self, ctx: &CommandContext) {
        self.last_modified_at = Some(ctx.now);
        self.last_modified_by = Some(ctx.actor);
    }
}
