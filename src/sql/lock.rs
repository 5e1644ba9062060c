//! Row locking.
//!
//! A [`LockKind`] tags a profile with the composer that writes its lock
//! clause. Composers only produce text; whether a select may be locked at all
//! is decided by [`check_locking`] from the shape of the select.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dialect::{Capability, Db2Platform, DialectProfile};
use crate::error::{CompileError, CompileResult};
use crate::sql::dialect::db2::{
    FOR_READ_ONLY, FOR_UPDATE, USE_KEEP_EXCLUSIVE_LOCKS, USE_KEEP_UPDATE_LOCKS, WITH_RR,
    WITH_RS, WITH_UR,
};

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsolationLevel::ReadUncommitted => "read-uncommitted",
            IsolationLevel::ReadCommitted => "read-committed",
            IsolationLevel::RepeatableRead => "repeatable-read",
            IsolationLevel::Serializable => "serializable",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for IsolationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "read-uncommitted" => Ok(IsolationLevel::ReadUncommitted),
            "read-committed" => Ok(IsolationLevel::ReadCommitted),
            "repeatable-read" => Ok(IsolationLevel::RepeatableRead),
            "serializable" => Ok(IsolationLevel::Serializable),
            other => Err(format!("unknown isolation level: {}", other)),
        }
    }
}

/// What the caller asks of a select's locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockRequest {
    pub isolation: Option<IsolationLevel>,
    pub for_update: bool,
    /// An eager to-many join is fetched along with the select.
    pub has_to_many_eager_join: bool,
    /// Pessimistic write lock hint; promotes the isolation to serializable.
    pub pessimistic_write: bool,
}

impl LockRequest {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_update() -> Self {
        Self {
            for_update: true,
            ..Self::default()
        }
    }

    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = Some(isolation);
        self
    }

    pub fn with_to_many_eager_join(mut self) -> Self {
        self.has_to_many_eager_join = true;
        self
    }

    pub fn pessimistic_write(mut self) -> Self {
        self.pessimistic_write = true;
        self
    }

    /// Isolation after the pessimistic-write promotion.
    pub fn effective_isolation(&self) -> Option<IsolationLevel> {
        if self.pessimistic_write {
            Some(IsolationLevel::Serializable)
        } else {
            self.isolation
        }
    }
}

/// Lock clause family of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "platform")]
pub enum LockKind {
    /// The profile's `FOR UPDATE` text, isolation ignored.
    #[default]
    Standard,
    /// DB2 isolation clauses for one server platform.
    Db2(Db2Platform),
}

impl LockKind {
    pub fn composer(&self) -> Box<dyn LockClauseComposer> {
        match self {
            LockKind::Standard => Box::new(StandardLocks),
            LockKind::Db2(platform) => Box::new(Db2Locks {
                platform: *platform,
            }),
        }
    }
}

/// Writes the lock clause that ends a select.
pub trait LockClauseComposer {
    /// `Ok(None)` when nothing is appended.
    fn lock_clause(
        &self,
        profile: &DialectProfile,
        isolation: Option<IsolationLevel>,
        for_update: bool,
        subquery: bool,
    ) -> CompileResult<Option<String>>;
}

pub struct StandardLocks;

impl LockClauseComposer for StandardLocks {
    fn lock_clause(
        &self,
        profile: &DialectProfile,
        _isolation: Option<IsolationLevel>,
        for_update: bool,
        _subquery: bool,
    ) -> CompileResult<Option<String>> {
        if !for_update || profile.quirks.simulate_locking {
            return Ok(None);
        }
        profile.assert_support(Capability::SelectForUpdate)?;
        Ok(profile.clauses.for_update.clone())
    }
}

pub struct Db2Locks {
    pub platform: Db2Platform,
}

impl LockClauseComposer for Db2Locks {
    fn lock_clause(
        &self,
        profile: &DialectProfile,
        isolation: Option<IsolationLevel>,
        for_update: bool,
        subquery: bool,
    ) -> CompileResult<Option<String>> {
        if !for_update {
            if isolation == Some(IsolationLevel::ReadUncommitted) && !subquery {
                return Ok(Some(format!("{} {}", FOR_READ_ONLY, WITH_UR)));
            }
            return Ok(None);
        }
        if profile.quirks.simulate_locking {
            return Ok(None);
        }
        profile.assert_support(Capability::SelectForUpdate)?;

        let serializable = isolation == Some(IsolationLevel::Serializable);
        let clause = match self.platform {
            Db2Platform::UdbLegacy | Db2Platform::ISeriesLegacy => {
                if serializable {
                    profile
                        .clauses
                        .for_update
                        .clone()
                        .unwrap_or_else(|| FOR_UPDATE.to_string())
                } else {
                    format!("{} {}", FOR_UPDATE, WITH_RS)
                }
            }
            Db2Platform::Udb | Db2Platform::ZOs => {
                let level = if serializable { WITH_RR } else { WITH_RS };
                format!("{} {} {}", FOR_READ_ONLY, level, USE_KEEP_UPDATE_LOCKS)
            }
            Db2Platform::ISeries => {
                let level = if serializable { WITH_RR } else { WITH_RS };
                format!("{} {} {}", FOR_READ_ONLY, level, USE_KEEP_EXCLUSIVE_LOCKS)
            }
        };
        debug!(platform = ?self.platform, %clause, "db2 lock clause");
        Ok(Some(clause))
    }
}

// =============================================================================
// Lockability
// =============================================================================

/// Shape of a select, as far as locking cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockTarget {
    pub aggregate: bool,
    pub distinct: bool,
    pub tables: usize,
    pub ordered: bool,
    pub ranged: bool,
    /// The range strategy wraps the select in a sub-select.
    pub range_wraps: bool,
    pub has_inner_join: bool,
    pub has_outer_join: bool,
}

/// Fail with the first capability the profile lacks for locking `target`.
pub fn check_locking(profile: &DialectProfile, target: &LockTarget) -> CompileResult<()> {
    if target.aggregate {
        return Err(CompileError::unsupported(
            Capability::SelectForUpdate,
            format!("{} (aggregate select)", profile.platform),
        ));
    }
    profile.assert_support(Capability::SelectForUpdate)?;

    let checks = [
        (target.ranged || target.range_wraps, Capability::LockingWithSelectRange),
        (target.distinct, Capability::LockingWithDistinct),
        (target.tables > 1, Capability::LockingWithMultipleTables),
        (target.ordered, Capability::LockingWithOrderBy),
        (target.has_outer_join, Capability::LockingWithOuterJoin),
        (target.has_inner_join, Capability::LockingWithInnerJoin),
    ];
    for (applies, capability) in checks {
        if applies {
            profile.assert_support(capability)?;
        }
    }

    if target.range_wraps {
        return Err(CompileError::unsupported(
            Capability::LockingWithSelectRange,
            profile.platform.clone(),
        ));
    }
    Ok(())
}
