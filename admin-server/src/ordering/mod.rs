//! Ordering engine
//!
//! 所有拖拽排序与分组功能的核心：
//!
//! - [`Sequencer`] - 平铺集合的稠密排序 (菜单项、支付方式)
//! - [`Grouper`] - 规格按 category 分组、组排序、组身份保持
//! - [`OrderedView`] - 乐观更新的 Pending / Confirmed 状态
//!
//! Both components talk to storage only through [`RankStore`] and
//! [`VariationStore`]. A multi-row change is written either as one
//! transactional batch ([`WriteMode::Atomic`]) or as a sequence of awaited
//! single-row writes ([`WriteMode::Sequential`]) for stores that cannot run
//! transactions. A sequential batch that fails partway is reported as
//! [`OrderingError::PartialBatch`] and the caller must re-read.

pub mod error;
pub mod group_key;
pub mod grouper;
pub mod sequencer;
pub mod store;
pub mod view;

pub use error::{OrderingError, OrderingResult};
pub use group_key::{GroupKey, PLACEHOLDER_PREFIX};
pub use grouper::{Group, Grouper, group_by};
pub use sequencer::{Sequencer, ShiftPlan, normalize, plan_shift_insert};
pub use store::{RankEntry, RankStore, VariationDraft, VariationPlacement, VariationStore};
pub use view::{OrderedView, SyncState};

use std::str::FromStr;

/// How a multi-row change reaches the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// One transaction carrying every row (all or nothing)
    #[default]
    Atomic,
    /// One awaited write per row, stops at the first failure
    Sequential,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Sequential => "sequential",
        }
    }
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!("unknown write mode: {other}")),
        }
    }
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod testing;
