//! AIC8800 WiFi 全功能驱动 (FDRV) - SoftAP / P2P-GO 自动信道选择 (ACS)
//!
//! 对应 aic8800_fdrv 的 cfg80211 层中 DO_ACS 相关部分
//!
//! 功能包括:
//! - 信道表与监管过滤 (chan_table / regulatory)
//! - 避让频率登记 (avoid_freq) - LTE 共存与运营商配置
//! - 候选表构建、并发约束、PCL 裁剪、空表回退、带宽决策
//! - ACS 决策状态机 (acs) 与会话管理 (manager)
//! - 配置文件 (cfgfile)、Vendor 命令 (vendor)、SAP 下游 (wiphy)

#![no_std]

extern crate alloc;

mod acs;
mod acs_chan_info;
mod acs_chan_list;
mod acs_concurrency;
mod acs_policy;
mod acs_trim;
mod acs_types;
mod acs_width;
mod avoid_freq;
mod cfgfile;
mod chan_list;
pub mod chan_table;
mod manager;
mod policy_mgr;
mod regulatory;
mod vendor;
mod wiphy;

#[cfg(test)]
mod test_util;

pub use acs::{AcsEngine, AcsOutcome, AcsScan, AcsSession, AcsState, ChannelScore};
pub use acs_chan_info::{
    chan_info_flags, secondary_freq, segment_centers, AcsResultChannelInfo, ChanBlock,
    ChannelInfoRecord,
};
pub use acs_chan_list::AcsChannelListBuilder;
pub use acs_concurrency::{
    ApChanConfig, ConcurrencyConstraintResolver, ConcurrencyOutcome, DfsOverride, PeerApSession,
};
pub use acs_policy::AcsPolicy;
pub use acs_trim::{AcsTrimmer, AcsZeroFallback, TrimOutcome};
pub use acs_types::{AcsConfig, AcsError, AcsResult, ConfigError, HwMode};
pub use acs_width::{ChannelWidthResolver, WidthCaps};
pub use avoid_freq::{
    AvoidSnapshot, ChannelAvoidanceRegistry, FreqRange, MAX_AVOID_FREQ_RANGES,
    MAX_OPERATOR_AVOID_FREQS,
};
pub use cfgfile::{parse_acs_configfile, AcsConfFile, ConfigStore};
pub use chan_list::{AcsChanArena, ChanList, ACS_MAX_CHANNELS};
pub use chan_table::BandMask;
pub use manager::AcsManager;
pub use policy_mgr::{
    fetch_pcl, pcl_flags, ConcurrencyState, ConnectionRecord, PolicyManager, WeightedChannel,
};
pub use regulatory::{ChannelDescriptor, ChannelState, RegRule, Regulatory, RegulatoryFilter};
pub use vendor::{AcsChannelSelectEvent, AcsRequest, VendorSubcmd, AIC_OUI};
pub use wiphy::{SapOps, SapOpsStub};
