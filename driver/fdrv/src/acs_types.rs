//! ACS 请求/结果/错误类型
//!
//! 对应 struct sap_acs_cfg 中每次 ACS 请求用到的字段，以及上报 hostapd 的结果。

use alloc::vec::Vec;
use axerrno::LinuxError;
use core::fmt;
use ieee80211::{ChanDef, ChanWidth, Nl80211Iftype};

use crate::acs_chan_info::ChannelInfoRecord;
use crate::chan_table::BandMask;

/// hostapd hw_mode（对应 HOSTAPD_MODE_IEEE80211*）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HwMode {
    B = 0,
    G = 1,
    A = 2,
    #[default]
    Any = 3,
}

impl HwMode {
    /// hw_mode 对应的频段：A 包含 5G 与 6G
    pub const fn band_mask(self) -> BandMask {
        match self {
            Self::B | Self::G => BandMask::BAND_2G,
            Self::A => BandMask::BAND_5G.union(BandMask::BAND_6G),
            Self::Any => BandMask::ALL,
        }
    }
}

/// 一次 ACS 请求的配置，整个决策周期内不变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcsConfig {
    /// 发起 ACS 的接口类型（Ap / P2pGo）
    pub iface_type: Nl80211Iftype,
    pub requested_width: ChanWidth,
    pub hw_mode: HwMode,
    pub ht_enabled: bool,
    pub ht40_enabled: bool,
    pub vht_enabled: bool,
    pub band_filter: BandMask,
    /// 调用方显式给出的频率列表（MHz）
    pub explicit_freq_list: Option<Vec<u32>>,
}

impl AcsConfig {
    pub fn new(iface_type: Nl80211Iftype, hw_mode: HwMode) -> Self {
        Self {
            iface_type,
            requested_width: ChanWidth::TwentyMhz,
            hw_mode,
            ht_enabled: true,
            ht40_enabled: false,
            vht_enabled: false,
            band_filter: hw_mode.band_mask(),
            explicit_freq_list: None,
        }
    }
}

/// 配置类致命错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyCandidateSet,
    CycleAlreadyInProgress,
}

/// ACS 周期失败原因；均为致命，本周期不产生信道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcsError {
    Config(ConfigError),
    /// 强制 SCC 的 DFS 信道不是已有 ACS 会话的主/次信道
    ConcurrencyConflict {
        forced_freq: u32,
        primary: u32,
        secondary: u32,
    },
    /// 固定容量的信道表已满
    AllocationFailure,
    /// 没有等待中的扫描，却收到了扫描结果
    NoScanPending,
}

impl AcsError {
    /// cfg80211 边界使用的负 errno
    pub fn to_errno(&self) -> i32 {
        let e = match self {
            Self::Config(ConfigError::EmptyCandidateSet) => LinuxError::EINVAL,
            Self::Config(ConfigError::CycleAlreadyInProgress) => LinuxError::EBUSY,
            Self::ConcurrencyConflict { .. } => LinuxError::EINVAL,
            Self::AllocationFailure => LinuxError::ENOMEM,
            Self::NoScanPending => LinuxError::EINVAL,
        };
        -e.code()
    }
}

impl From<ConfigError> for AcsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl fmt::Display for AcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(ConfigError::EmptyCandidateSet) => write!(f, "no usable ACS channel"),
            Self::Config(ConfigError::CycleAlreadyInProgress) => {
                write!(f, "ACS already in progress on this interface")
            }
            Self::ConcurrencyConflict {
                forced_freq,
                primary,
                secondary,
            } => write!(
                f,
                "forced SCC freq {} not in existing ACS channels ({}, {})",
                forced_freq, primary, secondary
            ),
            Self::AllocationFailure => write!(f, "ACS channel table full"),
            Self::NoScanPending => write!(f, "no ACS scan pending"),
        }
    }
}

/// ACS 结果（对应 acs_cfg 的 pri/ht_sec/vht_seg0/vht_seg1/ch_width），频率均为 MHz，0 表示无
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcsResult {
    pub primary_freq: u32,
    pub secondary_freq: u32,
    pub seg0_center_freq: u32,
    pub seg1_center_freq: u32,
    pub final_width: ChanWidth,
    pub hw_mode: HwMode,
    pub per_channel_info: Vec<ChannelInfoRecord>,
}

impl AcsResult {
    /// 转为 start_ap 使用的 chandef
    pub fn chandef(&self) -> ChanDef {
        let (center_freq1, center_freq2) = match self.final_width {
            // 160MHz：center_freq1 为整个 160 的中心
            ChanWidth::OneSixtyMhz => (self.seg1_center_freq, 0),
            ChanWidth::EightyPlus80Mhz => (self.seg0_center_freq, self.seg1_center_freq),
            _ => (self.seg0_center_freq, 0),
        };
        ChanDef {
            primary_freq: self.primary_freq,
            width: self.final_width,
            center_freq1,
            center_freq2,
        }
    }
}
