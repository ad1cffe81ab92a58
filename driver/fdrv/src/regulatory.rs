//! 监管过滤（对应 wlan_reg_get_channel_state / reg_get_band_channel_list）
//!
//! 监管数据库本身在外部，这里只把外部查询结果与静态信道表合成 ChannelDescriptor。
//! 查询失败按保守值处理：信道视为 Disabled，频段视为未启用。

use axerrno::AxResult;
use ieee80211::Band;

use crate::acs_types::AcsError;
use crate::chan_list::ChanList;
use crate::chan_table::{self, chan_flags, BandMask, ChanEntry};

/// 信道监管状态（对应 enum channel_state）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Enabled,
    Disabled,
    Dfs,
    Invalid,
}

impl ChannelState {
    /// Enabled 或 Dfs 才能作为候选
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Enabled | Self::Dfs)
    }
}

/// 信道的监管规则（功率、天线增益、operating class）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegRule {
    /// dBm
    pub max_reg_power: i8,
    /// dBi
    pub max_antenna_gain: u8,
    pub reg_class: u8,
    /// 不允许主动发起（NO_IR）
    pub no_ir: bool,
}

/// 外部监管模块接口
pub trait Regulatory {
    fn channel_state(&self, freq: u32) -> AxResult<ChannelState>;
    fn channel_rule(&self, freq: u32) -> AxResult<RegRule>;
    fn is_band_enabled(&self, band: Band) -> AxResult<bool>;
}

/// 某个监管快照下的信道描述，生成后不再修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelDescriptor {
    pub freq_mhz: u32,
    pub channel_number: u8,
    pub band: Band,
    pub is_dfs: bool,
    pub is_passive: bool,
    pub is_disabled: bool,
    pub max_reg_power: i8,
    pub max_antenna_gain: u8,
    pub reg_class: u8,
}

impl ChannelDescriptor {
    pub const EMPTY: Self = Self {
        freq_mhz: 0,
        channel_number: 0,
        band: Band::TwoGhz,
        is_dfs: false,
        is_passive: false,
        is_disabled: false,
        max_reg_power: 0,
        max_antenna_gain: 0,
        reg_class: 0,
    };
}

/// 监管过滤器：借用外部 Regulatory，按需生成描述
pub struct RegulatoryFilter<'a, R: Regulatory + ?Sized> {
    reg: &'a R,
}

impl<'a, R: Regulatory + ?Sized> RegulatoryFilter<'a, R> {
    pub fn new(reg: &'a R) -> Self {
        Self { reg }
    }

    /// 信道状态；不在信道表内为 Invalid，查询失败为 Disabled
    pub fn state(&self, freq: u32) -> ChannelState {
        if chan_table::lookup(freq).is_none() {
            return ChannelState::Invalid;
        }
        match self.reg.channel_state(freq) {
            Ok(s) => s,
            Err(e) => {
                log::warn!(target: "wireless::acs", "reg channel_state freq={} failed: {:?}, treat as disabled", freq, e);
                ChannelState::Disabled
            }
        }
    }

    pub fn is_band_enabled(&self, band: Band) -> bool {
        self.reg.is_band_enabled(band).unwrap_or_else(|e| {
            log::warn!(target: "wireless::acs", "reg is_band_enabled {:?} failed: {:?}, treat as disabled", band, e);
            false
        })
    }

    fn describe(&self, entry: &ChanEntry, state: ChannelState) -> ChannelDescriptor {
        let rule = self.reg.channel_rule(entry.freq).unwrap_or_else(|e| {
            log::warn!(target: "wireless::acs", "reg channel_rule freq={} failed: {:?}", entry.freq, e);
            RegRule::default()
        });
        ChannelDescriptor {
            freq_mhz: entry.freq,
            channel_number: entry.chan,
            band: entry.band,
            is_dfs: state == ChannelState::Dfs,
            is_passive: rule.no_ir || entry.flags & chan_flags::PASSIVE != 0,
            is_disabled: !state.is_usable(),
            max_reg_power: rule.max_reg_power,
            max_antenna_gain: rule.max_antenna_gain,
            reg_class: rule.reg_class,
        }
    }

    /// 任意已知信道的描述（含 disabled），用于强制信道与上报
    pub fn descriptor(&self, freq: u32) -> Option<ChannelDescriptor> {
        let entry = chan_table::lookup(freq)?;
        let state = self.state(freq);
        if state == ChannelState::Invalid {
            return None;
        }
        Some(self.describe(entry, state))
    }

    /// 仅当信道可用（Enabled/Dfs）且所在频段启用时返回描述
    pub fn usable_descriptor(&self, freq: u32) -> Option<ChannelDescriptor> {
        let entry = chan_table::lookup(freq)?;
        if !self.is_band_enabled(entry.band) {
            return None;
        }
        let state = self.state(freq);
        if !state.is_usable() {
            return None;
        }
        Some(self.describe(entry, state))
    }

    /// 按频段掩码追加所有可用信道到 out（频率升序）
    pub fn valid_channels(&self, mask: BandMask, out: &mut ChanList) -> Result<(), AcsError> {
        for band in [Band::TwoGhz, Band::FiveGhz, Band::SixGhz] {
            if !mask.contains(band) || !self.is_band_enabled(band) {
                continue;
            }
            for entry in chan_table::band_channels(band) {
                let state = self.state(entry.freq);
                if state.is_usable() {
                    out.insert_sorted(self.describe(entry, state))?;
                }
            }
        }
        Ok(())
    }

    /// freqs 中每个信道都可用
    pub fn all_usable(&self, freqs: impl IntoIterator<Item = u32>) -> bool {
        freqs.into_iter().all(|f| self.state(f).is_usable())
    }
}
