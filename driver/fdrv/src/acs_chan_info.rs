//! ACS 结果的信道信息（对应 hdd_get_acs_channel_info / wlan_hdd_set_acs_ch_range）
//!
//! 信道块按 IEEE 802.11 的 40/80/160 对齐规则划分：
//! 5G 的 36..144 与 149..177 各自从块首对齐，6G 从信道 1 对齐，
//! 2.4G 只有 40MHz，ch<=9 取 HT40+，其余取 HT40-。

use alloc::vec::Vec;
use ieee80211::{Band, ChanWidth};

use crate::acs_types::{AcsResult, HwMode};
use crate::regulatory::ChannelDescriptor;

/// ChannelInfoRecord.flags（对应 IEEE80211_CHAN_* 的上报子集）
pub mod chan_info_flags {
    pub const PASSIVE: u32 = 1 << 0;
    pub const DFS: u32 = 1 << 1;
    pub const HT20: u32 = 1 << 2;
    pub const HT40PLUS: u32 = 1 << 3;
    pub const HT40MINUS: u32 = 1 << 4;
    pub const VHT80: u32 = 1 << 5;
    pub const VHT160: u32 = 1 << 6;
}

/// 一个 20/40/80/160 信道块，first_freq 为最低的 20MHz 子信道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanBlock {
    pub first_freq: u32,
    pub n_sub: u32,
}

impl ChanBlock {
    /// freq 在 width 下所属的信道块；该频段不支持此带宽时返回 None
    pub fn of(desc: &ChannelDescriptor, width: ChanWidth) -> Option<Self> {
        let n_sub = match width {
            ChanWidth::NoHT | ChanWidth::TwentyMhz => {
                return Some(Self {
                    first_freq: desc.freq_mhz,
                    n_sub: 1,
                })
            }
            ChanWidth::FortyMhz => 2,
            ChanWidth::EightyMhz => 4,
            ChanWidth::OneSixtyMhz | ChanWidth::EightyPlus80Mhz => 8,
        };
        let ch = desc.channel_number as u32;
        let first_chan = match desc.band {
            Band::TwoGhz => {
                if n_sub != 2 || ch == 14 {
                    return None;
                }
                if ch <= 9 {
                    ch
                } else {
                    ch - 4
                }
            }
            Band::FiveGhz => {
                let base = if ch >= 149 { 149 } else { 36 };
                if ch < base {
                    return None;
                }
                base + (ch - base) / (4 * n_sub) * (4 * n_sub)
            }
            Band::SixGhz => ch.saturating_sub(1) / (4 * n_sub) * (4 * n_sub) + 1,
        };
        // 同频段内信道号与频率线性对应（5MHz/信道）
        let first_freq = desc.freq_mhz - (ch - first_chan) * 5;
        Some(Self { first_freq, n_sub })
    }

    pub fn center_freq(&self) -> u32 {
        self.first_freq + (self.n_sub - 1) * 10
    }

    /// 块内每个 20MHz 子信道的频率
    pub fn sub_freqs(&self) -> impl Iterator<Item = u32> {
        let first = self.first_freq;
        (0..self.n_sub).map(move |i| first + i * 20)
    }
}

/// HT40 次信道频率；20MHz 或无法成块时为 0
pub fn secondary_freq(desc: &ChannelDescriptor, width: ChanWidth) -> u32 {
    if width.mhz() < 40 {
        return 0;
    }
    match ChanBlock::of(desc, ChanWidth::FortyMhz) {
        Some(b) if b.first_freq == desc.freq_mhz => desc.freq_mhz + 20,
        Some(_) => desc.freq_mhz - 20,
        None => 0,
    }
}

/// (seg0, seg1) 中心频率：160MHz 时 seg0 为主 80 中心，seg1 为整个 160 中心
pub fn segment_centers(desc: &ChannelDescriptor, width: ChanWidth) -> (u32, u32) {
    let center = |w| ChanBlock::of(desc, w).map_or(desc.freq_mhz, |b| b.center_freq());
    match width {
        ChanWidth::NoHT | ChanWidth::TwentyMhz => (desc.freq_mhz, 0),
        ChanWidth::FortyMhz | ChanWidth::EightyMhz => (center(width), 0),
        ChanWidth::OneSixtyMhz | ChanWidth::EightyPlus80Mhz => {
            (center(ChanWidth::EightyMhz), center(ChanWidth::OneSixtyMhz))
        }
    }
}

/// 上报给用户态的单个信道信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInfoRecord {
    pub freq_mhz: u32,
    pub chan: u8,
    pub flags: u32,
    pub max_reg_power: i8,
    pub max_antenna_gain: u8,
    pub reg_class_id: u8,
    pub seg0_center_freq: u32,
    pub seg1_center_freq: u32,
}

impl ChannelInfoRecord {
    /// 按 width 生成；该信道撑不起 width 时逐级降到能成块的带宽
    pub fn new(desc: &ChannelDescriptor, width: ChanWidth) -> Self {
        use chan_info_flags::*;

        let mut w = width;
        while w.mhz() > 20 && ChanBlock::of(desc, w).is_none() {
            w = w.step_down();
        }
        let mut flags = 0;
        if desc.is_passive {
            flags |= PASSIVE;
        }
        if desc.is_dfs {
            flags |= DFS;
        }
        if w != ChanWidth::NoHT {
            flags |= HT20;
        }
        let sec = secondary_freq(desc, w);
        if sec > desc.freq_mhz {
            flags |= HT40PLUS;
        } else if sec != 0 {
            flags |= HT40MINUS;
        }
        if w.mhz() >= 80 {
            flags |= VHT80;
        }
        if w.mhz() >= 160 {
            flags |= VHT160;
        }
        let (seg0_center_freq, seg1_center_freq) = segment_centers(desc, w);
        Self {
            freq_mhz: desc.freq_mhz,
            chan: desc.channel_number,
            flags,
            max_reg_power: desc.max_reg_power,
            max_antenna_gain: desc.max_antenna_gain,
            reg_class_id: desc.reg_class,
            seg0_center_freq,
            seg1_center_freq,
        }
    }
}

pub struct AcsResultChannelInfo;

impl AcsResultChannelInfo {
    pub fn records<'a>(
        chans: impl Iterator<Item = &'a ChannelDescriptor>,
        width: ChanWidth,
    ) -> Vec<ChannelInfoRecord> {
        chans.map(|d| ChannelInfoRecord::new(d, width)).collect()
    }

    /// 由选中的主信道与最终带宽组装 AcsResult
    pub fn build<'a>(
        primary: &ChannelDescriptor,
        width: ChanWidth,
        hw_mode: HwMode,
        report: impl Iterator<Item = &'a ChannelDescriptor>,
    ) -> AcsResult {
        let (seg0_center_freq, seg1_center_freq) = segment_centers(primary, width);
        AcsResult {
            primary_freq: primary.freq_mhz,
            secondary_freq: secondary_freq(primary, width),
            seg0_center_freq,
            seg1_center_freq,
            final_width: width,
            hw_mode,
            per_channel_info: Self::records(report, width),
        }
    }
}
