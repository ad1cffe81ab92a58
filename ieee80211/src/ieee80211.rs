//! IEEE 802.11 频段与信道换算
//!
//! 对应 Linux include/linux/ieee80211.h 与 net/wireless/util.c 中
//! ieee80211_channel_to_frequency / ieee80211_frequency_to_channel。

/// 2.4G 信道 1 之前的基准频率
pub const BASE_FREQ_2GHZ: u32 = 2407;
/// 5G 基准频率
pub const BASE_FREQ_5GHZ: u32 = 5000;
/// 6G 基准频率（信道 1 = 5955）
pub const BASE_FREQ_6GHZ: u32 = 5950;
/// 信道 14 是特例
pub const FREQ_CHAN_14: u32 = 2484;

/// 频段（对应 NL80211_BAND_*）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Band {
    #[default]
    TwoGhz = 0,
    FiveGhz = 1,
    SixGhz = 2,
}

impl Band {
    /// 频段位（用于 band mask）
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// 信道（对应 struct ieee80211_channel，简化）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// 中心频率 MHz
    pub center_freq: u32,
    /// 信道号
    pub hw_value: u8,
    /// 频段
    pub band: Band,
}

impl Channel {
    /// 由频率构造；不在任何频段内时返回 None
    pub fn from_freq(freq_mhz: u32) -> Option<Self> {
        let band = band_of_freq(freq_mhz)?;
        let hw_value = freq_to_chan(freq_mhz)?;
        Some(Self {
            center_freq: freq_mhz,
            hw_value,
            band,
        })
    }
}

#[inline]
pub fn is_24ghz(freq_mhz: u32) -> bool {
    (2412..=FREQ_CHAN_14).contains(&freq_mhz)
}

#[inline]
pub fn is_5ghz(freq_mhz: u32) -> bool {
    (5150..=5895).contains(&freq_mhz)
}

/// 6G：5955..=7115（信道 1..233）
#[inline]
pub fn is_6ghz(freq_mhz: u32) -> bool {
    (5955..=7115).contains(&freq_mhz)
}

pub fn band_of_freq(freq_mhz: u32) -> Option<Band> {
    if is_24ghz(freq_mhz) {
        Some(Band::TwoGhz)
    } else if is_5ghz(freq_mhz) {
        Some(Band::FiveGhz)
    } else if is_6ghz(freq_mhz) {
        Some(Band::SixGhz)
    } else {
        None
    }
}

/// 频率 -> 信道号（对应 ieee80211_frequency_to_channel）
pub fn freq_to_chan(freq_mhz: u32) -> Option<u8> {
    if freq_mhz == FREQ_CHAN_14 {
        return Some(14);
    }
    let (base, step_ok) = if is_24ghz(freq_mhz) {
        (BASE_FREQ_2GHZ, (freq_mhz - BASE_FREQ_2GHZ) % 5 == 0)
    } else if is_6ghz(freq_mhz) {
        (BASE_FREQ_6GHZ, (freq_mhz - BASE_FREQ_6GHZ) % 5 == 0)
    } else if is_5ghz(freq_mhz) {
        (BASE_FREQ_5GHZ, (freq_mhz - BASE_FREQ_5GHZ) % 5 == 0)
    } else {
        return None;
    };
    if !step_ok {
        return None;
    }
    u8::try_from((freq_mhz - base) / 5).ok()
}

/// 信道号 -> 频率（对应 ieee80211_channel_to_frequency）
pub fn chan_to_freq(chan: u8, band: Band) -> Option<u32> {
    let chan = chan as u32;
    let freq = match band {
        Band::TwoGhz => match chan {
            14 => FREQ_CHAN_14,
            1..=13 => BASE_FREQ_2GHZ + chan * 5,
            _ => return None,
        },
        Band::FiveGhz => match chan {
            32..=177 => BASE_FREQ_5GHZ + chan * 5,
            _ => return None,
        },
        Band::SixGhz => match chan {
            1..=233 => BASE_FREQ_6GHZ + chan * 5,
            _ => return None,
        },
    };
    Some(freq)
}
