//! 静态信道表（对应 rwnx_main.c 中 rwnx_channels_24 / rwnx_channels_5g / 6G 表）
//!
//! 每项只描述“硬件可能支持的信道”及默认标志，是否可用由 regulatory 决定。

use ieee80211::Band;

/// 信道默认标志（对应 IEEE80211_CHAN_*）
pub mod chan_flags {
    /// 不允许主动发起（NO_IR / PASSIVE_SCAN）
    pub const PASSIVE: u32 = 1 << 0;
    /// 需要雷达检测
    pub const DFS: u32 = 1 << 1;
    pub const DISABLED: u32 = 1 << 2;
}

/// 信道表项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanEntry {
    pub freq: u32,
    pub chan: u8,
    pub band: Band,
    pub flags: u32,
}

impl ChanEntry {
    const EMPTY: Self = Self {
        freq: 0,
        chan: 0,
        band: Band::TwoGhz,
        flags: 0,
    };
}

/// 频段掩码（hw_mode / band_filter 使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandMask(pub u8);

impl BandMask {
    pub const NONE: Self = Self(0);
    pub const BAND_2G: Self = Self(Band::TwoGhz.bit());
    pub const BAND_5G: Self = Self(Band::FiveGhz.bit());
    pub const BAND_6G: Self = Self(Band::SixGhz.bit());
    pub const ALL: Self = Self(Band::TwoGhz.bit() | Band::FiveGhz.bit() | Band::SixGhz.bit());

    pub const fn contains(self, band: Band) -> bool {
        self.0 & band.bit() != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_all(self) -> bool {
        self.0 & Self::ALL.0 == Self::ALL.0
    }
}

const fn chan_freq(chan: u8, band: Band) -> u32 {
    match band {
        Band::TwoGhz => {
            if chan == 14 {
                2484
            } else {
                2407 + chan as u32 * 5
            }
        }
        Band::FiveGhz => 5000 + chan as u32 * 5,
        Band::SixGhz => 5950 + chan as u32 * 5,
    }
}

const fn entry(chan: u8, band: Band, flags: u32) -> ChanEntry {
    ChanEntry {
        freq: chan_freq(chan, band),
        chan,
        band,
        flags,
    }
}

pub const N_CHANNELS_2G: usize = 14;
pub const N_CHANNELS_5G: usize = 28;
pub const N_CHANNELS_6G: usize = 59;
/// 信道表总数
pub const UNIVERSE_SIZE: usize = N_CHANNELS_2G + N_CHANNELS_5G + N_CHANNELS_6G;

const CHAN_5G_NUMS: [u8; N_CHANNELS_5G] = [
    36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
    149, 153, 157, 161, 165, 169, 173, 177,
];

const fn build_2g() -> [ChanEntry; N_CHANNELS_2G] {
    let mut out = [ChanEntry::EMPTY; N_CHANNELS_2G];
    let mut i = 0;
    while i < N_CHANNELS_2G {
        let chan = i as u8 + 1;
        // 12-14 默认被动
        let flags = if chan >= 12 { chan_flags::PASSIVE } else { 0 };
        out[i] = entry(chan, Band::TwoGhz, flags);
        i += 1;
    }
    out
}

const fn build_5g() -> [ChanEntry; N_CHANNELS_5G] {
    let mut out = [ChanEntry::EMPTY; N_CHANNELS_5G];
    let mut i = 0;
    while i < N_CHANNELS_5G {
        let chan = CHAN_5G_NUMS[i];
        let flags = if chan >= 52 && chan <= 144 { chan_flags::DFS } else { 0 };
        out[i] = entry(chan, Band::FiveGhz, flags);
        i += 1;
    }
    out
}

const fn build_6g() -> [ChanEntry; N_CHANNELS_6G] {
    let mut out = [ChanEntry::EMPTY; N_CHANNELS_6G];
    let mut i = 0;
    while i < N_CHANNELS_6G {
        out[i] = entry(1 + (i as u8) * 4, Band::SixGhz, 0);
        i += 1;
    }
    out
}

pub static CHANNELS_2G: [ChanEntry; N_CHANNELS_2G] = build_2g();
pub static CHANNELS_5G: [ChanEntry; N_CHANNELS_5G] = build_5g();
pub static CHANNELS_6G: [ChanEntry; N_CHANNELS_6G] = build_6g();

/// 某频段的全部信道（按频率升序）
pub fn band_channels(band: Band) -> &'static [ChanEntry] {
    match band {
        Band::TwoGhz => &CHANNELS_2G,
        Band::FiveGhz => &CHANNELS_5G,
        Band::SixGhz => &CHANNELS_6G,
    }
}

/// 全部信道，按频率升序（2.4G < 5G < 6G）
pub fn universe() -> impl Iterator<Item = &'static ChanEntry> {
    CHANNELS_2G.iter().chain(CHANNELS_5G.iter()).chain(CHANNELS_6G.iter())
}

/// 按频率查表
pub fn lookup(freq: u32) -> Option<&'static ChanEntry> {
    let band = ieee80211::band_of_freq(freq)?;
    band_channels(band).iter().find(|e| e.freq == freq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted_and_consistent() {
        let mut prev = 0;
        let mut n = 0;
        for e in universe() {
            assert!(e.freq > prev, "freq {} not ascending", e.freq);
            assert_eq!(ieee80211::freq_to_chan(e.freq), Some(e.chan));
            assert_eq!(ieee80211::band_of_freq(e.freq), Some(e.band));
            prev = e.freq;
            n += 1;
        }
        assert_eq!(n, UNIVERSE_SIZE);
    }

    #[test]
    fn lookup_and_default_flags() {
        assert_eq!(lookup(2412).map(|e| e.chan), Some(1));
        assert_eq!(lookup(2484).map(|e| e.flags), Some(chan_flags::PASSIVE));
        assert_eq!(lookup(5260).map(|e| e.flags), Some(chan_flags::DFS));
        assert_eq!(lookup(5745).map(|e| e.flags), Some(0));
        assert_eq!(lookup(6135).map(|e| e.chan), Some(37));
        // 5G 非 20MHz 栅格
        assert!(lookup(5190).is_none());
        assert!(lookup(1000).is_none());
    }

    #[test]
    fn band_mask_ops() {
        assert!(BandMask::ALL.contains(Band::SixGhz));
        assert!(!BandMask::BAND_2G.contains(Band::FiveGhz));
        assert!(BandMask::BAND_5G.union(BandMask::BAND_6G).contains(Band::SixGhz));
        assert!(BandMask::ALL.is_all());
        assert!(!BandMask::BAND_2G.is_all());
    }
}
