//! mac80211 抽象
//!
//! 对应 Linux net/mac80211.h 中 ieee80211_sta_ht_cap / ieee80211_sta_vht_cap，
//! ACS 用它们判断硬件能支持的最大带宽。

/// IEEE80211_HT_CAP_SUP_WIDTH_20_40
pub const HT_CAP_SUP_WIDTH_20_40: u16 = 1 << 1;

/// IEEE80211_VHT_CAP_SUPP_CHAN_WIDTH_MASK 内取值
pub const VHT_CAP_SUPP_CHAN_WIDTH_MASK: u32 = 0x0000_000C;
pub const VHT_CAP_SUPP_CHAN_WIDTH_160MHZ: u32 = 0x0000_0004;
pub const VHT_CAP_SUPP_CHAN_WIDTH_160_80PLUS80MHZ: u32 = 0x0000_0008;

/// HT 能力（简化，对应 ieee80211_sta_ht_cap）
#[derive(Debug, Clone, Copy, Default)]
pub struct HtCap {
    pub ht_supported: bool,
    pub cap: u16,
}

impl HtCap {
    pub const fn supports_40mhz(&self) -> bool {
        self.ht_supported && (self.cap & HT_CAP_SUP_WIDTH_20_40) != 0
    }
}

/// VHT 能力（简化，对应 ieee80211_sta_vht_cap）
#[derive(Debug, Clone, Copy, Default)]
pub struct VhtCap {
    pub vht_supported: bool,
    pub cap: u32,
}

impl VhtCap {
    pub const fn supports_160mhz(&self) -> bool {
        self.vht_supported && (self.cap & VHT_CAP_SUPP_CHAN_WIDTH_MASK) != 0
    }
}
