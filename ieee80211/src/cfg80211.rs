//! cfg80211 抽象
//!
//! 对应 Linux net/cfg80211.h：接口类型、信道带宽与 chandef。
//! ACS 结果最终以 ChanDef 形式交给 start_ap。

/// 虚拟接口类型（对应 NL80211_IFTYPE_*）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Nl80211Iftype {
    #[default]
    Unspecified = 0,
    AdHoc = 1,
    Station = 2,
    Ap = 3,
    ApVlan = 4,
    Wds = 5,
    Monitor = 6,
    MeshPoint = 7,
    P2pClient = 8,
    P2pGo = 9,
    P2pDevice = 10,
}

impl Nl80211Iftype {
    /// 是否发 beacon 的接口（AP / P2P-GO / IBSS）
    pub const fn is_beaconing(self) -> bool {
        matches!(self, Self::Ap | Self::P2pGo | Self::AdHoc)
    }

    /// 是否作为客户端连接（STA / P2P-Client）
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Station | Self::P2pClient)
    }
}

/// 虚拟接口句柄（由驱动分配，对应 net_device 的“逻辑接口”）
pub type Ifindex = u32;

/// 信道带宽（对应 enum nl80211_chan_width）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ChanWidth {
    #[default]
    NoHT = 0,
    TwentyMhz = 1,
    FortyMhz = 2,
    EightyMhz = 3,
    EightyPlus80Mhz = 4,
    OneSixtyMhz = 5,
}

impl ChanWidth {
    /// 占用带宽 MHz（80+80 按 160 计）
    pub const fn mhz(self) -> u32 {
        match self {
            Self::NoHT | Self::TwentyMhz => 20,
            Self::FortyMhz => 40,
            Self::EightyMhz => 80,
            Self::EightyPlus80Mhz | Self::OneSixtyMhz => 160,
        }
    }

    /// 由 MHz 取带宽；非法值返回 None
    pub const fn from_mhz(mhz: u32) -> Option<Self> {
        match mhz {
            20 => Some(Self::TwentyMhz),
            40 => Some(Self::FortyMhz),
            80 => Some(Self::EightyMhz),
            160 => Some(Self::OneSixtyMhz),
            _ => None,
        }
    }

    /// 降一级：160/80+80 -> 80 -> 40 -> 20
    pub const fn step_down(self) -> Self {
        match self {
            Self::OneSixtyMhz | Self::EightyPlus80Mhz => Self::EightyMhz,
            Self::EightyMhz => Self::FortyMhz,
            Self::FortyMhz => Self::TwentyMhz,
            Self::TwentyMhz | Self::NoHT => self,
        }
    }

    /// 取两者中较窄者
    pub fn min(self, other: Self) -> Self {
        if other.mhz() < self.mhz() {
            other
        } else {
            self
        }
    }
}

/// 信道定义（对应 struct cfg80211_chan_def），频率均为 MHz，0 表示未用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChanDef {
    pub primary_freq: u32,
    pub width: ChanWidth,
    pub center_freq1: u32,
    pub center_freq2: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ordering_helpers() {
        assert_eq!(ChanWidth::OneSixtyMhz.step_down(), ChanWidth::EightyMhz);
        assert_eq!(ChanWidth::TwentyMhz.step_down(), ChanWidth::TwentyMhz);
        assert_eq!(ChanWidth::EightyMhz.min(ChanWidth::FortyMhz), ChanWidth::FortyMhz);
        assert_eq!(ChanWidth::from_mhz(80), Some(ChanWidth::EightyMhz));
        assert_eq!(ChanWidth::from_mhz(30), None);
        assert_eq!(ChanWidth::EightyPlus80Mhz.mhz(), 160);
    }

    #[test]
    fn iftype_roles() {
        assert!(Nl80211Iftype::P2pGo.is_beaconing());
        assert!(Nl80211Iftype::P2pClient.is_client());
        assert!(!Nl80211Iftype::Station.is_beaconing());
    }
}
