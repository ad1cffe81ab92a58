//! Vendor 命令
//! 对应 aic_vendor.c, aic_vendor.h
//!
//! DO_ACS 请求的输入形状与 ACS 完成事件（nl80211 vendor command / event）。
//! netlink 属性的编解码不在这里，调用方已解析成下面的结构。

use alloc::vec::Vec;
use axerrno::LinuxError;
use ieee80211::{chan_to_freq, freq_to_chan, Band, ChanWidth, Nl80211Iftype};

use crate::acs_types::{AcsConfig, AcsResult, HwMode};

/// Vendor OUI - AICSemi
pub const AIC_OUI: [u8; 3] = [0x00, 0xA0, 0xC5];

/// Vendor 子命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum VendorSubcmd {
    /// LTE 共存避让频段事件
    AvoidFrequency = 10,
    /// 请求 ACS；完成后以同一子命令上报 AcsChannelSelectEvent
    DoAcs = 54,
}

impl VendorSubcmd {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            10 => Some(Self::AvoidFrequency),
            54 => Some(Self::DoAcs),
            _ => None,
        }
    }
}

/// DO_ACS 请求（hostapd 下发）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcsRequest {
    pub hw_mode: HwMode,
    pub ht_enabled: bool,
    pub ht40_enabled: bool,
    pub vht_enabled: bool,
    /// MHz：20/40/80/160，0 表示未给出（按 20 处理）
    pub chan_width: u32,
    pub channel_list: Option<Vec<u8>>,
    /// 与 channel_list 同时给出时优先
    pub freq_list: Option<Vec<u32>>,
}

impl AcsRequest {
    /// 转为 AcsConfig；带宽非法返回 -EINVAL
    pub fn into_config(self, iface_type: Nl80211Iftype) -> Result<AcsConfig, i32> {
        let requested_width = match self.chan_width {
            0 => ChanWidth::TwentyMhz,
            w => ChanWidth::from_mhz(w).ok_or_else(|| {
                log::warn!(target: "wireless::fdrv", "vendor do_acs: bad chan_width {}", w);
                -LinuxError::EINVAL.code()
            })?,
        };
        let explicit_freq_list = match (self.freq_list, self.channel_list) {
            (Some(freqs), _) => Some(freqs),
            (None, Some(chans)) => Some(chans.iter().filter_map(|&c| Self::chan_freq(c)).collect()),
            (None, None) => None,
        };
        Ok(AcsConfig {
            iface_type,
            requested_width,
            hw_mode: self.hw_mode,
            ht_enabled: self.ht_enabled,
            ht40_enabled: self.ht40_enabled,
            vht_enabled: self.vht_enabled,
            band_filter: self.hw_mode.band_mask(),
            explicit_freq_list,
        })
    }

    /// channel_list 只含 2.4G 与 5G 信道号
    fn chan_freq(chan: u8) -> Option<u32> {
        let band = if chan <= 14 { Band::TwoGhz } else { Band::FiveGhz };
        chan_to_freq(chan, band)
    }
}

/// ACS 完成事件（对应 QCA_WLAN_VENDOR_ATTR_ACS_* 上报）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcsChannelSelectEvent {
    pub pri_channel: u8,
    pub sec_channel: u8,
    pub vht_seg0_center_channel: u8,
    pub vht_seg1_center_channel: u8,
    pub pri_freq: u32,
    pub sec_freq: u32,
    pub seg0_center_freq: u32,
    pub seg1_center_freq: u32,
    /// MHz
    pub chan_width: u32,
    pub hw_mode: HwMode,
}

impl AcsChannelSelectEvent {
    pub fn from_result(r: &AcsResult) -> Self {
        let chan = |f: u32| if f == 0 { 0 } else { freq_to_chan(f).unwrap_or(0) };
        Self {
            pri_channel: chan(r.primary_freq),
            sec_channel: chan(r.secondary_freq),
            vht_seg0_center_channel: chan(r.seg0_center_freq),
            vht_seg1_center_channel: chan(r.seg1_center_freq),
            pri_freq: r.primary_freq,
            sec_freq: r.secondary_freq,
            seg0_center_freq: r.seg0_center_freq,
            seg1_center_freq: r.seg1_center_freq,
            chan_width: r.final_width.mhz(),
            hw_mode: r.hw_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn channel_list_converted_to_freqs() {
        let req = AcsRequest {
            hw_mode: HwMode::Any,
            ht_enabled: true,
            chan_width: 40,
            ht40_enabled: true,
            channel_list: Some(vec![1, 6, 36, 149, 200]),
            ..AcsRequest::default()
        };
        let cfg = req.into_config(Nl80211Iftype::Ap).unwrap();
        assert_eq!(cfg.explicit_freq_list, Some(vec![2412, 2437, 5180, 5745]));
        assert_eq!(cfg.requested_width, ChanWidth::FortyMhz);
        assert!(cfg.band_filter.is_all());
    }

    #[test]
    fn freq_list_wins_and_bad_width_rejected() {
        let req = AcsRequest {
            hw_mode: HwMode::A,
            channel_list: Some(vec![36]),
            freq_list: Some(vec![5955, 5975]),
            ..AcsRequest::default()
        };
        let cfg = req.clone().into_config(Nl80211Iftype::P2pGo).unwrap();
        assert_eq!(cfg.explicit_freq_list, Some(vec![5955, 5975]));
        assert_eq!(cfg.requested_width, ChanWidth::TwentyMhz);
        assert_eq!(
            AcsRequest {
                chan_width: 60,
                ..req
            }
            .into_config(Nl80211Iftype::Ap),
            Err(-22)
        );
        assert_eq!(VendorSubcmd::from_u32(54), Some(VendorSubcmd::DoAcs));
        assert_eq!(VendorSubcmd::from_u32(1), None);
    }

    #[test]
    fn event_carries_channel_numbers() {
        let r = AcsResult {
            primary_freq: 5765,
            secondary_freq: 5745,
            seg0_center_freq: 5775,
            seg1_center_freq: 0,
            final_width: ChanWidth::EightyMhz,
            hw_mode: HwMode::A,
            per_channel_info: Vec::new(),
        };
        let ev = AcsChannelSelectEvent::from_result(&r);
        assert_eq!(
            (ev.pri_channel, ev.sec_channel, ev.vht_seg0_center_channel, ev.vht_seg1_center_channel),
            (153, 149, 155, 0)
        );
        assert_eq!(ev.chan_width, 80);
    }
}
