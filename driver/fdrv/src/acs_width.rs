//! 带宽决策（对应 wlan_hdd_set_acs_ch_range 与 hdd_update_acs_sap_config 中的 ch_width 处理）

use ieee80211::{is_24ghz, ChanWidth, HtCap, VhtCap};

use crate::acs_chan_info::ChanBlock;
use crate::acs_policy::AcsPolicy;
use crate::acs_types::AcsConfig;
use crate::regulatory::{ChannelDescriptor, Regulatory, RegulatoryFilter};

/// 硬件能力（来自 wiphy 的 ht_cap/vht_cap）
#[derive(Debug, Clone, Copy, Default)]
pub struct WidthCaps {
    pub ht: HtCap,
    pub vht: VhtCap,
}

impl WidthCaps {
    /// 硬件能支持的最大带宽
    pub fn max_width(&self) -> ChanWidth {
        if !self.ht.ht_supported {
            ChanWidth::TwentyMhz
        } else if !self.ht.supports_40mhz() {
            ChanWidth::TwentyMhz
        } else if !self.vht.vht_supported {
            ChanWidth::FortyMhz
        } else if !self.vht.supports_160mhz() {
            ChanWidth::EightyMhz
        } else {
            ChanWidth::OneSixtyMhz
        }
    }
}

pub struct ChannelWidthResolver;

impl ChannelWidthResolver {
    /// 候选集合整体的带宽；freq_range 为候选集合的 (最低, 最高) 频率
    pub fn resolve(
        config: &AcsConfig,
        policy: &AcsPolicy,
        caps: &WidthCaps,
        freq_range: Option<(u32, u32)>,
    ) -> ChanWidth {
        let requested = config.requested_width;
        let mut width = match requested {
            ChanWidth::EightyPlus80Mhz => ChanWidth::EightyMhz,
            w => w,
        };
        if !config.ht_enabled {
            width = width.min(ChanWidth::TwentyMhz);
        }
        let vht = config.vht_enabled && !policy.force_11n_for_11ac;
        if !vht && width.mhz() > 40 {
            width = if config.ht40_enabled {
                ChanWidth::FortyMhz
            } else {
                ChanWidth::TwentyMhz
            };
        }
        if width == ChanWidth::FortyMhz && !config.ht40_enabled {
            width = ChanWidth::TwentyMhz;
        }
        width = width.min(policy.vht_width_cap).min(caps.max_width());

        if let Some((lo, hi)) = freq_range {
            if is_24ghz(lo) && is_24ghz(hi) {
                let cap = if policy.chan_bonding_24g {
                    ChanWidth::FortyMhz
                } else {
                    ChanWidth::TwentyMhz
                };
                width = width.min(cap);
            }
        }
        if width != requested {
            log::info!(target: "wireless::acs", "acs width: requested {:?} -> {:?} (vht={}, ht40={}, force_11n={})",
                requested, width, config.vht_enabled, config.ht40_enabled, policy.force_11n_for_11ac);
        }
        width
    }

    /// 按选中主信道再降带宽，直到块内每个 20MHz 子信道都可用；
    /// 2.4G 主信道在未开 bonding 时只用 20MHz
    pub fn fit_to_channel<R: Regulatory + ?Sized>(
        width: ChanWidth,
        primary: &ChannelDescriptor,
        policy: &AcsPolicy,
        reg: &RegulatoryFilter<'_, R>,
    ) -> ChanWidth {
        let mut w = width;
        if is_24ghz(primary.freq_mhz) && !policy.chan_bonding_24g && w.mhz() > 20 {
            log::info!(target: "wireless::acs", "acs width: 2.4G primary {} without bonding, {:?} -> 20", primary.freq_mhz, w);
            w = ChanWidth::TwentyMhz;
        }
        loop {
            if w.mhz() <= 20 {
                return w;
            }
            if let Some(block) = ChanBlock::of(primary, w) {
                if reg.all_usable(block.sub_freqs()) {
                    return w;
                }
            }
            log::debug!(target: "wireless::acs", "acs width: {:?} not usable around {}, step down", w, primary.freq_mhz);
            w = w.step_down();
        }
    }
}
