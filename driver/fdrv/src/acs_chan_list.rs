//! ACS 初始候选表（对应 wlan_hdd_cfg80211_do_acs 中 freq_list 的构建）
//!
//! 显式频率列表优先；列表为空或全部无法识别时退回按频段向监管查询。
//! 结果扣除避让频率后写入 arena 的 master，候选集合初始化为 master 全部。

use crate::acs_types::{AcsConfig, AcsError, ConfigError};
use crate::avoid_freq::AvoidSnapshot;
use crate::chan_list::AcsChanArena;
use crate::regulatory::{Regulatory, RegulatoryFilter};

pub struct AcsChannelListBuilder;

impl AcsChannelListBuilder {
    /// 建表，返回候选数
    pub fn build<R: Regulatory + ?Sized>(
        config: &AcsConfig,
        reg: &RegulatoryFilter<'_, R>,
        avoid: &AvoidSnapshot,
        arena: &mut AcsChanArena,
    ) -> Result<usize, AcsError> {
        arena.reset();
        let master = arena.master_mut();

        if let Some(list) = config.explicit_freq_list.as_deref() {
            for &freq in list {
                match reg.usable_descriptor(freq) {
                    Some(d) => master.insert_sorted(d)?,
                    None => {
                        log::debug!(target: "wireless::acs", "acs build: drop unusable freq {}", freq)
                    }
                }
            }
            if master.is_empty() {
                log::info!(target: "wireless::acs", "acs build: explicit list resolved to nothing, query band {:?}", config.band_filter);
            }
        }
        if master.is_empty() {
            reg.valid_channels(config.band_filter, master)?;
        }
        if master.is_empty() {
            log::error!(target: "wireless::acs", "acs build: no channel in band {:?}", config.band_filter);
            return Err(ConfigError::EmptyCandidateSet.into());
        }

        if !avoid.is_empty() {
            let before = master.len();
            master.retain(|d| !avoid.is_avoided(d.freq_mhz));
            log::info!(target: "wireless::acs", "acs build: avoid list removed {} channels", before - master.len());
            if master.is_empty() {
                log::error!(target: "wireless::acs", "acs build: every candidate is avoided");
                return Err(ConfigError::EmptyCandidateSet.into());
            }
        }

        arena.activate_all();
        log::debug!(target: "wireless::acs", "acs build: {} candidates {:?}", arena.master().len(), arena.master());
        Ok(arena.master().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avoid_freq::{ChannelAvoidanceRegistry, FreqRange};
    use crate::acs_types::HwMode;
    use crate::chan_table::BandMask;
    use crate::regulatory::ChannelState;
    use crate::test_util::{active_freqs, MockReg};
    use alloc::vec;
    use ieee80211::Nl80211Iftype;

    fn config(list: Option<alloc::vec::Vec<u32>>, hw_mode: HwMode) -> AcsConfig {
        let mut c = AcsConfig::new(Nl80211Iftype::Ap, hw_mode);
        c.explicit_freq_list = list;
        c
    }

    #[test]
    fn explicit_list_is_sorted_and_filtered() {
        let reg = MockReg::default().with_state(5180, ChannelState::Disabled);
        let f = RegulatoryFilter::new(&reg);
        let mut arena = AcsChanArena::new();
        let cfg = config(Some(vec![5745, 2412, 5180, 1234, 2412, 5190]), HwMode::Any);
        let n = AcsChannelListBuilder::build(&cfg, &f, &AvoidSnapshot::EMPTY, &mut arena).unwrap();
        assert_eq!(n, 2);
        assert_eq!(active_freqs(&arena), [2412, 5745]);
    }

    #[test]
    fn unresolvable_explicit_list_falls_back_to_band_query() {
        let reg = MockReg::default();
        let f = RegulatoryFilter::new(&reg);
        let mut arena = AcsChanArena::new();
        let cfg = config(Some(vec![1234]), HwMode::G);
        AcsChannelListBuilder::build(&cfg, &f, &AvoidSnapshot::EMPTY, &mut arena).unwrap();
        assert_eq!(arena.active_len(), 13);
        assert!(arena.active().all(|d| d.band == ieee80211::Band::TwoGhz));
    }

    #[test]
    fn avoided_channels_are_removed() {
        let reg = MockReg::default();
        let f = RegulatoryFilter::new(&reg);
        let avoid = ChannelAvoidanceRegistry::new();
        avoid.set_operator_freqs(&[2417]).unwrap();
        avoid.set_coex_ranges(&[FreqRange::new(2424, 2426)]).unwrap();
        let mut arena = AcsChanArena::new();
        let cfg = config(Some(vec![2412, 2417, 2422, 2427, 2437]), HwMode::G);
        AcsChannelListBuilder::build(&cfg, &f, &avoid.snapshot(), &mut arena).unwrap();
        // 2422/2427 与 2424-2426 重叠
        assert_eq!(active_freqs(&arena), [2412, 2437]);
        assert_eq!(arena.master().len(), 2);
    }

    #[test]
    fn empty_everywhere_is_fatal() {
        let reg = MockReg::default().with_band_disabled(ieee80211::Band::TwoGhz);
        let f = RegulatoryFilter::new(&reg);
        let mut arena = AcsChanArena::new();
        let mut cfg = config(Some(vec![]), HwMode::G);
        cfg.band_filter = BandMask::BAND_2G;
        assert_eq!(
            AcsChannelListBuilder::build(&cfg, &f, &AvoidSnapshot::EMPTY, &mut arena),
            Err(AcsError::Config(ConfigError::EmptyCandidateSet))
        );

        let reg = MockReg::default();
        let f = RegulatoryFilter::new(&reg);
        let avoid = ChannelAvoidanceRegistry::new();
        avoid.set_coex_ranges(&[FreqRange::new(2400, 2500)]).unwrap();
        let cfg = config(None, HwMode::G);
        assert_eq!(
            AcsChannelListBuilder::build(&cfg, &f, &avoid.snapshot(), &mut arena),
            Err(AcsError::Config(ConfigError::EmptyCandidateSet))
        );
    }

    #[test]
    fn build_is_idempotent() {
        let reg = MockReg::default();
        let f = RegulatoryFilter::new(&reg);
        let avoid = ChannelAvoidanceRegistry::new();
        avoid.set_operator_freqs(&[5200]).unwrap();
        let snap = avoid.snapshot();
        for cfg in [config(None, HwMode::Any), config(Some(vec![5260, 5180, 5200, 2437]), HwMode::A)] {
            let mut a = AcsChanArena::new();
            let mut b = AcsChanArena::new();
            AcsChannelListBuilder::build(&cfg, &f, &snap, &mut a).unwrap();
            AcsChannelListBuilder::build(&cfg, &f, &snap, &mut b).unwrap();
            assert_eq!(active_freqs(&a), active_freqs(&b));
            assert_eq!(a.master().as_slice(), b.master().as_slice());
        }
    }
}
