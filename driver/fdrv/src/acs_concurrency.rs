//! 并发约束（对应 wlan_hdd_cfg80211_do_acs 中的频段限制与 wlan_hdd_sap_cfg_dfs_override）
//!
//! - 两个已有连接挤在同一个 radio 上时，新 AP 只用 PCL 首项所在频段之外的频段。
//! - 已有 beacon 会话工作在 DFS 信道时，新 AP 必须与它同信道（SCC），
//!   因为同一 radio 上的两个 beacon 接口无法各自做 CAC。

use ieee80211::{is_24ghz, ChanWidth, Ifindex};

use crate::acs_policy::AcsPolicy;
use crate::acs_types::{AcsConfig, AcsError};
use crate::chan_list::AcsChanArena;
use crate::chan_table::BandMask;
use crate::policy_mgr::{ConcurrencyState, ConnectionRecord, WeightedChannel};

/// AP 会话当前的信道配置，频率均为 MHz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApChanConfig {
    pub primary_freq: u32,
    pub secondary_freq: u32,
    pub seg0_center_freq: u32,
    pub seg1_center_freq: u32,
    pub width: ChanWidth,
}

impl ApChanConfig {
    /// 只知道工作频率时的 20MHz 配置
    pub fn twenty(freq: u32) -> Self {
        Self {
            primary_freq: freq,
            secondary_freq: 0,
            seg0_center_freq: freq,
            seg1_center_freq: 0,
            width: ChanWidth::TwentyMhz,
        }
    }
}

/// 其它 AP/GO 会话的只读视图（由 AcsManager 提供）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerApSession {
    pub vdev_id: Ifindex,
    /// 该会话的信道由 ACS 选出
    pub acs_auto: bool,
    /// 配置序号，越大越新
    pub config_seq: u64,
    pub chan: ApChanConfig,
}

/// DFS 强制 SCC 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsOverride {
    /// 已有会话是 ACS 选的：候选集合收缩为该信道
    ForceChannel(u32),
    /// 已有会话是手动配置：整份信道配置照搬，跳过后续流程
    CopyConfig(ApChanConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConcurrencyOutcome {
    pub restricted_to: Option<BandMask>,
    pub dfs_override: Option<DfsOverride>,
}

pub struct ConcurrencyConstraintResolver;

impl ConcurrencyConstraintResolver {
    /// own 为发起 ACS 的接口
    pub fn resolve(
        own: Ifindex,
        config: &AcsConfig,
        arena: &mut AcsChanArena,
        conc: &ConcurrencyState,
        pcl: &[WeightedChannel],
        peers: &[PeerApSession],
        policy: &AcsPolicy,
    ) -> Result<ConcurrencyOutcome, AcsError> {
        let restricted_to = Self::band_restriction(config, conc, pcl);
        if let Some(mask) = restricted_to {
            arena.retain_active(|d| mask.contains(d.band));
            // 回退只能从限制后的集合里挑
            arena.rebase_master();
            log::info!(target: "wireless::acs", "acs conc: same radio for 2 connections (dbs={}), restrict to band {:?}, {} left",
                policy.hw_dbs_capable, mask, arena.active_len());
        }
        let dfs_override = Self::dfs_override(own, conc, peers)?;
        Ok(ConcurrencyOutcome {
            restricted_to,
            dfs_override,
        })
    }

    /// 两个连接共用一个 radio 且请求不限频段时，返回允许的频段
    pub fn band_restriction(
        config: &AcsConfig,
        conc: &ConcurrencyState,
        pcl: &[WeightedChannel],
    ) -> Option<BandMask> {
        if conc.connection_count != 2 || !config.band_filter.is_all() {
            return None;
        }
        let [a, b] = conc.connections.as_slice() else {
            return None;
        };
        if a.radio_id != b.radio_id {
            return None;
        }
        let first = pcl.first()?;
        if is_24ghz(first.freq_mhz) {
            Some(BandMask::BAND_5G.union(BandMask::BAND_6G))
        } else {
            Some(BandMask::BAND_2G)
        }
    }

    /// 其它 beacon 会话（取配置最新的一个）在 DFS 信道上时强制 SCC；
    /// own 自己的旧连接不计入
    pub fn dfs_override(
        own: Ifindex,
        conc: &ConcurrencyState,
        peers: &[PeerApSession],
    ) -> Result<Option<DfsOverride>, AcsError> {
        let peer_of = |c: &ConnectionRecord| peers.iter().find(|p| p.vdev_id == c.vdev_id);
        // 本会话加上任一其它 beacon 会话即构成并发 beacon
        let latest = conc
            .beaconing()
            .filter(|c| c.vdev_id != own)
            .max_by_key(|c| peer_of(*c).map_or(0, |p| p.config_seq));
        let Some(conn) = latest else {
            return Ok(None);
        };
        if !conn.is_dfs {
            return Ok(None);
        }
        let forced = conn.freq_mhz;
        log::info!(target: "wireless::acs", "acs conc: only SCC AP-AP DFS permitted, vdev {} on {}", conn.vdev_id, forced);
        match peer_of(conn) {
            Some(p) if p.acs_auto => {
                if forced != p.chan.primary_freq && forced != p.chan.secondary_freq {
                    log::error!(target: "wireless::acs", "acs conc: existing AP freq {} not its ACS pri {} / sec {}",
                        forced, p.chan.primary_freq, p.chan.secondary_freq);
                    return Err(AcsError::ConcurrencyConflict {
                        forced_freq: forced,
                        primary: p.chan.primary_freq,
                        secondary: p.chan.secondary_freq,
                    });
                }
                Ok(Some(DfsOverride::ForceChannel(forced)))
            }
            Some(p) => Ok(Some(DfsOverride::CopyConfig(p.chan))),
            None => Ok(Some(DfsOverride::CopyConfig(ApChanConfig::twenty(forced)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acs_types::HwMode;
    use crate::test_util::{active_freqs, arena_of, conn, dfs_conn, pcl};
    use alloc::vec;
    use ieee80211::Nl80211Iftype;

    fn any_config() -> AcsConfig {
        AcsConfig::new(Nl80211Iftype::Ap, HwMode::Any)
    }

    fn peer(vdev_id: Ifindex, acs_auto: bool, seq: u64, chan: ApChanConfig) -> PeerApSession {
        PeerApSession {
            vdev_id,
            acs_auto,
            config_seq: seq,
            chan,
        }
    }

    fn conc(connections: alloc::vec::Vec<ConnectionRecord>) -> ConcurrencyState {
        ConcurrencyState {
            connection_count: connections.len(),
            connections,
        }
    }

    #[test]
    fn same_radio_restricts_to_other_band() {
        let mut arena = arena_of(&[2412, 2437, 5180, 5745, 5955]);
        let st = conc(vec![
            conn(0, Nl80211Iftype::Station, 0, 2437),
            conn(1, Nl80211Iftype::P2pClient, 0, 2437),
        ]);
        let out = ConcurrencyConstraintResolver::resolve(
            9,
            &any_config(),
            &mut arena,
            &st,
            &pcl(&[(2437, 100), (5180, 50)]),
            &[],
            &AcsPolicy::default(),
        )
        .unwrap();
        assert_eq!(out.restricted_to, Some(BandMask::BAND_5G.union(BandMask::BAND_6G)));
        assert_eq!(active_freqs(&arena), [5180, 5745, 5955]);
        assert_eq!(arena.master().len(), 3);
        assert_eq!(out.dfs_override, None);
    }

    #[test]
    fn restriction_only_for_two_connections_on_one_radio_with_any_band() {
        let p = pcl(&[(5180, 100)]);
        let two_radios = conc(vec![
            conn(0, Nl80211Iftype::Station, 0, 5180),
            conn(1, Nl80211Iftype::Station, 1, 2412),
        ]);
        assert_eq!(ConcurrencyConstraintResolver::band_restriction(&any_config(), &two_radios, &p), None);

        let one_radio = conc(vec![
            conn(0, Nl80211Iftype::Station, 1, 5180),
            conn(1, Nl80211Iftype::Station, 1, 5180),
        ]);
        assert_eq!(
            ConcurrencyConstraintResolver::band_restriction(&any_config(), &one_radio, &p),
            Some(BandMask::BAND_2G)
        );
        let a_only = AcsConfig::new(Nl80211Iftype::Ap, HwMode::A);
        assert_eq!(ConcurrencyConstraintResolver::band_restriction(&a_only, &one_radio, &p), None);
        assert_eq!(ConcurrencyConstraintResolver::band_restriction(&any_config(), &one_radio, &[]), None);
    }

    #[test]
    fn dfs_peer_with_acs_forces_its_channel() {
        let st = conc(vec![dfs_conn(3, Nl80211Iftype::Ap, 0, 5260)]);
        let chan = ApChanConfig {
            primary_freq: 5260,
            secondary_freq: 5280,
            seg0_center_freq: 5270,
            seg1_center_freq: 0,
            width: ChanWidth::FortyMhz,
        };
        let out = ConcurrencyConstraintResolver::dfs_override(9, &st, &[peer(3, true, 1, chan)]).unwrap();
        assert_eq!(out, Some(DfsOverride::ForceChannel(5260)));
    }

    #[test]
    fn dfs_peer_with_acs_mismatch_is_conflict() {
        let st = conc(vec![dfs_conn(3, Nl80211Iftype::Ap, 0, 5300)]);
        let chan = ApChanConfig {
            primary_freq: 5260,
            secondary_freq: 5280,
            ..ApChanConfig::default()
        };
        assert_eq!(
            ConcurrencyConstraintResolver::dfs_override(9, &st, &[peer(3, true, 1, chan)]),
            Err(AcsError::ConcurrencyConflict {
                forced_freq: 5300,
                primary: 5260,
                secondary: 5280
            })
        );
    }

    #[test]
    fn manual_peer_config_is_copied_and_latest_peer_wins() {
        let st = conc(vec![
            conn(1, Nl80211Iftype::Ap, 0, 5745),
            dfs_conn(2, Nl80211Iftype::P2pGo, 0, 5500),
        ]);
        let manual = ApChanConfig {
            primary_freq: 5500,
            secondary_freq: 5520,
            seg0_center_freq: 5530,
            seg1_center_freq: 0,
            width: ChanWidth::EightyMhz,
        };
        let peers = [peer(1, true, 4, ApChanConfig::twenty(5745)), peer(2, false, 7, manual)];
        assert_eq!(
            ConcurrencyConstraintResolver::dfs_override(9, &st, &peers).unwrap(),
            Some(DfsOverride::CopyConfig(manual))
        );
        // 最新的是非 DFS 会话时不强制
        let peers = [peer(1, true, 9, ApChanConfig::twenty(5745)), peer(2, false, 7, manual)];
        assert_eq!(ConcurrencyConstraintResolver::dfs_override(9, &st, &peers).unwrap(), None);
    }

    #[test]
    fn no_beaconing_peer_means_no_override() {
        let st = conc(vec![dfs_conn(0, Nl80211Iftype::Station, 0, 5260)]);
        assert_eq!(ConcurrencyConstraintResolver::dfs_override(9, &st, &[]).unwrap(), None);
    }

    #[test]
    fn own_connection_does_not_force_scc() {
        let st = conc(vec![dfs_conn(1, Nl80211Iftype::Ap, 0, 5260)]);
        // 重启中的 vdev 1 自己在 DFS 上，不算并发
        assert_eq!(ConcurrencyConstraintResolver::dfs_override(1, &st, &[]).unwrap(), None);
        assert_eq!(
            ConcurrencyConstraintResolver::dfs_override(2, &st, &[]).unwrap(),
            Some(DfsOverride::CopyConfig(ApChanConfig::twenty(5260)))
        );

        // 自己配置更新也不影响其它 DFS 会话生效
        let st = conc(vec![
            dfs_conn(1, Nl80211Iftype::Ap, 0, 5500),
            dfs_conn(2, Nl80211Iftype::Ap, 0, 5260),
        ]);
        let peers = [peer(2, true, 3, ApChanConfig::twenty(5260))];
        assert_eq!(
            ConcurrencyConstraintResolver::dfs_override(1, &st, &peers).unwrap(),
            Some(DfsOverride::ForceChannel(5260))
        );
    }
}
