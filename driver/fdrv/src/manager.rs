//! ACS 会话管理器
//! 对应 aicwf_manager.c 中按接口维护状态的部分，以及 hdd 对各 SAP adapter 的 ACS 管理
//!
//! 每个 AP / P2P-GO 接口一个 AcsSession；其它会话的信道配置作为并发约束的输入。
//! 结果交给 SapOps 启动 beacon 并上报 vendor 事件。

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use axerrno::LinuxError;
use core::result::Result;
use ieee80211::{Ifindex, Nl80211Iftype};

use crate::acs::{AcsEngine, AcsOutcome, AcsScan, AcsSession, ChannelScore};
use crate::acs_concurrency::{ApChanConfig, PeerApSession};
use crate::acs_types::{AcsConfig, AcsResult};
use crate::acs_width::WidthCaps;
use crate::avoid_freq::{ChannelAvoidanceRegistry, FreqRange};
use crate::cfgfile::ConfigStore;
use crate::policy_mgr::PolicyManager;
use crate::regulatory::Regulatory;
use crate::vendor::AcsChannelSelectEvent;
use crate::wiphy::SapOps;

/// 一个 beacon 接口的记录
struct ApEntry {
    acs: AcsSession,
    /// 当前信道是否由 ACS 选出
    acs_auto: bool,
    config_seq: u64,
    chan: Option<ApChanConfig>,
}

impl ApEntry {
    fn peer(&self) -> Option<PeerApSession> {
        self.chan.map(|chan| PeerApSession {
            vdev_id: self.acs.ifindex(),
            acs_auto: self.acs_auto,
            config_seq: self.config_seq,
            chan,
        })
    }
}

fn errno(e: LinuxError) -> i32 {
    -e.code()
}

/// ACS 管理器
pub struct AcsManager<'a, R: ?Sized, P: ?Sized, C: ?Sized> {
    reg: &'a R,
    pm: &'a P,
    cfg: &'a C,
    avoid: &'a ChannelAvoidanceRegistry,
    caps: WidthCaps,
    sessions: BTreeMap<Ifindex, ApEntry>,
    next_seq: u64,
}

impl<'a, R, P, C> AcsManager<'a, R, P, C>
where
    R: Regulatory + ?Sized,
    P: PolicyManager + ?Sized,
    C: ConfigStore + ?Sized,
{
    pub fn new(reg: &'a R, pm: &'a P, cfg: &'a C, avoid: &'a ChannelAvoidanceRegistry, caps: WidthCaps) -> Self {
        Self {
            reg,
            pm,
            cfg,
            avoid,
            caps,
            sessions: BTreeMap::new(),
            next_seq: 0,
        }
    }

    fn engine(&self) -> AcsEngine<'a, R, P, C> {
        AcsEngine::new(self.reg, self.pm, self.cfg, self.avoid, self.caps)
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// 从配置加载运营商避让频率；读取失败时保持原样
    pub fn load_avoid_list(&self) -> Result<(), i32> {
        let freqs = match self.cfg.avoid_freq_list() {
            Ok(f) => f,
            Err(e) => {
                log::warn!(target: "wireless::fdrv", "acs mgr: read avoid list failed: {:?}", e);
                return Ok(());
            }
        };
        self.avoid.set_operator_freqs(&freqs).map_err(|e| e.to_errno())?;
        log::info!(target: "wireless::fdrv", "acs mgr: {} operator avoid freqs", freqs.len());
        Ok(())
    }

    pub fn add_session(&mut self, ifindex: Ifindex, iface_type: Nl80211Iftype) -> Result<(), i32> {
        if !matches!(iface_type, Nl80211Iftype::Ap | Nl80211Iftype::P2pGo) {
            return Err(errno(LinuxError::EINVAL));
        }
        if self.sessions.contains_key(&ifindex) {
            return Err(errno(LinuxError::EEXIST));
        }
        log::debug!(target: "wireless::fdrv", "acs mgr: add session ifindex={} type={:?}", ifindex, iface_type);
        self.sessions.insert(
            ifindex,
            ApEntry {
                acs: AcsSession::new(ifindex, iface_type),
                acs_auto: false,
                config_seq: 0,
                chan: None,
            },
        );
        Ok(())
    }

    /// 接口销毁；进行中的 ACS 随会话一起丢弃
    pub fn del_session(&mut self, ifindex: Ifindex) -> Result<(), i32> {
        match self.sessions.remove(&ifindex) {
            Some(_) => {
                log::debug!(target: "wireless::fdrv", "acs mgr: del session ifindex={}", ifindex);
                Ok(())
            }
            None => Err(errno(LinuxError::ENODEV)),
        }
    }

    pub fn session(&self, ifindex: Ifindex) -> Option<&AcsSession> {
        self.sessions.get(&ifindex).map(|e| &e.acs)
    }

    /// 手动指定信道启动的 AP（不走 ACS）
    pub fn register_fixed_ap(&mut self, ifindex: Ifindex, chan: ApChanConfig) -> Result<(), i32> {
        let seq = self.bump_seq();
        let entry = self.sessions.get_mut(&ifindex).ok_or(errno(LinuxError::ENODEV))?;
        entry.acs_auto = false;
        entry.config_seq = seq;
        entry.chan = Some(chan);
        log::info!(target: "wireless::fdrv", "acs mgr: ifindex={} fixed channel {} width {:?}", ifindex, chan.primary_freq, chan.width);
        Ok(())
    }

    /// 除 ifindex 外已有信道配置的会话
    pub fn peers(&self, ifindex: Ifindex) -> Vec<PeerApSession> {
        self.sessions
            .iter()
            .filter(|(idx, _)| **idx != ifindex)
            .filter_map(|(_, e)| e.peer())
            .collect()
    }

    pub fn start_acs<S, O>(&mut self, ifindex: Ifindex, config: AcsConfig, scan: &S, sink: &mut O) -> Result<AcsOutcome, i32>
    where
        S: AcsScan + ?Sized,
        O: SapOps + ?Sized,
    {
        let peers = self.peers(ifindex);
        let engine = self.engine();
        let entry = self.sessions.get_mut(&ifindex).ok_or(errno(LinuxError::ENODEV))?;
        let outcome = engine
            .start_acs(&mut entry.acs, config, &peers, scan)
            .map_err(|e| e.to_errno())?;
        if let AcsOutcome::Complete(result) = &outcome {
            self.on_complete(ifindex, result, sink)?;
        }
        Ok(outcome)
    }

    pub fn on_scan_done<O: SapOps + ?Sized>(
        &mut self,
        ifindex: Ifindex,
        scores: &[ChannelScore],
        sink: &mut O,
    ) -> Result<AcsResult, i32> {
        let engine = self.engine();
        let entry = self.sessions.get_mut(&ifindex).ok_or(errno(LinuxError::ENODEV))?;
        let result = engine.on_scan_done(&mut entry.acs, scores).map_err(|e| e.to_errno())?;
        self.on_complete(ifindex, &result, sink)?;
        Ok(result)
    }

    fn on_complete<O: SapOps + ?Sized>(&mut self, ifindex: Ifindex, result: &AcsResult, sink: &mut O) -> Result<(), i32> {
        let seq = self.bump_seq();
        if let Some(entry) = self.sessions.get_mut(&ifindex) {
            entry.acs_auto = true;
            entry.config_seq = seq;
            entry.chan = Some(ApChanConfig {
                primary_freq: result.primary_freq,
                secondary_freq: result.secondary_freq,
                seg0_center_freq: result.seg0_center_freq,
                seg1_center_freq: result.seg1_center_freq,
                width: result.final_width,
            });
        }
        let event = AcsChannelSelectEvent::from_result(result);
        sink.report_acs_result(ifindex, &event, &result.per_channel_info)
            .map_err(|e| {
                log::warn!(target: "wireless::fdrv", "acs mgr: report ifindex={} failed: {}", ifindex, e);
                e
            })?;
        sink.start_ap(ifindex, &result.chandef()).map_err(|e| {
            log::warn!(target: "wireless::fdrv", "acs mgr: start_ap ifindex={} failed: {}", ifindex, e);
            e
        })
    }

    /// 共存避让事件；返回当前信道落入避让范围、需要重新 ACS 的接口
    pub fn handle_avoid_event(&mut self, ranges: &[FreqRange]) -> Result<Vec<Ifindex>, i32> {
        if ranges.is_empty() {
            self.avoid.clear_coex_ranges();
        } else {
            self.avoid.set_coex_ranges(ranges).map_err(|e| e.to_errno())?;
        }
        let snap = self.avoid.snapshot();
        let affected: Vec<Ifindex> = self
            .sessions
            .iter()
            .filter(|(_, e)| e.acs_auto && !e.acs.is_in_flight())
            .filter(|(_, e)| e.chan.map_or(false, |c| snap.is_avoided(c.primary_freq)))
            .map(|(idx, _)| *idx)
            .collect();
        log::info!(target: "wireless::fdrv", "acs mgr: avoid event {} ranges, restart {:?}", ranges.len(), affected);
        Ok(affected)
    }
}
