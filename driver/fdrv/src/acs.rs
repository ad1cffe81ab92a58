//! ACS 决策引擎（对应 wlan_hdd_cfg80211_do_acs / wlan_hdd_cfg80211_start_acs / wlan_hdd_sap_event 中的 ACS 完成处理）
//!
//! 状态机：Idle -> Building -> ConcurrencyCheck -> Trimming -> Finalizing -> Complete | Failed
//!
//! 多于一个候选时交给外部扫描（AcsScan），会话停在 Finalizing，
//! 由 [`AcsEngine::on_scan_done`] 继续；只剩一个候选时直接完成。
//! 每个会话同一时刻最多一个周期在进行中，重复请求直接拒绝。

use alloc::vec::Vec;
use axerrno::AxResult;
use core::fmt;
use ieee80211::{ChanWidth, Ifindex, Nl80211Iftype};

use crate::acs_chan_info::AcsResultChannelInfo;
use crate::acs_chan_list::AcsChannelListBuilder;
use crate::acs_concurrency::{ApChanConfig, ConcurrencyConstraintResolver, DfsOverride, PeerApSession};
use crate::acs_policy::AcsPolicy;
use crate::acs_trim::{pick_first_non_dfs, AcsTrimmer, AcsZeroFallback};
use crate::acs_types::{AcsConfig, AcsError, AcsResult, ConfigError, HwMode};
use crate::acs_width::{ChannelWidthResolver, WidthCaps};
use crate::avoid_freq::ChannelAvoidanceRegistry;
use crate::cfgfile::ConfigStore;
use crate::chan_list::AcsChanArena;
use crate::policy_mgr::{fetch_pcl, ConcurrencyState, PolicyManager};
use crate::regulatory::{ChannelDescriptor, Regulatory, RegulatoryFilter};

/// 会话的 ACS 状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AcsState {
    #[default]
    Idle,
    Building,
    ConcurrencyCheck,
    Trimming,
    /// 多候选时在此等待扫描结果
    Finalizing,
    Complete(AcsResult),
    Failed(AcsError),
}

impl AcsState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Building => "Building",
            Self::ConcurrencyCheck => "ConcurrencyCheck",
            Self::Trimming => "Trimming",
            Self::Finalizing => "Finalizing",
            Self::Complete(_) => "Complete",
            Self::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for AcsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一个 AP / P2P-GO 接口的 ACS 会话状态，会话之间不共享
pub struct AcsSession {
    ifindex: Ifindex,
    iface_type: Nl80211Iftype,
    state: AcsState,
    in_flight: bool,
    config: Option<AcsConfig>,
    policy: AcsPolicy,
    arena: AcsChanArena,
    /// 等待扫描时已决定的候选集合带宽
    width: ChanWidth,
}

impl AcsSession {
    pub fn new(ifindex: Ifindex, iface_type: Nl80211Iftype) -> Self {
        Self {
            ifindex,
            iface_type,
            state: AcsState::Idle,
            in_flight: false,
            config: None,
            policy: AcsPolicy::default(),
            arena: AcsChanArena::new(),
            width: ChanWidth::TwentyMhz,
        }
    }

    pub fn ifindex(&self) -> Ifindex {
        self.ifindex
    }

    pub fn iface_type(&self) -> Nl80211Iftype {
        self.iface_type
    }

    pub fn state(&self) -> &AcsState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn config(&self) -> Option<&AcsConfig> {
        self.config.as_ref()
    }

    /// 最近一次成功的结果，下一次 ACS 开始前一直有效
    pub fn last_result(&self) -> Option<&AcsResult> {
        match &self.state {
            AcsState::Complete(r) => Some(r),
            _ => None,
        }
    }

    /// 当前候选集合（扫描中即为送去扫描的信道）
    pub fn candidates(&self) -> impl Iterator<Item = &ChannelDescriptor> + '_ {
        self.arena.active()
    }

    fn transition(&mut self, next: AcsState) {
        log::debug!(target: "wireless::acs", "acs ifindex={}: {} -> {}", self.ifindex, self.state, next);
        self.state = next;
    }

    fn complete(&mut self, result: AcsResult) {
        log::info!(target: "wireless::acs", "acs ifindex={} done: pri={} sec={} seg0={} seg1={} width={:?}",
            self.ifindex, result.primary_freq, result.secondary_freq, result.seg0_center_freq,
            result.seg1_center_freq, result.final_width);
        self.transition(AcsState::Complete(result));
        self.in_flight = false;
    }

    fn fail(&mut self, err: AcsError) {
        log::error!(target: "wireless::acs", "acs ifindex={} failed: {}", self.ifindex, err);
        self.arena.reset();
        self.transition(AcsState::Failed(err));
        self.in_flight = false;
    }
}

impl Drop for AcsSession {
    fn drop(&mut self) {
        if self.in_flight {
            log::warn!(target: "wireless::acs", "acs ifindex={} torn down in {}, cycle abandoned", self.ifindex, self.state);
        }
    }
}

/// start_acs 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcsOutcome {
    Complete(AcsResult),
    /// 已交给扫描，等待 on_scan_done
    ScanPending,
}

/// 外部扫描给出的信道评分，越大越好
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelScore {
    pub freq_mhz: u32,
    pub score: u32,
}

/// 外部频谱扫描（对应 wlansap_acs_chselect 触发的扫描）
pub trait AcsScan {
    fn start_acs_scan(&self, ifindex: Ifindex, chans: &[ChannelDescriptor]) -> AxResult<()>;
}

/// 引擎只借用外部协作者，本身不持有会话状态
pub struct AcsEngine<'a, R: ?Sized, P: ?Sized, C: ?Sized> {
    reg: &'a R,
    pm: &'a P,
    cfg: &'a C,
    avoid: &'a ChannelAvoidanceRegistry,
    caps: WidthCaps,
}

impl<'a, R, P, C> AcsEngine<'a, R, P, C>
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
        }
    }

    /// 开始一次 ACS；peers 为其它 AP/GO 会话的快照
    pub fn start_acs<S: AcsScan + ?Sized>(
        &self,
        session: &mut AcsSession,
        config: AcsConfig,
        peers: &[PeerApSession],
        scan: &S,
    ) -> Result<AcsOutcome, AcsError> {
        if session.in_flight {
            log::warn!(target: "wireless::acs", "acs ifindex={}: request rejected, cycle in {}", session.ifindex, session.state);
            return Err(ConfigError::CycleAlreadyInProgress.into());
        }
        session.in_flight = true;
        session.arena.reset();
        log::info!(target: "wireless::acs", "acs ifindex={} start: hw_mode={:?} width={:?} ht={} ht40={} vht={} list={:?}",
            session.ifindex, config.hw_mode, config.requested_width, config.ht_enabled,
            config.ht40_enabled, config.vht_enabled, config.explicit_freq_list);

        let ret = self.run(session, &config, peers, scan);
        session.config = Some(config);
        match ret {
            Ok(AcsOutcome::Complete(result)) => {
                session.complete(result.clone());
                Ok(AcsOutcome::Complete(result))
            }
            Ok(AcsOutcome::ScanPending) => Ok(AcsOutcome::ScanPending),
            Err(e) => {
                session.fail(e);
                Err(e)
            }
        }
    }

    fn run<S: AcsScan + ?Sized>(
        &self,
        session: &mut AcsSession,
        config: &AcsConfig,
        peers: &[PeerApSession],
        scan: &S,
    ) -> Result<AcsOutcome, AcsError> {
        let filter = RegulatoryFilter::new(self.reg);

        session.transition(AcsState::Building);
        session.policy = AcsPolicy::gather(self.pm, self.cfg, config.iface_type);
        let avoid = self.avoid.snapshot();
        AcsChannelListBuilder::build(config, &filter, &avoid, &mut session.arena)?;

        session.transition(AcsState::ConcurrencyCheck);
        let conc = ConcurrencyState::fetch(self.pm);
        let pcl = fetch_pcl(self.pm, config.iface_type);
        let policy = session.policy;
        let outcome =
            ConcurrencyConstraintResolver::resolve(session.ifindex, config, &mut session.arena, &conc, &pcl, peers, &policy)?;
        match outcome.dfs_override {
            Some(DfsOverride::CopyConfig(chan)) => {
                session.transition(AcsState::Finalizing);
                return self.copy_config(session, config, &filter, chan).map(AcsOutcome::Complete);
            }
            Some(DfsOverride::ForceChannel(freq)) => {
                let desc = filter
                    .descriptor(freq)
                    .ok_or(AcsError::Config(ConfigError::EmptyCandidateSet))?;
                session.arena.force_single(desc)?;
                session.transition(AcsState::Finalizing);
                return self.finalize(session, config, &filter, scan);
            }
            None => {}
        }

        session.transition(AcsState::Trimming);
        AcsTrimmer::trim(&mut session.arena, &pcl, &policy, &conc);
        if session.arena.active_is_empty()
            && AcsZeroFallback::fallback(&mut session.arena, &policy, &conc).is_none()
        {
            log::error!(target: "wireless::acs", "acs ifindex={}: no channel left after pcl trim", session.ifindex);
            return Err(ConfigError::EmptyCandidateSet.into());
        }

        session.transition(AcsState::Finalizing);
        self.finalize(session, config, &filter, scan)
    }

    fn finalize<S: AcsScan + ?Sized>(
        &self,
        session: &mut AcsSession,
        config: &AcsConfig,
        filter: &RegulatoryFilter<'_, R>,
        scan: &S,
    ) -> Result<AcsOutcome, AcsError> {
        let width = ChannelWidthResolver::resolve(config, &session.policy, &self.caps, session.arena.active_freq_range());
        session.width = width;

        let primary = match session.arena.active_len() {
            0 => return Err(ConfigError::EmptyCandidateSet.into()),
            1 => session.arena.first_active().copied(),
            n => {
                let chans = session.arena.active_list();
                match scan.start_acs_scan(session.ifindex, chans.as_slice()) {
                    Ok(()) => {
                        log::info!(target: "wireless::acs", "acs ifindex={}: scan {} channels", session.ifindex, n);
                        return Ok(AcsOutcome::ScanPending);
                    }
                    Err(e) => {
                        log::warn!(target: "wireless::acs", "acs ifindex={}: start scan failed: {:?}, pick first non-dfs", session.ifindex, e);
                        pick_first_non_dfs(session.arena.active())
                            .and_then(|i| session.arena.active().nth(i))
                            .copied()
                    }
                }
            }
        };
        let primary = primary.ok_or(AcsError::Config(ConfigError::EmptyCandidateSet))?;
        Ok(AcsOutcome::Complete(self.build_result(session, config.hw_mode, filter, &primary)))
    }

    fn build_result(
        &self,
        session: &AcsSession,
        hw_mode: HwMode,
        filter: &RegulatoryFilter<'_, R>,
        primary: &ChannelDescriptor,
    ) -> AcsResult {
        let width = ChannelWidthResolver::fit_to_channel(session.width, primary, &session.policy, filter);
        AcsResultChannelInfo::build(primary, width, hw_mode, session.arena.active())
    }

    /// 照搬手动配置会话的信道；比本次请求/能力允许的更宽时按允许带宽重算分段
    fn copy_config(
        &self,
        session: &mut AcsSession,
        config: &AcsConfig,
        filter: &RegulatoryFilter<'_, R>,
        chan: ApChanConfig,
    ) -> Result<AcsResult, AcsError> {
        let pri = chan.primary_freq;
        let cap = ChannelWidthResolver::resolve(config, &session.policy, &self.caps, Some((pri, pri)));
        session.width = cap;
        log::info!(target: "wireless::acs", "acs ifindex={}: copy existing AP config pri={} width={:?}",
            session.ifindex, chan.primary_freq, chan.width);
        let Some(desc) = filter.descriptor(chan.primary_freq) else {
            return Ok(AcsResult {
                primary_freq: chan.primary_freq,
                secondary_freq: chan.secondary_freq,
                seg0_center_freq: chan.seg0_center_freq,
                seg1_center_freq: chan.seg1_center_freq,
                final_width: chan.width.min(cap),
                hw_mode: config.hw_mode,
                per_channel_info: Vec::new(),
            });
        };
        session.arena.force_single(desc)?;
        if chan.width.mhz() > cap.mhz() {
            return Ok(AcsResultChannelInfo::build(&desc, cap, config.hw_mode, session.arena.active()));
        }
        Ok(AcsResult {
            primary_freq: chan.primary_freq,
            secondary_freq: chan.secondary_freq,
            seg0_center_freq: chan.seg0_center_freq,
            seg1_center_freq: chan.seg1_center_freq,
            final_width: chan.width,
            hw_mode: config.hw_mode,
            per_channel_info: AcsResultChannelInfo::records(session.arena.active(), chan.width),
        })
    }

    /// 扫描完成：取分数最高的候选，同分取靠前者，未评分的按 0 分
    pub fn on_scan_done(&self, session: &mut AcsSession, scores: &[ChannelScore]) -> Result<AcsResult, AcsError> {
        if !session.in_flight || session.state != AcsState::Finalizing {
            log::warn!(target: "wireless::acs", "acs ifindex={}: scan result in {}, ignored", session.ifindex, session.state);
            return Err(AcsError::NoScanPending);
        }
        let score_of = |freq: u32| scores.iter().find(|s| s.freq_mhz == freq).map_or(0, |s| s.score);
        let mut best: Option<(ChannelDescriptor, u32)> = None;
        for d in session.arena.active() {
            let s = score_of(d.freq_mhz);
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((*d, s));
            }
        }
        let Some((primary, score)) = best else {
            let err = AcsError::Config(ConfigError::EmptyCandidateSet);
            session.fail(err);
            return Err(err);
        };
        log::info!(target: "wireless::acs", "acs ifindex={}: scan picked {} (score {})", session.ifindex, primary.freq_mhz, score);
        let hw_mode = session.config.as_ref().map_or(HwMode::Any, |c| c.hw_mode);
        let filter = RegulatoryFilter::new(self.reg);
        let result = self.build_result(session, hw_mode, &filter, &primary);
        session.complete(result.clone());
        Ok(result)
    }
}
