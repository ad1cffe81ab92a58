//! PCL 裁剪与空表回退（对应 hdd_update_acs_channel_list 的 PCL 交集 与 wlan_hdd_handle_zero_acs_list）
//!
//! 裁剪保留候选表原有的频率升序，不按 PCL 权重重排。

use crate::acs_policy::AcsPolicy;
use crate::chan_list::AcsChanArena;
use crate::policy_mgr::{ConcurrencyState, WeightedChannel};
use crate::regulatory::ChannelDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimOutcome {
    /// 策略不要求裁剪
    Skipped,
    /// 裁剪后剩余个数（可能为 0）
    Trimmed(usize),
}

pub struct AcsTrimmer;

impl AcsTrimmer {
    /// 外部 ACS 为 mandatory、force SCC 且已有连接时才裁剪
    pub fn should_trim(policy: &AcsPolicy, conc: &ConcurrencyState) -> bool {
        policy.external_acs_mandatory && policy.force_scc && conc.connection_count > 0
    }

    pub fn trim(
        arena: &mut AcsChanArena,
        pcl: &[WeightedChannel],
        policy: &AcsPolicy,
        conc: &ConcurrencyState,
    ) -> TrimOutcome {
        if !Self::should_trim(policy, conc) {
            return TrimOutcome::Skipped;
        }
        let before = arena.active_len();
        arena.retain_active(|d| pcl.iter().any(|w| w.freq_mhz == d.freq_mhz));
        log::info!(target: "wireless::acs", "acs trim: pcl len {}, candidates {} -> {}", pcl.len(), before, arena.active_len());
        TrimOutcome::Trimmed(arena.active_len())
    }
}

/// 首个非 DFS 项的下标；全是 DFS 时取第一个
pub(crate) fn pick_first_non_dfs<'a>(
    mut chans: impl Iterator<Item = &'a ChannelDescriptor> + Clone,
) -> Option<usize> {
    chans
        .clone()
        .position(|d| !d.is_dfs)
        .or_else(|| chans.next().map(|_| 0))
}

pub struct AcsZeroFallback;

impl AcsZeroFallback {
    pub fn triggered(arena: &AcsChanArena, policy: &AcsPolicy, conc: &ConcurrencyState) -> bool {
        arena.active_is_empty()
            && !arena.master().is_empty()
            && policy.force_scc
            && (conc.client_count() > 0 || policy.force_sap_allowed)
    }

    /// 候选为空时从 master 挑一个信道；未触发时返回 None，调用方按致命错误处理
    pub fn fallback(
        arena: &mut AcsChanArena,
        policy: &AcsPolicy,
        conc: &ConcurrencyState,
    ) -> Option<ChannelDescriptor> {
        if !Self::triggered(arena, policy, conc) {
            return None;
        }
        let idx = pick_first_non_dfs(arena.master().iter())?;
        arena.select_single(idx);
        let chosen = *arena.first_active()?;
        log::info!(target: "wireless::acs", "acs fallback: empty after trim, use freq {} (dfs={})", chosen.freq_mhz, chosen.is_dfs);
        Some(chosen)
    }
}
