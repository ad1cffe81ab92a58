//! Policy Manager 接口（对应 policy_mgr_get_pcl / policy_mgr_get_connection_count 等）
//!
//! PCL 与并发连接表都由外部 policy manager 维护，ACS 只读取。

use alloc::vec::Vec;
use axerrno::AxResult;
use ieee80211::{Ifindex, Nl80211Iftype};

/// PCL 项标志（对应 WEIGHTED_PCL_FLAG_*）
pub mod pcl_flags {
    pub const SUPPORT_GO: u8 = 1 << 0;
    pub const SUPPORT_CLIENT: u8 = 1 << 1;
    pub const EXCLUDE_FROM_NEGOTIATION: u8 = 1 << 2;
}

/// PCL 中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedChannel {
    pub freq_mhz: u32,
    pub weight: u8,
    pub flags: u8,
}

/// 已有连接（对应 policy_mgr_conc_connection_info 中一项）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub vdev_id: Ifindex,
    pub mode: Nl80211Iftype,
    pub radio_id: u8,
    pub freq_mhz: u32,
    pub is_dfs: bool,
}

pub trait PolicyManager {
    fn get_pcl(&self, mode: Nl80211Iftype) -> AxResult<Vec<WeightedChannel>>;
    fn connection_count(&self) -> AxResult<usize>;
    fn connection_info(&self) -> AxResult<Vec<ConnectionRecord>>;
    fn is_force_scc(&self) -> AxResult<bool>;
    fn is_hw_dbs_capable(&self) -> AxResult<bool>;
}

/// 决策开始时取的并发快照，不跨周期缓存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcurrencyState {
    pub connection_count: usize,
    pub connections: Vec<ConnectionRecord>,
}

impl ConcurrencyState {
    /// 查询失败时退化为“无并发”
    pub fn fetch<P: PolicyManager + ?Sized>(pm: &P) -> Self {
        let connections = pm.connection_info().unwrap_or_else(|e| {
            log::warn!(target: "wireless::acs", "policy_mgr connection_info failed: {:?}", e);
            Vec::new()
        });
        let connection_count = pm.connection_count().unwrap_or_else(|e| {
            log::warn!(target: "wireless::acs", "policy_mgr connection_count failed: {:?}", e);
            connections.len()
        });
        Self {
            connection_count,
            connections,
        }
    }

    /// STA / P2P-Client 连接数
    pub fn client_count(&self) -> usize {
        self.connections.iter().filter(|c| c.mode.is_client()).count()
    }

    /// 正在发 beacon 的连接（AP / GO / IBSS）
    pub fn beaconing(&self) -> impl Iterator<Item = &ConnectionRecord> + '_ {
        self.connections.iter().filter(|c| c.mode.is_beaconing())
    }
}

/// PCL 查询失败时返回空表
pub fn fetch_pcl<P: PolicyManager + ?Sized>(pm: &P, mode: Nl80211Iftype) -> Vec<WeightedChannel> {
    pm.get_pcl(mode).unwrap_or_else(|e| {
        log::warn!(target: "wireless::acs", "policy_mgr get_pcl {:?} failed: {:?}", mode, e);
        Vec::new()
    })
}
