//! 单元测试用的内存协作者与小工具

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use axerrno::{AxError, AxResult};
use core::cell::RefCell;
use ieee80211::{Band, ChanWidth, HtCap, Ifindex, Nl80211Iftype, VhtCap};

use crate::acs::AcsScan;
use crate::acs_width::WidthCaps;
use crate::cfgfile::ConfigStore;
use crate::chan_list::AcsChanArena;
use crate::chan_table::{self, chan_flags};
use crate::policy_mgr::{ConnectionRecord, PolicyManager, WeightedChannel};
use crate::regulatory::{ChannelDescriptor, ChannelState, RegRule, Regulatory};

/// 信道表中的信道，非 DFS、无功率信息
pub fn desc(freq: u32) -> ChannelDescriptor {
    let e = chan_table::lookup(freq).unwrap();
    ChannelDescriptor {
        freq_mhz: freq,
        channel_number: e.chan,
        band: e.band,
        ..ChannelDescriptor::EMPTY
    }
}

pub fn arena_with_dfs(chans: &[(u32, bool)]) -> AcsChanArena {
    let mut a = AcsChanArena::new();
    for &(f, dfs) in chans {
        let mut d = desc(f);
        d.is_dfs = dfs;
        a.master_mut().insert_sorted(d).unwrap();
    }
    a.activate_all();
    a
}

pub fn arena_of(freqs: &[u32]) -> AcsChanArena {
    let chans: Vec<(u32, bool)> = freqs.iter().map(|&f| (f, false)).collect();
    arena_with_dfs(&chans)
}

pub fn active_freqs(arena: &AcsChanArena) -> Vec<u32> {
    arena.active().map(|d| d.freq_mhz).collect()
}

pub fn pcl(entries: &[(u32, u8)]) -> Vec<WeightedChannel> {
    entries
        .iter()
        .map(|&(freq_mhz, weight)| WeightedChannel {
            freq_mhz,
            weight,
            flags: 0,
        })
        .collect()
}

pub fn conn(vdev_id: Ifindex, mode: Nl80211Iftype, radio_id: u8, freq_mhz: u32) -> ConnectionRecord {
    ConnectionRecord {
        vdev_id,
        mode,
        radio_id,
        freq_mhz,
        is_dfs: false,
    }
}

pub fn dfs_conn(vdev_id: Ifindex, mode: Nl80211Iftype, radio_id: u8, freq_mhz: u32) -> ConnectionRecord {
    ConnectionRecord {
        is_dfs: true,
        ..conn(vdev_id, mode, radio_id, freq_mhz)
    }
}

/// HT40 + VHT160
pub fn full_caps() -> WidthCaps {
    WidthCaps {
        ht: HtCap {
            ht_supported: true,
            cap: ieee80211::mac80211::HT_CAP_SUP_WIDTH_20_40,
        },
        vht: VhtCap {
            vht_supported: true,
            cap: ieee80211::mac80211::VHT_CAP_SUPP_CHAN_WIDTH_160MHZ,
        },
    }
}

/// 默认：ch14 禁用，信道表中带 DFS 标志的信道为 Dfs，其余 Enabled
pub struct MockReg {
    states: BTreeMap<u32, ChannelState>,
    failing: Vec<u32>,
    disabled_bands: Vec<Band>,
}

impl Default for MockReg {
    fn default() -> Self {
        let mut states = BTreeMap::new();
        states.insert(2484, ChannelState::Disabled);
        Self {
            states,
            failing: Vec::new(),
            disabled_bands: Vec::new(),
        }
    }
}

impl MockReg {
    pub fn with_state(mut self, freq: u32, state: ChannelState) -> Self {
        self.states.insert(freq, state);
        self
    }

    pub fn failing_freq(mut self, freq: u32) -> Self {
        self.failing.push(freq);
        self
    }

    pub fn with_band_disabled(mut self, band: Band) -> Self {
        self.disabled_bands.push(band);
        self
    }
}

impl Regulatory for MockReg {
    fn channel_state(&self, freq: u32) -> AxResult<ChannelState> {
        if self.failing.contains(&freq) {
            return Err(AxError::BadState);
        }
        if let Some(s) = self.states.get(&freq) {
            return Ok(*s);
        }
        Ok(match chan_table::lookup(freq) {
            Some(e) if e.flags & chan_flags::DFS != 0 => ChannelState::Dfs,
            Some(_) => ChannelState::Enabled,
            None => ChannelState::Invalid,
        })
    }

    fn channel_rule(&self, freq: u32) -> AxResult<RegRule> {
        if self.failing.contains(&freq) {
            return Err(AxError::BadState);
        }
        Ok(RegRule {
            max_reg_power: if ieee80211::is_24ghz(freq) { 20 } else { 23 },
            max_antenna_gain: 6,
            reg_class: if ieee80211::is_24ghz(freq) { 81 } else { 115 },
            no_ir: false,
        })
    }

    fn is_band_enabled(&self, band: Band) -> AxResult<bool> {
        Ok(!self.disabled_bands.contains(&band))
    }
}

#[derive(Default)]
pub struct MockPm {
    pcl: Vec<WeightedChannel>,
    connections: Vec<ConnectionRecord>,
    force_scc: bool,
    dbs: bool,
    failing: bool,
}

impl MockPm {
    pub fn with_pcl(mut self, entries: &[(u32, u8)]) -> Self {
        self.pcl = pcl(entries);
        self
    }

    pub fn with_connections(mut self, conns: &[ConnectionRecord]) -> Self {
        self.connections = conns.to_vec();
        self
    }

    pub fn with_force_scc(mut self, on: bool) -> Self {
        self.force_scc = on;
        self
    }

    pub fn with_dbs(mut self, on: bool) -> Self {
        self.dbs = on;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> AxResult<()> {
        if self.failing {
            Err(AxError::BadState)
        } else {
            Ok(())
        }
    }
}

impl PolicyManager for MockPm {
    fn get_pcl(&self, _mode: Nl80211Iftype) -> AxResult<Vec<WeightedChannel>> {
        self.check()?;
        Ok(self.pcl.clone())
    }

    fn connection_count(&self) -> AxResult<usize> {
        self.check()?;
        Ok(self.connections.len())
    }

    fn connection_info(&self) -> AxResult<Vec<ConnectionRecord>> {
        self.check()?;
        Ok(self.connections.clone())
    }

    fn is_force_scc(&self) -> AxResult<bool> {
        self.check()?;
        Ok(self.force_scc)
    }

    fn is_hw_dbs_capable(&self) -> AxResult<bool> {
        self.check()?;
        Ok(self.dbs)
    }
}

/// 所有读取都失败的配置源
pub struct FailingCfg;

impl ConfigStore for FailingCfg {
    fn vendor_acs_enabled(&self) -> AxResult<bool> {
        Err(AxError::BadState)
    }
    fn external_acs_policy(&self) -> AxResult<bool> {
        Err(AxError::BadState)
    }
    fn force_sap_allowed(&self) -> AxResult<bool> {
        Err(AxError::BadState)
    }
    fn chan_bonding_24g(&self) -> AxResult<bool> {
        Err(AxError::BadState)
    }
    fn vht_channel_width(&self) -> AxResult<ChanWidth> {
        Err(AxError::BadState)
    }
    fn force_11n_for_11ac(&self, _iface_type: Nl80211Iftype) -> AxResult<bool> {
        Err(AxError::BadState)
    }
    fn avoid_freq_list(&self) -> AxResult<Vec<u32>> {
        Err(AxError::BadState)
    }
}

/// 记录每次扫描请求的信道
#[derive(Default)]
pub struct MockScan {
    pub requests: RefCell<Vec<(Ifindex, Vec<u32>)>>,
    pub fail: bool,
}

impl MockScan {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last_freqs(&self) -> Vec<u32> {
        self.requests.borrow().last().map(|(_, f)| f.clone()).unwrap_or_default()
    }
}

impl AcsScan for MockScan {
    fn start_acs_scan(&self, ifindex: Ifindex, chans: &[ChannelDescriptor]) -> AxResult<()> {
        if self.fail {
            return Err(AxError::Unsupported);
        }
        self.requests
            .borrow_mut()
            .push((ifindex, chans.iter().map(|d| d.freq_mhz).collect()));
        Ok(())
    }
}
