//! StarryOS wireless crate
//!
//! AIC8800 FDRV 的 SoftAP / P2P-GO 自动信道选择：
//! - ieee80211: 频段、信道号、带宽与 HT/VHT 能力
//! - fdrv: ACS 决策引擎、会话管理、避让频率、配置文件与 vendor 事件

#![no_std]

extern crate alloc;

pub use fdrv;
pub use ieee80211;

use fdrv::{AcsManager, ChannelAvoidanceRegistry, ConfigStore, PolicyManager, Regulatory, SapOps, WidthCaps};

/// 无线驱动上下文：避让频率登记 + SAP 下游
/// 平台初始化时创建；避让登记在所有 AP 会话间共享
pub struct WirelessDriver<S: SapOps> {
    pub avoid: ChannelAvoidanceRegistry,
    pub sap: S,
    pub caps: WidthCaps,
}

impl<S: SapOps> WirelessDriver<S> {
    pub fn new(sap: S, caps: WidthCaps) -> Self {
        Self {
            avoid: ChannelAvoidanceRegistry::new(),
            sap,
            caps,
        }
    }

    pub fn sap_mut(&mut self) -> &mut S {
        &mut self.sap
    }

    /// 以外部监管 / policy manager / 配置创建 ACS 管理器
    pub fn acs_manager<'a, R, P, C>(&'a self, reg: &'a R, pm: &'a P, cfg: &'a C) -> AcsManager<'a, R, P, C>
    where
        R: Regulatory + ?Sized,
        P: PolicyManager + ?Sized,
        C: ConfigStore + ?Sized,
    {
        let mgr = AcsManager::new(reg, pm, cfg, &self.avoid, self.caps);
        if let Err(e) = mgr.load_avoid_list() {
            log::warn!(target: "wireless", "wireless: load avoid list failed: {}", e);
        }
        mgr
    }
}

/// 使用占位实现的驱动初始化（无平台 SAP 实现时可用）
///
/// start_ap 通过 `SapOpsStub` 返回 `-ENOSYS`，ACS 本身照常工作，
/// 便于在没有固件的情况下联调信道选择。
pub fn wireless_driver_init_stub() -> WirelessDriver<fdrv::SapOpsStub> {
    log::info!(target: "wireless", "wireless: init stub driver (SapOpsStub)");
    WirelessDriver::new(fdrv::SapOpsStub, WidthCaps::default())
}
