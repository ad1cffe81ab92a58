//! ACS 策略：一次决策开始时从 policy manager 与配置汇总出的只读开关

use ieee80211::{ChanWidth, Nl80211Iftype};

use crate::cfgfile::ConfigStore;
use crate::policy_mgr::PolicyManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcsPolicy {
    pub vendor_acs_enabled: bool,
    /// vendor ACS 打开且外部 ACS 策略为 mandatory
    pub external_acs_mandatory: bool,
    pub force_scc: bool,
    pub force_sap_allowed: bool,
    pub hw_dbs_capable: bool,
    pub chan_bonding_24g: bool,
    pub vht_width_cap: ChanWidth,
    /// 已按接口类型（SAP/GO）选好
    pub force_11n_for_11ac: bool,
}

impl Default for AcsPolicy {
    fn default() -> Self {
        Self {
            vendor_acs_enabled: false,
            external_acs_mandatory: false,
            force_scc: false,
            force_sap_allowed: false,
            hw_dbs_capable: false,
            chan_bonding_24g: true,
            vht_width_cap: ChanWidth::OneSixtyMhz,
            force_11n_for_11ac: false,
        }
    }
}

macro_rules! query_or {
    ($q:expr, $default:expr, $what:expr) => {
        match $q {
            Ok(v) => v,
            Err(e) => {
                log::warn!(target: "wireless::acs", "acs policy: {} query failed ({:?}), use {:?}", $what, e, $default);
                $default
            }
        }
    };
}

impl AcsPolicy {
    /// 汇总策略；任何查询失败都退回 Default 中的保守值
    pub fn gather<P, C>(pm: &P, cfg: &C, iface_type: Nl80211Iftype) -> Self
    where
        P: PolicyManager + ?Sized,
        C: ConfigStore + ?Sized,
    {
        let d = Self::default();
        let vendor_acs_enabled = query_or!(cfg.vendor_acs_enabled(), d.vendor_acs_enabled, "vendor_acs");
        let external_policy = query_or!(cfg.external_acs_policy(), false, "external_acs_policy");
        let policy = Self {
            vendor_acs_enabled,
            external_acs_mandatory: vendor_acs_enabled && external_policy,
            force_scc: query_or!(pm.is_force_scc(), d.force_scc, "force_scc"),
            force_sap_allowed: query_or!(cfg.force_sap_allowed(), d.force_sap_allowed, "force_sap"),
            hw_dbs_capable: query_or!(pm.is_hw_dbs_capable(), d.hw_dbs_capable, "hw_dbs"),
            chan_bonding_24g: query_or!(cfg.chan_bonding_24g(), d.chan_bonding_24g, "chan_bonding_24g"),
            vht_width_cap: query_or!(cfg.vht_channel_width(), d.vht_width_cap, "vht_channel_width"),
            force_11n_for_11ac: query_or!(
                cfg.force_11n_for_11ac(iface_type),
                d.force_11n_for_11ac,
                "force_11n_for_11ac"
            ),
        };
        log::debug!(target: "wireless::acs", "acs policy {:?}", policy);
        policy
    }
}
