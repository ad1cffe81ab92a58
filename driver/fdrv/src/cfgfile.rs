//! rwnx 配置文件中 ACS 相关项的解析（格式与 rwnx_cfgfile.c 一致：每行 TAG=value）
//!
//! 支持的 tag：
//! - `ACS_VENDOR_ENABLE=` / `ACS_EXTERNAL_POLICY=` / `ACS_FORCE_SAP_ALLOWED=`：0/1
//! - `CHAN_BONDING_24G=`：0/1
//! - `VHT_CHANNEL_WIDTH=`：20/40/80/160
//! - `SAP_FORCE_11N_FOR_11AC=` / `GO_FORCE_11N_FOR_11AC=`：0/1
//! - `AVOID_FREQ_LIST=`：逗号分隔的 MHz 列表

use alloc::vec::Vec;
use axerrno::AxResult;
use core::result::Result;
use ieee80211::{ChanWidth, Nl80211Iftype};

/// 配置来源（对应 ucfg_mlme_* / cfg_get 系列查询）
pub trait ConfigStore {
    fn vendor_acs_enabled(&self) -> AxResult<bool>;
    fn external_acs_policy(&self) -> AxResult<bool>;
    fn force_sap_allowed(&self) -> AxResult<bool>;
    fn chan_bonding_24g(&self) -> AxResult<bool>;
    fn vht_channel_width(&self) -> AxResult<ChanWidth>;
    /// SAP 或 GO 是否强制 11n（即使请求了 11ac）
    fn force_11n_for_11ac(&self, iface_type: Nl80211Iftype) -> AxResult<bool>;
    fn avoid_freq_list(&self) -> AxResult<Vec<u32>>;
}

/// 解析后的 ACS 配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcsConfFile {
    pub vendor_acs_enable: bool,
    pub external_acs_policy: bool,
    pub force_sap_allowed: bool,
    pub chan_bonding_24g: bool,
    pub vht_channel_width: ChanWidth,
    pub sap_force_11n_for_11ac: bool,
    pub go_force_11n_for_11ac: bool,
    pub avoid_freq_list: Vec<u32>,
}

impl Default for AcsConfFile {
    fn default() -> Self {
        Self {
            vendor_acs_enable: false,
            external_acs_policy: false,
            force_sap_allowed: false,
            chan_bonding_24g: true,
            vht_channel_width: ChanWidth::OneSixtyMhz,
            sap_force_11n_for_11ac: false,
            go_force_11n_for_11ac: false,
            avoid_freq_list: Vec::new(),
        }
    }
}

impl ConfigStore for AcsConfFile {
    fn vendor_acs_enabled(&self) -> AxResult<bool> {
        Ok(self.vendor_acs_enable)
    }

    fn external_acs_policy(&self) -> AxResult<bool> {
        Ok(self.external_acs_policy)
    }

    fn force_sap_allowed(&self) -> AxResult<bool> {
        Ok(self.force_sap_allowed)
    }

    fn chan_bonding_24g(&self) -> AxResult<bool> {
        Ok(self.chan_bonding_24g)
    }

    fn vht_channel_width(&self) -> AxResult<ChanWidth> {
        Ok(self.vht_channel_width)
    }

    fn force_11n_for_11ac(&self, iface_type: Nl80211Iftype) -> AxResult<bool> {
        Ok(match iface_type {
            Nl80211Iftype::P2pGo => self.go_force_11n_for_11ac,
            _ => self.sap_force_11n_for_11ac,
        })
    }

    fn avoid_freq_list(&self) -> AxResult<Vec<u32>> {
        Ok(self.avoid_freq_list.clone())
    }
}

/// 在 file_data 中查找 tag_name= 开头的行，返回等号后的值（不含换行与 '\r'）
/// 与 LicheeRV rwnx_find_tag 一致
fn find_tag<'a>(file_data: &'a [u8], tag_name: &str) -> Option<&'a [u8]> {
    let tag = tag_name.as_bytes();
    file_data
        .split(|&b| b == b'\n')
        .find(|line| line.starts_with(tag))
        .map(|line| {
            let v = &line[tag.len()..];
            v.strip_suffix(b"\r").unwrap_or(v)
        })
}

/// 十进制无符号数，允许前后空白
fn parse_dec(s: &[u8]) -> Option<u32> {
    let s = core::str::from_utf8(s).ok()?.trim();
    s.parse::<u32>().ok()
}

fn parse_bool(s: &[u8]) -> Option<bool> {
    match parse_dec(s)? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// "5745,5765, 5785" -> [5745, 5765, 5785]；任何一项非法则整体无效
fn parse_freq_list(s: &[u8]) -> Option<Vec<u32>> {
    let mut out = Vec::new();
    for item in s.split(|&b| b == b',') {
        if item.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }
        out.push(parse_dec(item)?);
    }
    Some(out)
}

/// 解析 ACS 配置；缺失或非法的 tag 保持默认值
pub fn parse_acs_configfile(file_data: &[u8], config: &mut AcsConfFile) -> Result<(), i32> {
    *config = AcsConfFile::default();
    macro_rules! parse_flag {
        ($tag:expr, $field:ident) => {
            if let Some(v) = find_tag(file_data, $tag) {
                match parse_bool(v) {
                    Some(b) => config.$field = b,
                    None => log::warn!(target: "wireless::fdrv", "cfgfile: bad value for {}", $tag),
                }
            }
        };
    }
    parse_flag!("ACS_VENDOR_ENABLE=", vendor_acs_enable);
    parse_flag!("ACS_EXTERNAL_POLICY=", external_acs_policy);
    parse_flag!("ACS_FORCE_SAP_ALLOWED=", force_sap_allowed);
    parse_flag!("CHAN_BONDING_24G=", chan_bonding_24g);
    parse_flag!("SAP_FORCE_11N_FOR_11AC=", sap_force_11n_for_11ac);
    parse_flag!("GO_FORCE_11N_FOR_11AC=", go_force_11n_for_11ac);

    if let Some(v) = find_tag(file_data, "VHT_CHANNEL_WIDTH=") {
        match parse_dec(v).and_then(ChanWidth::from_mhz) {
            Some(w) => config.vht_channel_width = w,
            None => log::warn!(target: "wireless::fdrv", "cfgfile: bad VHT_CHANNEL_WIDTH"),
        }
    }
    if let Some(v) = find_tag(file_data, "AVOID_FREQ_LIST=") {
        match parse_freq_list(v) {
            Some(list) => config.avoid_freq_list = list,
            None => log::warn!(target: "wireless::fdrv", "cfgfile: bad AVOID_FREQ_LIST"),
        }
    }
    log::debug!(target: "wireless::fdrv", "cfgfile: acs conf {:?}", config);
    Ok(())
}
