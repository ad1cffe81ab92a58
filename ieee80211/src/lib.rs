//! # ieee80211: IEEE 802.11 / cfg80211 / mac80211 抽象
//!
//! 复刻 aic8800 ACS 路径依赖的 Linux 内核 **cfg80211** 与 **mac80211** 类型，
//! 便于 FDRV 的信道选择逻辑与 LicheeRV rwnx_main 对齐。
//!
//! ## 模块与 Linux 对应
//!
//! | 模块      | Linux 位置                    | 说明 |
//! |-----------|-------------------------------|------|
//! | ieee80211 | include/linux/ieee80211.h     | 频段、信道号与频率换算、频段判定 |
//! | cfg80211  | net/cfg80211.h                | 接口类型、信道带宽、chandef |
//! | mac80211  | net/mac80211.h                | HT/VHT 能力字 |

#![no_std]

pub mod cfg80211;
pub mod ieee80211;
pub mod mac80211;

pub use cfg80211::{ChanDef, ChanWidth, Ifindex, Nl80211Iftype};
pub use ieee80211::{
    band_of_freq, chan_to_freq, freq_to_chan, is_24ghz, is_5ghz, is_6ghz, Band, Channel,
};
pub use mac80211::{HtCap, VhtCap};
