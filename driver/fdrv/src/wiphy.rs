//! 无线控制平面 - ACS 结果的去向（对应 cfg80211_ops 的 start_ap 与 vendor 事件上报）
//!
//! ACS 只负责选信道，beacon 的启动与用户态事件由实现 **SapOps** 的一方完成。

use core::result::Result;

pub use ieee80211::{ChanDef, Ifindex};

use crate::acs_chan_info::ChannelInfoRecord;
use crate::vendor::AcsChannelSelectEvent;

/// SAP / P2P-GO 会话的下游操作
pub trait SapOps {
    /// 以 ACS 选出的信道启动（或重启）beacon
    fn start_ap(&mut self, ifindex: Ifindex, chandef: &ChanDef) -> Result<(), i32>;
    /// 上报 DO_ACS 完成事件与每个候选信道的信息
    fn report_acs_result(
        &mut self,
        ifindex: Ifindex,
        event: &AcsChannelSelectEvent,
        chan_info: &[ChannelInfoRecord],
    ) -> Result<(), i32>;
}

/// 占位实现：start_ap 返回 -ENOSYS，上报只打日志
#[derive(Debug, Default)]
pub struct SapOpsStub;

impl SapOps for SapOpsStub {
    fn start_ap(&mut self, ifindex: Ifindex, chandef: &ChanDef) -> Result<(), i32> {
        log::debug!(target: "wireless::fdrv", "SapOpsStub start_ap ifindex={} freq={} (unimplemented)", ifindex, chandef.primary_freq);
        Err(-38)
    }

    fn report_acs_result(
        &mut self,
        ifindex: Ifindex,
        event: &AcsChannelSelectEvent,
        chan_info: &[ChannelInfoRecord],
    ) -> Result<(), i32> {
        log::debug!(target: "wireless::fdrv", "SapOpsStub acs event ifindex={} pri={} sec={} width={} ({} chans)",
            ifindex, event.pri_channel, event.sec_channel, event.chan_width, chan_info.len());
        Ok(())
    }
}
