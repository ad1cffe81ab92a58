//! 避让频率登记（对应 hdd_ctx->coex_avoid_freq_list + acs avoid 配置）
//!
//! 两个来源：
//! - 运营商/配置给出的精确频率（AVOID_FREQ_LIST=）
//! - LTE coex 等异步事件给出的频率区间（vendor AVOID_FREQUENCY 事件）
//!
//! 读写都经同一把锁；建表时取一份快照，之后不再持锁。

use crate::acs_types::AcsError;

/// 最多 coex 区间数（对应 HDD_MAX_AVOID_FREQ_RANGES）
pub const MAX_AVOID_FREQ_RANGES: usize = 15;
/// 最多运营商避让频率数
pub const MAX_OPERATOR_AVOID_FREQS: usize = 32;

/// 半宽 10MHz：20MHz 信道的占用范围
const CHAN_HALF_WIDTH_MHZ: u32 = 10;

/// 频率区间 [start_mhz, end_mhz]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreqRange {
    pub start_mhz: u32,
    pub end_mhz: u32,
}

impl FreqRange {
    pub const EMPTY: Self = Self {
        start_mhz: 0,
        end_mhz: 0,
    };

    pub fn new(start_mhz: u32, end_mhz: u32) -> Self {
        if start_mhz <= end_mhz {
            Self { start_mhz, end_mhz }
        } else {
            Self {
                start_mhz: end_mhz,
                end_mhz: start_mhz,
            }
        }
    }

    /// 以 freq 为中心的 20MHz 信道是否与区间重叠
    pub fn overlaps_chan(&self, freq: u32) -> bool {
        freq + CHAN_HALF_WIDTH_MHZ > self.start_mhz
            && freq.saturating_sub(CHAN_HALF_WIDTH_MHZ) < self.end_mhz
    }
}

/// 登记内容的只读拷贝
#[derive(Debug, Clone, Copy)]
pub struct AvoidSnapshot {
    ranges: [FreqRange; MAX_AVOID_FREQ_RANGES],
    n_ranges: usize,
    freqs: [u32; MAX_OPERATOR_AVOID_FREQS],
    n_freqs: usize,
}

impl Default for AvoidSnapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl AvoidSnapshot {
    pub const EMPTY: Self = Self {
        ranges: [FreqRange::EMPTY; MAX_AVOID_FREQ_RANGES],
        n_ranges: 0,
        freqs: [0; MAX_OPERATOR_AVOID_FREQS],
        n_freqs: 0,
    };

    pub fn ranges(&self) -> &[FreqRange] {
        &self.ranges[..self.n_ranges]
    }

    pub fn freqs(&self) -> &[u32] {
        &self.freqs[..self.n_freqs]
    }

    pub fn is_empty(&self) -> bool {
        self.n_ranges == 0 && self.n_freqs == 0
    }

    pub fn is_avoided(&self, freq: u32) -> bool {
        self.freqs().contains(&freq) || self.ranges().iter().any(|r| r.overlaps_chan(freq))
    }
}

/// 避让频率登记
pub struct ChannelAvoidanceRegistry {
    inner: spin::Mutex<AvoidSnapshot>,
}

impl Default for ChannelAvoidanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelAvoidanceRegistry {
    pub const fn new() -> Self {
        Self {
            inner: spin::Mutex::new(AvoidSnapshot::EMPTY),
        }
    }

    /// coex 事件：整体替换区间表；超出容量时保持原内容
    pub fn set_coex_ranges(&self, ranges: &[FreqRange]) -> Result<(), AcsError> {
        if ranges.len() > MAX_AVOID_FREQ_RANGES {
            log::error!(target: "wireless::acs", "avoid freq: {} ranges exceed max {}", ranges.len(), MAX_AVOID_FREQ_RANGES);
            return Err(AcsError::AllocationFailure);
        }
        let mut g = self.inner.lock();
        for (slot, r) in g.ranges.iter_mut().zip(ranges) {
            *slot = FreqRange::new(r.start_mhz, r.end_mhz);
        }
        g.n_ranges = ranges.len();
        log::info!(target: "wireless::acs", "avoid freq: {} coex ranges installed", ranges.len());
        Ok(())
    }

    pub fn clear_coex_ranges(&self) {
        self.inner.lock().n_ranges = 0;
    }

    /// 运营商避让列表：整体替换
    pub fn set_operator_freqs(&self, freqs: &[u32]) -> Result<(), AcsError> {
        if freqs.len() > MAX_OPERATOR_AVOID_FREQS {
            log::error!(target: "wireless::acs", "avoid freq: {} operator freqs exceed max {}", freqs.len(), MAX_OPERATOR_AVOID_FREQS);
            return Err(AcsError::AllocationFailure);
        }
        let mut g = self.inner.lock();
        g.freqs[..freqs.len()].copy_from_slice(freqs);
        g.n_freqs = freqs.len();
        Ok(())
    }

    pub fn snapshot(&self) -> AvoidSnapshot {
        *self.inner.lock()
    }
}
