//! 固定容量信道表
//!
//! 每个 AP 会话持有一个 AcsChanArena：master 为建表结果（频段限制后、PCL 裁剪前），
//! 候选集合只是 master 的下标序列，裁剪/回退只改下标，不再分配内存。

use crate::acs_types::AcsError;
use crate::regulatory::ChannelDescriptor;

/// 单次 ACS 最多处理的信道数
pub const ACS_MAX_CHANNELS: usize = 128;

/// 按频率升序的固定容量信道表
#[derive(Clone)]
pub struct ChanList {
    entries: [ChannelDescriptor; ACS_MAX_CHANNELS],
    len: usize,
}

impl Default for ChanList {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ChanList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter().map(|d| d.freq_mhz)).finish()
    }
}

impl ChanList {
    pub const fn new() -> Self {
        Self {
            entries: [ChannelDescriptor::EMPTY; ACS_MAX_CHANNELS],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChannelDescriptor] {
        &self.entries[..self.len]
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ChannelDescriptor> {
        self.as_slice().iter()
    }

    pub fn get(&self, idx: usize) -> Option<&ChannelDescriptor> {
        self.as_slice().get(idx)
    }

    pub fn contains_freq(&self, freq: u32) -> bool {
        self.iter().any(|d| d.freq_mhz == freq)
    }

    /// 末尾追加，调用方保证顺序
    pub fn push(&mut self, desc: ChannelDescriptor) -> Result<(), AcsError> {
        if self.len >= ACS_MAX_CHANNELS {
            log::error!(target: "wireless::acs", "chan list full, drop freq={}", desc.freq_mhz);
            return Err(AcsError::AllocationFailure);
        }
        self.entries[self.len] = desc;
        self.len += 1;
        Ok(())
    }

    /// 按频率有序插入；同频率已存在时忽略
    pub fn insert_sorted(&mut self, desc: ChannelDescriptor) -> Result<(), AcsError> {
        let pos = match self
            .as_slice()
            .binary_search_by_key(&desc.freq_mhz, |d| d.freq_mhz)
        {
            Ok(_) => return Ok(()),
            Err(pos) => pos,
        };
        self.push(desc)?;
        self.entries[pos..self.len].rotate_right(1);
        Ok(())
    }

    /// 保留满足条件的项，保持顺序
    pub fn retain(&mut self, mut keep: impl FnMut(&ChannelDescriptor) -> bool) {
        let mut w = 0;
        for r in 0..self.len {
            if keep(&self.entries[r]) {
                self.entries[w] = self.entries[r];
                w += 1;
            }
        }
        self.len = w;
    }
}

/// 会话级信道存储：master + 候选下标
#[derive(Clone, Default)]
pub struct AcsChanArena {
    master: ChanList,
    active: ActiveIdx,
}

#[derive(Clone)]
struct ActiveIdx {
    idx: [u8; ACS_MAX_CHANNELS],
    len: usize,
}

impl Default for ActiveIdx {
    fn default() -> Self {
        Self {
            idx: [0; ACS_MAX_CHANNELS],
            len: 0,
        }
    }
}

impl AcsChanArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 丢弃本周期全部内容
    pub fn reset(&mut self) {
        self.master.clear();
        self.active.len = 0;
    }

    pub fn master(&self) -> &ChanList {
        &self.master
    }

    /// 建表阶段写 master；写完需调用 activate_all
    pub fn master_mut(&mut self) -> &mut ChanList {
        self.active.len = 0;
        &mut self.master
    }

    /// 候选集合 = master 全部
    pub fn activate_all(&mut self) {
        for i in 0..self.master.len() {
            self.active.idx[i] = i as u8;
        }
        self.active.len = self.master.len();
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len
    }

    #[inline]
    pub fn active_is_empty(&self) -> bool {
        self.active.len == 0
    }

    /// 候选集合，保持 master 中的顺序
    pub fn active(&self) -> impl Iterator<Item = &ChannelDescriptor> + Clone + '_ {
        self.active.idx[..self.active.len]
            .iter()
            .map(move |&i| &self.master.as_slice()[i as usize])
    }

    pub fn first_active(&self) -> Option<&ChannelDescriptor> {
        self.active().next()
    }

    pub fn active_contains(&self, freq: u32) -> bool {
        self.active().any(|d| d.freq_mhz == freq)
    }

    /// 保留满足条件的候选
    pub fn retain_active(&mut self, mut keep: impl FnMut(&ChannelDescriptor) -> bool) {
        let mut w = 0;
        for r in 0..self.active.len {
            let i = self.active.idx[r];
            if keep(&self.master.as_slice()[i as usize]) {
                self.active.idx[w] = i;
                w += 1;
            }
        }
        self.active.len = w;
    }

    /// 候选集合只剩 master[master_idx]
    pub fn select_single(&mut self, master_idx: usize) {
        if master_idx < self.master.len() {
            self.active.idx[0] = master_idx as u8;
            self.active.len = 1;
        }
    }

    /// 候选集合只剩 desc；master 中没有时先按序插入
    pub fn force_single(&mut self, desc: ChannelDescriptor) -> Result<(), AcsError> {
        if !self.master.contains_freq(desc.freq_mhz) {
            self.master.insert_sorted(desc)?;
        }
        let idx = self
            .master
            .iter()
            .position(|d| d.freq_mhz == desc.freq_mhz)
            .ok_or(AcsError::AllocationFailure)?;
        self.select_single(idx);
        Ok(())
    }

    /// 候选集合拷贝为连续表（交给扫描等外部模块）
    pub fn active_list(&self) -> ChanList {
        let mut out = ChanList::new();
        // active 是 master 的下标子序列，长度不超过 ACS_MAX_CHANNELS
        for (slot, &i) in out.entries.iter_mut().zip(&self.active.idx[..self.active.len]) {
            *slot = self.master.entries[i as usize];
        }
        out.len = self.active.len;
        out
    }

    /// 以当前候选集合作为新的 master，之后的回退只在其中挑选
    pub fn rebase_master(&mut self) {
        self.master = self.active_list();
        self.activate_all();
    }

    /// 候选集合的频率范围 (min, max)
    pub fn active_freq_range(&self) -> Option<(u32, u32)> {
        let first = self.first_active()?.freq_mhz;
        let last = self.active().last()?.freq_mhz;
        Some((first, last))
    }
}
