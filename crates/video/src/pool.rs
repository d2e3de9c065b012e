use crate::VideoError;

/// Who may touch a slot right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Mapped, not handed to the driver.
    Idle,
    /// In the driver's incoming queue.
    Queued,
    /// Filled and owned by user code until requeued.
    Dequeued,
}

#[derive(Debug)]
struct Slot<M> {
    mapping: M,
    state: SlotState,
}

/// The fixed set of buffers shared with the driver, indexed by the
/// driver-assigned buffer index.
///
/// Slots are only added during initialization. `clear` drops every mapping,
/// which unmaps it.
#[derive(Debug)]
pub struct BufferPool<M> {
    slots: Vec<Slot<M>>,
}

impl<M> Default for BufferPool<M> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<M: AsRef<[u8]>> BufferPool<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the mapping for the next buffer index.
    pub fn push(&mut self, mapping: M) {
        self.slots.push(Slot {
            mapping,
            state: SlotState::Idle,
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn state(&self, index: u32) -> Option<SlotState> {
        self.slots.get(index as usize).map(|slot| slot.state)
    }

    /// Length of the mapped region behind `index`.
    pub fn mapped_len(&self, index: u32) -> Option<usize> {
        self.slots
            .get(index as usize)
            .map(|slot| slot.mapping.as_ref().len())
    }

    pub fn indices(&self) -> std::ops::Range<u32> {
        0..self.slots.len() as u32
    }

    /// Record that the driver owns the slot again.
    pub fn mark_queued(&mut self, index: u32) -> Result<(), VideoError> {
        let slot = self.slot_mut(index)?;
        if slot.state == SlotState::Queued {
            return Err(VideoError::Buffer {
                index,
                message: "already queued".to_string(),
            });
        }
        slot.state = SlotState::Queued;
        Ok(())
    }

    /// Record that the driver handed the slot back.
    pub fn mark_dequeued(&mut self, index: u32) -> Result<(), VideoError> {
        let slot = self.slot_mut(index)?;
        if slot.state != SlotState::Queued {
            return Err(VideoError::Buffer {
                index,
                message: "dequeued but was never queued".to_string(),
            });
        }
        slot.state = SlotState::Dequeued;
        Ok(())
    }

    /// Return every slot to `Idle`; after stream-off the driver holds none.
    pub fn mark_all_idle(&mut self) {
        for slot in &mut self.slots {
            slot.state = SlotState::Idle;
        }
    }

    /// The payload of a dequeued slot: its first `bytes_used` bytes.
    pub fn frame(&self, index: u32, bytes_used: usize) -> Result<&[u8], VideoError> {
        let slot = self.slots.get(index as usize).ok_or(VideoError::Buffer {
            index,
            message: format!("index out of range (pool has {})", self.slots.len()),
        })?;
        if slot.state != SlotState::Dequeued {
            return Err(VideoError::Buffer {
                index,
                message: "read while owned by the driver".to_string(),
            });
        }
        let data = slot.mapping.as_ref();
        data.get(..bytes_used).ok_or(VideoError::Buffer {
            index,
            message: format!("{} bytes used, {} mapped", bytes_used, data.len()),
        })
    }

    /// Unmap everything.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn slot_mut(&mut self, index: u32) -> Result<&mut Slot<M>, VideoError> {
        let len = self.slots.len();
        self.slots.get_mut(index as usize).ok_or(VideoError::Buffer {
            index,
            message: format!("index out of range (pool has {len})"),
        })
    }
}
