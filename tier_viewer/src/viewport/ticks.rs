use bevy::prelude::*;

use crate::viewport::lifecycle::{InstanceId, TickHandle};

/// One-shot redraw requests, fired on the next frame.
/// Nothing fires while the window is unfocused; requests wait instead.
#[derive(Resource, Default, Debug)]
pub struct TickScheduler {
    issued: u64,
    pending: Vec<(TickHandle, InstanceId)>,
}

impl TickScheduler {
    pub fn request(&mut self, instance: InstanceId) -> TickHandle {
        self.issued += 1;
        let handle = TickHandle(self.issued);
        self.pending.push((handle, instance));
        handle
    }

    /// Returns false if the handle already fired or was never issued.
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    pub fn take_due(&mut self) -> Vec<(TickHandle, InstanceId)> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_cancel_once() {
        let mut ticks = TickScheduler::default();
        let a = ticks.request(InstanceId(0));
        let b = ticks.request(InstanceId(0));
        assert_ne!(a, b);

        assert!(ticks.cancel(a));
        assert!(!ticks.cancel(a));
        assert_eq!(ticks.take_due(), vec![(b, InstanceId(0))]);
        assert_eq!(ticks.pending(), 0);
        assert!(!ticks.cancel(b));
    }
}
