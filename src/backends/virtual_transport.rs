//! In-memory transport for tests and demos.
//!
//! [`VirtualTransport`] pretends a set of devices is attached and replays a
//! scripted queue of read outcomes. It records every `open` attempt so callers
//! can check scan order.

use crate::transport::{Transport, TransportError};
use std::collections::VecDeque;

/// Result of one scripted read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedRead {
    /// A report arrives; the bytes include the report id.
    Report(Vec<u8>),
    /// The read fails.
    Error(String),
}

/// Handle returned by [`VirtualTransport::open`].
#[derive(Debug, PartialEq, Eq)]
pub struct VirtualHandle {
    pub vendor_id: u16,
    pub product_id: u16,
}

#[derive(Default)]
pub struct VirtualTransport {
    attached: Vec<(u16, u16)>,
    reads: VecDeque<ScriptedRead>,
    open_attempts: Vec<(u16, u16)>,
    open_handles: usize,
    closed: usize,
}

impl VirtualTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `vendor_id:product_id` openable.
    pub fn attach(&mut self, vendor_id: u16, product_id: u16) {
        if !self.attached.contains(&(vendor_id, product_id)) {
            self.attached.push((vendor_id, product_id));
        }
    }

    /// Unplug a device. Existing handles keep working until closed.
    pub fn detach(&mut self, vendor_id: u16, product_id: u16) {
        self.attached.retain(|&ids| ids != (vendor_id, product_id));
    }

    /// Queue a successful read.
    pub fn feed(&mut self, report: impl Into<Vec<u8>>) {
        self.reads.push_back(ScriptedRead::Report(report.into()));
    }

    /// Queue a failing read.
    pub fn fail_next_read(&mut self, message: &str) {
        self.reads.push_back(ScriptedRead::Error(message.to_string()));
    }

    /// Number of scripted reads not yet consumed.
    pub fn pending_reads(&self) -> usize {
        self.reads.len()
    }

    /// Every `(vid, pid)` passed to `open`, in call order.
    pub fn open_attempts(&self) -> &[(u16, u16)] {
        &self.open_attempts
    }

    pub fn clear_open_attempts(&mut self) {
        self.open_attempts.clear();
    }

    /// Handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.open_handles
    }

    /// Total number of `close` calls.
    pub fn closed_count(&self) -> usize {
        self.closed
    }
}

impl Transport for VirtualTransport {
    type Handle = VirtualHandle;

    fn open(&mut self, vendor_id: u16, product_id: u16) -> Option<VirtualHandle> {
        self.open_attempts.push((vendor_id, product_id));
        if self.attached.contains(&(vendor_id, product_id)) {
            self.open_handles += 1;
            Some(VirtualHandle {
                vendor_id,
                product_id,
            })
        } else {
            None
        }
    }

    fn read(
        &mut self,
        _handle: &mut VirtualHandle,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        match self.reads.pop_front() {
            None => Ok(0),
            Some(ScriptedRead::Report(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(ScriptedRead::Error(message)) => Err(TransportError::new(message)),
        }
    }

    fn close(&mut self, _handle: VirtualHandle) {
        self.open_handles = self.open_handles.saturating_sub(1);
        self.closed += 1;
    }
}
