//! In-memory backend that records every OS request and can be told to fail.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::backend::{Attribute, AttributeHandle, Backend};

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub exported: BTreeSet<u32>,
    pub open_handles: usize,
    pub exports: usize,
    pub unexports: usize,
    pub opens: usize,
    pub closes: usize,
    pub stores: usize,
    pub loads: usize,
    pub attributes: BTreeMap<(u32, Attribute), Vec<u8>>,
    pub fail_export: BTreeMap<u32, i32>,
    pub fail_unexport: BTreeMap<u32, i32>,
    pub fail_open: BTreeMap<(u32, Attribute), i32>,
    pub fail_store: BTreeMap<(u32, Attribute), i32>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    /// Number of requests that reached the OS, successful or not
    pub fn os_calls(&self) -> usize {
        let state = self.state();
        state.exports + state.unexports + state.opens + state.stores + state.loads
    }

    pub fn attribute(&self, gpio: u32, attr: Attribute) -> Vec<u8> {
        self.state()
            .attributes
            .get(&(gpio, attr))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_attribute(&self, gpio: u32, attr: Attribute, content: &[u8]) {
        self.state()
            .attributes
            .insert((gpio, attr), content.to_vec());
    }
}

impl Backend for MockBackend {
    type Handle = MockHandle;

    fn export(&self, gpio: u32) -> io::Result<()> {
        let mut state = self.state();
        state.exports += 1;

        if let Some(errno) = state.fail_export.get(&gpio) {
            return Err(io::Error::from_raw_os_error(*errno));
        }
        if !state.exported.insert(gpio) {
            return Err(io::Error::from_raw_os_error(libc::EBUSY));
        }

        state
            .attributes
            .insert((gpio, Attribute::Direction), b"in\n".to_vec());
        state
            .attributes
            .insert((gpio, Attribute::Value), b"0\n".to_vec());
        Ok(())
    }

    fn unexport(&self, gpio: u32) -> io::Result<()> {
        let mut state = self.state();
        state.unexports += 1;

        if let Some(errno) = state.fail_unexport.get(&gpio) {
            return Err(io::Error::from_raw_os_error(*errno));
        }
        if !state.exported.remove(&gpio) {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        Ok(())
    }

    fn open(&self, gpio: u32, attr: Attribute) -> io::Result<MockHandle> {
        let mut state = self.state();

        if let Some(errno) = state.fail_open.get(&(gpio, attr)) {
            return Err(io::Error::from_raw_os_error(*errno));
        }
        if !state.exported.contains(&gpio) {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }

        state.opens += 1;
        state.open_handles += 1;
        Ok(MockHandle {
            gpio,
            attr,
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockHandle {
    gpio: u32,
    attr: Attribute,
    state: Arc<Mutex<MockState>>,
}

impl AttributeHandle for MockHandle {
    fn store(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut state = lock(&self.state);
        state.stores += 1;

        if let Some(errno) = state.fail_store.get(&(self.gpio, self.attr)) {
            return Err(io::Error::from_raw_os_error(*errno));
        }
        state
            .attributes
            .insert((self.gpio, self.attr), buf.to_vec());
        Ok(())
    }

    fn load(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = lock(&self.state);
        state.loads += 1;

        let content = state
            .attributes
            .get(&(self.gpio, self.attr))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let n = content.len().min(buf.len());
        buf[..n].copy_from_slice(&content[..n]);
        Ok(n)
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.open_handles -= 1;
        state.closes += 1;
    }
}
