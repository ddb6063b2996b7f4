//! CPU-writable, GPU-readable constant storage.

use std::marker::PhantomData;

use bytemuck::Pod;
use tracing::error;

use crate::constants::constant_buffer_byte_size;
use crate::error::{FrameError, FrameResult};

/// Persistently mapped array of `T` records.
///
/// Every record occupies a 256-byte aligned stride so that each one can be
/// bound on its own as a constant buffer view.
pub struct UploadBuffer<T: Pod> {
    data: Vec<u8>,
    element_count: usize,
    stride: usize,
    writes: u64,
    _marker: PhantomData<T>,
}

impl<T: Pod> UploadBuffer<T> {
    /// Allocates `element_count` zeroed records.
    pub fn new(element_count: usize) -> Self {
        let stride = constant_buffer_byte_size(std::mem::size_of::<T>());
        Self {
            data: vec![0; stride * element_count],
            element_count,
            stride,
            writes: 0,
            _marker: PhantomData,
        }
    }

    fn check_index(&self, index: usize) -> FrameResult<usize> {
        if index >= self.element_count {
            error!(
                index,
                capacity = self.element_count,
                "Constant buffer access out of range"
            );
            return Err(FrameError::CapacityExceeded {
                index,
                capacity: self.element_count,
            });
        }
        Ok(index * self.stride)
    }

    /// Overwrites record `index`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::CapacityExceeded`] when `index` is out of range.
    /// Nothing is written in that case.
    pub fn copy_data(&mut self, index: usize, value: &T) -> FrameResult<()> {
        let offset = self.check_index(index)?;
        let bytes = bytemuck::bytes_of(value);
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }

    /// Reads record `index` back.
    pub fn read(&self, index: usize) -> FrameResult<T> {
        let offset = self.check_index(index)?;
        let size = std::mem::size_of::<T>();
        Ok(bytemuck::pod_read_unaligned(&self.data[offset..offset + size]))
    }

    /// Address the GPU uses for the whole buffer.
    #[inline]
    pub fn base_address(&self) -> u64 {
        self.data.as_ptr() as u64
    }

    /// Address of record `index`.
    pub fn address_of(&self, index: usize) -> FrameResult<u64> {
        let offset = self.check_index(index)?;
        Ok(self.base_address() + offset as u64)
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Bytes between consecutive records.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Raw mapped contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of successful [`copy_data`](Self::copy_data) calls.
    #[inline]
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}
