//! Типизированные буферы в глобальной памяти устройства CUDA

use crate::cuda::bindings::*;
use crate::cuda::types::*;
use crate::cuda_check;
use anyhow::Result;
use std::ffi::c_void;
use std::ptr;

/// Буфер на `len` элементов типа `T` в памяти устройства
pub struct CudaBuffer<T: Copy> {
    ptr: *mut T,
    len: usize,
}

impl<T: Copy> CudaBuffer<T> {
    /// Выделяет буфер в памяти устройства
    pub fn new(len: usize) -> Result<Self> {
        let mut ptr: *mut c_void = ptr::null_mut();
        cuda_check!(cudaMalloc(&mut ptr, len * std::mem::size_of::<T>()))?;

        Ok(Self {
            ptr: ptr as *mut T,
            len,
        })
    }

    /// Копирует срез из памяти хоста в буфер
    pub fn copy_from_host(&self, data: &[T]) -> Result<()> {
        if data.len() != self.len {
            return Err(anyhow::anyhow!(
                "Buffer length mismatch: expected {}, got {}",
                self.len,
                data.len()
            ));
        }

        cuda_check!(cudaMemcpy(
            self.ptr as *mut c_void,
            data.as_ptr() as *const c_void,
            data.len() * std::mem::size_of::<T>(),
            cudaMemcpyHostToDevice
        ))
    }

    /// Копирует содержимое буфера из памяти устройства в срез хоста
    pub fn copy_to_host(&self, output: &mut [T]) -> Result<()> {
        if output.len() != self.len {
            return Err(anyhow::anyhow!(
                "Buffer length mismatch: expected {}, got {}",
                self.len,
                output.len()
            ));
        }

        cuda_check!(cudaMemcpy(
            output.as_mut_ptr() as *mut c_void,
            self.ptr as *const c_void,
            output.len() * std::mem::size_of::<T>(),
            cudaMemcpyDeviceToHost
        ))
    }

    /// Количество элементов в буфере
    pub fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }
}

impl<T: Copy> Drop for CudaBuffer<T> {
    fn drop(&mut self) {
        unsafe {
            cudaFree(self.ptr as *mut c_void);
        }
    }
}
