//! Низкоуровневые привязки к рантайму CUDA
//!
//! Управление памятью и синхронизация идут через libcudart, запуск ядра —
//! через обертку из статической библиотеки, которую build-скрипт собирает
//! из `cuda/matrix_multiply_kernel.cu`.

use super::types::*;
use std::ffi::c_void;
use std::os::raw::c_char;

#[link(name = "cudart")]
unsafe extern "C" {
    pub fn cudaMalloc(dev_ptr: *mut *mut c_void, size: usize) -> cudaError_t;

    pub fn cudaFree(dev_ptr: *mut c_void) -> cudaError_t;

    pub fn cudaMemcpy(
        dst: *mut c_void,
        src: *const c_void,
        count: usize,
        kind: cudaMemcpyKind
    ) -> cudaError_t;

    pub fn cudaDeviceSynchronize() -> cudaError_t;

    pub fn cudaGetLastError() -> cudaError_t;

    pub fn cudaGetErrorString(error: cudaError_t) -> *const c_char;

    pub fn cudaGetDeviceCount(count: *mut i32) -> cudaError_t;
}

#[link(name = "matrix_mul_cuda", kind = "static")]
unsafe extern "C" {
    pub fn launch_matrix_multiply(
        a: *const f32,
        b: *const f32,
        c: *mut f32,
        m: i32,
        k: i32,
        n: i32
    );
}
