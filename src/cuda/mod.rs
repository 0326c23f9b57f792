//! Модуль для работы с CUDA
//!
//! Содержит привязки к рантайму, типизированные буферы устройства
//! и запуск ядра умножения матриц.

pub mod bindings;
pub mod memory;
pub mod types;

pub use memory::CudaBuffer;

use crate::cuda_check;
use anyhow::Result;

/// Возвращает текст ошибки рантайма CUDA по коду
pub fn error_string(code: types::cudaError_t) -> String {
    unsafe {
        let message = bindings::cudaGetErrorString(code);
        if message.is_null() {
            return format!("unknown error {}", code);
        }

        std::ffi::CStr::from_ptr(message).to_string_lossy().into_owned()
    }
}

/// Проверяет, видно ли хотя бы одно устройство CUDA
pub fn device_available() -> bool {
    let mut count = 0i32;
    let code = unsafe { bindings::cudaGetDeviceCount(&mut count) };

    code == types::cudaSuccess && count > 0
}

/// Перемножает матрицы на устройстве: C (m x n) = A (m x k) * B (k x n).
///
/// Все три буфера уже должны находиться в памяти устройства. Вызов
/// синхронный: возвращается после завершения ядра.
pub fn matrix_multiply(
    a: &CudaBuffer<f32>,
    b: &CudaBuffer<f32>,
    c: &mut CudaBuffer<f32>,
    m: usize,
    k: usize,
    n: usize,
) -> Result<()> {
    if a.len() != m * k || b.len() != k * n || c.len() != m * n {
        return Err(anyhow::anyhow!("Matrix dimensions do not match buffer sizes"));
    }

    unsafe {
        bindings::launch_matrix_multiply(
            a.as_ptr(),
            b.as_ptr(),
            c.as_mut_ptr(),
            m as i32,
            k as i32,
            n as i32,
        );
    }

    cuda_check!(bindings::cudaGetLastError())?;
    cuda_check!(bindings::cudaDeviceSynchronize())?;

    Ok(())
}
