//! Типы и константы рантайма CUDA

#[allow(non_camel_case_types)]
pub type cudaError_t = i32;
#[allow(non_camel_case_types)]
pub type cudaMemcpyKind = u32;

/// Код успешного завершения вызова рантайма
#[allow(non_upper_case_globals)]
pub const cudaSuccess: cudaError_t = 0;

/// Копирование из памяти хоста в память устройства
#[allow(non_upper_case_globals)]
pub const cudaMemcpyHostToDevice: cudaMemcpyKind = 1;

/// Копирование из памяти устройства в память хоста
#[allow(non_upper_case_globals)]
pub const cudaMemcpyDeviceToHost: cudaMemcpyKind = 2;
