//! Модуль для работы с OpenCL
//!
//! Содержит низкоуровневые привязки и безопасные обертки для OpenCL:
//! контекст с очередью команд, буферы устройства и три стиля постановки
//! ядра в очередь (замыкание, объект-задача, ядро по имени).

pub mod bindings;
pub mod callbacks;
pub mod context;
pub mod kernel;
pub mod types;
pub mod utils;

pub use context::{DeviceBuffer, GpuContext, GpuProgram};
pub use kernel::{GpuKernel, KernelArgs, KernelTask, NdRange};
