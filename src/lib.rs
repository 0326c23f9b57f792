//! GPU-ускоренное умножение матриц
//!
//! Две демонстрационные программы поверх одной библиотеки:
//! - `matrix_multiply_cuda` — модель запуска ядра конкретного вендора (CUDA);
//! - `matrix_multiply_opencl` — переносимый слой (OpenCL) с тремя
//!   равнозначными стилями постановки ядра в очередь.

pub mod matrix;
pub mod utils;

#[cfg(feature = "opencl")]
pub mod opencl;

#[cfg(feature = "cuda")]
pub mod cuda;

// Реэкспортируем макросы на уровень крейта
#[macro_use]
mod macros {
    /// Макрос для обработки ошибок OpenCL (коды возврата)
    #[macro_export]
    macro_rules! cl_check {
        ($expr:expr) => {{
            let code = unsafe { $expr };
            if code != 0 {
                Err(anyhow::anyhow!("OpenCL error code: {}", code))
            } else {
                Ok(())
            }
        }};
    }

    /// Макрос для обработки указателей OpenCL
    #[macro_export]
    macro_rules! cl_create {
        // Специальный случай для clCreateContext
        (clCreateContext($props:expr, $num:expr, $devs:expr, $cb:expr, $data:expr, $err:expr)) => {{
            let callback: $crate::opencl::callbacks::ContextNotifyCallback =
                Some($crate::opencl::callbacks::empty_context_callback);
            let obj = unsafe {
                $crate::opencl::bindings::clCreateContext(
                    $props,
                    $num,
                    $devs,
                    callback,
                    std::ptr::null_mut(),
                    $err
                )
            };
            if obj.is_null() {
                Err(anyhow::anyhow!("Failed to create OpenCL context"))
            } else {
                Ok(obj)
            }
        }};
        // Общий случай для других функций
        ($func:ident($($arg:expr),*)) => {{
            let obj = unsafe { $func($($arg),*) };
            if obj.is_null() {
                Err(anyhow::anyhow!(concat!("Failed to create OpenCL object: ", stringify!($func))))
            } else {
                Ok(obj)
            }
        }};
    }

    /// Макрос для обработки ошибок CUDA (коды возврата рантайма)
    #[macro_export]
    macro_rules! cuda_check {
        ($expr:expr) => {{
            let code = unsafe { $expr };
            if code != 0 {
                Err(anyhow::anyhow!(
                    "CUDA error code {}: {}",
                    code,
                    $crate::cuda::error_string(code)
                ))
            } else {
                Ok(())
            }
        }};
    }
}

// Реэкспорт основных типов для удобства
pub use matrix::MatrixType;

#[cfg(feature = "opencl")]
pub use opencl::types::*;
