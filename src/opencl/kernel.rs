//! Ядра OpenCL и стили постановки их в очередь
//!
//! Поддерживаются три равнозначных стиля отправки ядра:
//! - [`GpuContext::submit`] — аргументы привязываются замыканием на месте;
//! - [`GpuContext::submit_task`] — заранее сконструированный объект-задача
//!   со своим ядром, диапазоном и привязкой аргументов;
//! - [`GpuContext::submit_named`] — ядро выбирается по имени из уже
//!   собранной программы в момент отправки.
//!
//! Все три стиля дают одинаковый результат, различается только способ
//! описания запуска.

use crate::cl_check;
use crate::opencl::context::{DeviceBuffer, GpuContext, GpuProgram};
use crate::opencl::{bindings::*, types::*};
use anyhow::Result;
use std::ptr;

/// Дескриптор ядра, созданного из собранной программы
pub struct GpuKernel {
    pub(crate) kernel: cl_kernel,
}

impl Drop for GpuKernel {
    fn drop(&mut self) {
        unsafe {
            clReleaseKernel(self.kernel);
        }
    }
}

/// Двумерный диапазон индексов для запуска ядра
#[derive(Clone, Copy, Debug)]
pub struct NdRange {
    pub global: [usize; 2],
    pub local: Option<[usize; 2]>,
}

impl NdRange {
    /// Диапазон без явного размера рабочей группы: его выберет драйвер
    pub fn global(rows: usize, cols: usize) -> Self {
        Self {
            global: [rows, cols],
            local: None,
        }
    }

    /// Диапазон с явным размером рабочей группы.
    ///
    /// Глобальный размер округляется вверх до кратного локальному,
    /// поэтому ядро обязано само проверять выход за границы данных.
    pub fn with_local(rows: usize, cols: usize, local: [usize; 2]) -> Self {
        Self {
            global: [
                crate::utils::round_up(rows, local[0]),
                crate::utils::round_up(cols, local[1]),
            ],
            local: Some(local),
        }
    }
}

/// Последовательный связыватель аргументов ядра
pub struct KernelArgs<'a> {
    kernel: &'a GpuKernel,
    index: cl_uint,
}

impl<'a> KernelArgs<'a> {
    fn new(kernel: &'a GpuKernel) -> Self {
        Self { kernel, index: 0 }
    }

    /// Передает буфер устройства очередным аргументом ядра
    pub fn arg_buffer<T: Copy>(&mut self, buffer: &DeviceBuffer<T>) -> Result<&mut Self> {
        cl_check!(clSetKernelArg(
            self.kernel.kernel,
            self.index,
            std::mem::size_of::<cl_mem>(),
            &buffer.mem as *const _ as *const std::ffi::c_void
        ))?;
        self.index += 1;

        Ok(self)
    }

    /// Передает скаляр `int` очередным аргументом ядра
    pub fn arg_i32(&mut self, value: i32) -> Result<&mut Self> {
        cl_check!(clSetKernelArg(
            self.kernel.kernel,
            self.index,
            std::mem::size_of::<i32>(),
            &value as *const _ as *const std::ffi::c_void
        ))?;
        self.index += 1;

        Ok(self)
    }
}

/// Задача для очереди: ядро, диапазон и привязка аргументов одним объектом
pub trait KernelTask {
    /// Ядро, которое будет поставлено в очередь
    fn kernel(&self) -> &GpuKernel;

    /// Диапазон индексов запуска
    fn range(&self) -> NdRange;

    /// Привязывает аргументы ядра
    fn bind(&self, args: &mut KernelArgs) -> Result<()>;
}

impl GpuContext {
    /// Ставит ядро в очередь, привязывая аргументы замыканием
    pub fn submit<F>(&self, kernel: &GpuKernel, range: NdRange, bind: F) -> Result<()>
    where
        F: FnOnce(&mut KernelArgs) -> Result<()>,
    {
        let mut args = KernelArgs::new(kernel);
        bind(&mut args)?;

        self.enqueue(kernel, range)
    }

    /// Ставит в очередь заранее сконструированный объект-задачу
    pub fn submit_task(&self, task: &dyn KernelTask) -> Result<()> {
        let kernel = task.kernel();
        let mut args = KernelArgs::new(kernel);
        task.bind(&mut args)?;

        self.enqueue(kernel, task.range())
    }

    /// Ставит в очередь ядро, выбранное по имени из собранной программы.
    ///
    /// Ядро создается на время отправки: поставленная в очередь команда
    /// удерживает его до своего завершения, поэтому освобождение сразу
    /// после постановки безопасно.
    pub fn submit_named<F>(
        &self,
        program: &GpuProgram,
        name: &str,
        range: NdRange,
        bind: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut KernelArgs) -> Result<()>,
    {
        let kernel = program.kernel(name)?;

        self.submit(&kernel, range, bind)
    }

    fn enqueue(&self, kernel: &GpuKernel, range: NdRange) -> Result<()> {
        let local_ptr = match &range.local {
            Some(local) => local.as_ptr(),
            None => ptr::null(),
        };

        cl_check!(clEnqueueNDRangeKernel(
            self.command_queue,
            kernel.kernel,
            2,
            ptr::null(),
            range.global.as_ptr(),
            local_ptr,
            0,
            ptr::null(),
            ptr::null_mut()
        ))
    }
}
