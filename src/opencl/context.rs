//! Безопасные обертки над контекстом OpenCL
//!
//! [`GpuContext`] владеет устройством, контекстом и очередью команд,
//! [`GpuProgram`] — собранной программой, [`DeviceBuffer`] — типизированным
//! буфером в памяти устройства. Все ресурсы освобождаются в `Drop`.

use crate::opencl::kernel::GpuKernel;
use crate::opencl::{bindings::*, types::*};
use crate::{cl_check, cl_create};
use anyhow::Result;
use std::marker::PhantomData;
use std::ptr;

/// Сколько платформ опрашиваем при инициализации
const MAX_PLATFORMS: usize = 8;

/// Контекст OpenCL: выбранное устройство, контекст и очередь команд
pub struct GpuContext {
    device: cl_device_id,
    context: cl_context,
    pub(crate) command_queue: cl_command_queue,
}

/// Ищет устройство на платформе: сначала GPU, при его отсутствии CPU
fn find_device(platform: cl_platform_id) -> Result<Option<cl_device_id>> {
    for device_type in [CL_DEVICE_TYPE_GPU, CL_DEVICE_TYPE_CPU] {
        let mut device_ids = vec![ptr::null_mut(); 1];
        let mut num_devices = 0;

        let code = unsafe {
            clGetDeviceIDs(
                platform,
                device_type,
                1,
                device_ids.as_mut_ptr(),
                &mut num_devices,
            )
        };

        if code == CL_DEVICE_NOT_FOUND || (code == CL_SUCCESS && num_devices == 0) {
            continue;
        }
        if code != CL_SUCCESS {
            return Err(anyhow::anyhow!("OpenCL error code: {}", code));
        }

        return Ok(Some(device_ids[0]));
    }

    Ok(None)
}

impl GpuContext {
    /// Инициализирует OpenCL: выбирает устройство, создает контекст
    /// и очередь команд
    pub fn new() -> Result<Self> {
        // Инициализация OpenCL
        let mut platform_ids = vec![ptr::null_mut(); MAX_PLATFORMS];
        let mut num_platforms = 0;

        cl_check!(clGetPlatformIDs(
            MAX_PLATFORMS as cl_uint,
            platform_ids.as_mut_ptr(),
            &mut num_platforms
        ))?;

        // Поиск устройства на доступных платформах
        let count = (num_platforms as usize).min(MAX_PLATFORMS);
        let mut device = None;
        for &platform in platform_ids.iter().take(count) {
            if let Some(found) = find_device(platform)? {
                device = Some(found);
                break;
            }
        }
        let device = match device {
            Some(device) => device,
            None => return Err(anyhow::anyhow!("No OpenCL device found")),
        };

        // Создание контекста и очереди команд
        let context = cl_create!(clCreateContext(
            ptr::null(),
            1,
            &device,
            None,
            ptr::null_mut(),
            &mut 0
        ))?;

        let command_queue = cl_create!(clCreateCommandQueue(context, device, 0, &mut 0))?;

        Ok(Self {
            device,
            context,
            command_queue,
        })
    }

    /// Возвращает название выбранного устройства
    pub fn device_name(&self) -> Result<String> {
        let mut size = 0usize;
        cl_check!(clGetDeviceInfo(
            self.device,
            CL_DEVICE_NAME,
            0,
            ptr::null_mut(),
            &mut size
        ))?;

        let mut name = vec![0u8; size];
        cl_check!(clGetDeviceInfo(
            self.device,
            CL_DEVICE_NAME,
            size,
            name.as_mut_ptr() as *mut std::ffi::c_void,
            ptr::null_mut()
        ))?;

        Ok(String::from_utf8_lossy(&name)
            .trim_end_matches('\0')
            .to_string())
    }

    /// Максимальный размер рабочей группы устройства
    pub fn max_work_group_size(&self) -> Result<usize> {
        let mut max_work_group_size = 0usize;
        cl_check!(clGetDeviceInfo(
            self.device,
            CL_DEVICE_MAX_WORK_GROUP_SIZE,
            std::mem::size_of::<usize>(),
            &mut max_work_group_size as *mut _ as *mut std::ffi::c_void,
            ptr::null_mut()
        ))?;

        Ok(max_work_group_size)
    }

    /// Компилирует программу из одного или нескольких исходников
    pub fn build_program(&self, sources: &[&str]) -> Result<GpuProgram> {
        // Компиляция программы
        let pointers: Vec<*const i8> = sources.iter().map(|s| s.as_ptr() as *const i8).collect();
        let lengths: Vec<usize> = sources.iter().map(|s| s.len()).collect();

        let program = cl_create!(clCreateProgramWithSource(
            self.context,
            sources.len() as cl_uint,
            pointers.as_ptr(),
            lengths.as_ptr(),
            &mut 0
        ))?;

        if let Err(e) = cl_check!(clBuildProgram(
            program,
            1,
            &self.device,
            ptr::null(),
            None,
            ptr::null_mut()
        )) {
            // В случае ошибки выводим лог компиляции
            let mut log_size = 0;
            cl_check!(clGetProgramBuildInfo(
                program,
                self.device,
                CL_PROGRAM_BUILD_LOG,
                0,
                ptr::null_mut(),
                &mut log_size
            ))?;

            let mut log = vec![0u8; log_size];
            cl_check!(clGetProgramBuildInfo(
                program,
                self.device,
                CL_PROGRAM_BUILD_LOG,
                log_size,
                log.as_mut_ptr() as *mut std::ffi::c_void,
                ptr::null_mut()
            ))?;

            println!("OpenCL compilation error:\n{}", String::from_utf8_lossy(&log));
            unsafe { clReleaseProgram(program) };
            return Err(e);
        }

        Ok(GpuProgram { program })
    }

    /// Дожидается завершения всех команд в очереди
    pub fn finish(&self) -> Result<()> {
        cl_check!(clFinish(self.command_queue))
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            clReleaseCommandQueue(self.command_queue);
            clReleaseContext(self.context);
        }
    }
}

/// Собранная OpenCL-программа, из которой создаются ядра
pub struct GpuProgram {
    program: cl_program,
}

impl GpuProgram {
    /// Создает ядро по имени
    pub fn kernel(&self, name: &str) -> Result<GpuKernel> {
        let c_name = super::utils::to_c_string(name);
        let kernel = cl_create!(clCreateKernel(self.program, c_name.as_ptr(), &mut 0))?;

        Ok(GpuKernel { kernel })
    }
}

impl Drop for GpuProgram {
    fn drop(&mut self) {
        unsafe {
            clReleaseProgram(self.program);
        }
    }
}

/// Типизированный буфер в памяти устройства
pub struct DeviceBuffer<T: Copy> {
    pub(crate) mem: cl_mem,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Copy> DeviceBuffer<T> {
    /// Выделяет буфер на `len` элементов
    pub fn new(ctx: &GpuContext, flags: cl_mem_flags, len: usize) -> Result<Self> {
        let mem = cl_create!(clCreateBuffer(
            ctx.context,
            flags,
            len * std::mem::size_of::<T>(),
            ptr::null_mut(),
            &mut 0
        ))?;

        Ok(Self {
            mem,
            len,
            _marker: PhantomData,
        })
    }

    /// Блокирующая запись среза в буфер
    pub fn write(&self, ctx: &GpuContext, data: &[T]) -> Result<()> {
        if data.len() != self.len {
            return Err(anyhow::anyhow!(
                "Buffer length mismatch: expected {}, got {}",
                self.len,
                data.len()
            ));
        }

        cl_check!(clEnqueueWriteBuffer(
            ctx.command_queue,
            self.mem,
            CL_TRUE,
            0,
            data.len() * std::mem::size_of::<T>(),
            data.as_ptr() as *const std::ffi::c_void,
            0,
            ptr::null(),
            ptr::null_mut()
        ))
    }

    /// Блокирующее чтение буфера в срез
    pub fn read(&self, ctx: &GpuContext, output: &mut [T]) -> Result<()> {
        if output.len() != self.len {
            return Err(anyhow::anyhow!(
                "Buffer length mismatch: expected {}, got {}",
                self.len,
                output.len()
            ));
        }

        cl_check!(clEnqueueReadBuffer(
            ctx.command_queue,
            self.mem,
            CL_TRUE,
            0,
            output.len() * std::mem::size_of::<T>(),
            output.as_mut_ptr() as *mut std::ffi::c_void,
            0,
            ptr::null(),
            ptr::null_mut()
        ))
    }

    /// Количество элементов в буфере
    pub fn len(&self) -> usize {
        self.len
    }
}

impl<T: Copy> Drop for DeviceBuffer<T> {
    fn drop(&mut self) {
        unsafe {
            clReleaseMemObject(self.mem);
        }
    }
}
