//! Переносимое умножение матриц на OpenCL
//!
//! Одно и то же ядро отправляется в очередь тремя равнозначными стилями:
//! замыканием, объектом-задачей и по имени из собранной программы.
//! Первые два стиля пишут в независимые буферы C1 и C2, третьим стилем
//! запускается ядро проверки, поэлементно сравнивающее C1 и C2 прямо
//! на устройстве. Затем оба результата сверяются с эталонным
//! CPU-умножением.

use anyhow::Result;
use gpu_matrix_multiply::matrix::{
    compare_results, cpu_matrix_multiply, initialize_matrices, print_corner,
    MATRIX_COMPARE_KERNEL, MATRIX_MULTIPLY_KERNEL,
};
use gpu_matrix_multiply::opencl::{
    DeviceBuffer, GpuContext, GpuKernel, KernelArgs, KernelTask, NdRange,
};
use gpu_matrix_multiply::utils::measure_time;
use gpu_matrix_multiply::{MatrixType, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE};
use prettytable::{row, Table};

const M: usize = 512;
const K: usize = 512;
const N: usize = 512;

/// Задача умножения матриц: ядро, диапазон и аргументы одним объектом
struct MatrixMultiplyTask<'a> {
    kernel: GpuKernel,
    a: &'a DeviceBuffer<f32>,
    b: &'a DeviceBuffer<f32>,
    c: &'a DeviceBuffer<f32>,
    m: usize,
    k: usize,
    n: usize,
}

impl KernelTask for MatrixMultiplyTask<'_> {
    fn kernel(&self) -> &GpuKernel {
        &self.kernel
    }

    fn range(&self) -> NdRange {
        NdRange::global(self.m, self.n)
    }

    fn bind(&self, args: &mut KernelArgs) -> Result<()> {
        args.arg_buffer(self.a)?
            .arg_buffer(self.b)?
            .arg_buffer(self.c)?
            .arg_i32(self.m as i32)?
            .arg_i32(self.k as i32)?
            .arg_i32(self.n as i32)?;

        Ok(())
    }
}

fn main() -> Result<()> {
    println!(
        "Переносимое умножение матриц на OpenCL: C ({} x {}) = A ({} x {}) * B ({} x {})",
        M, N, M, K, K, N
    );

    let ctx = GpuContext::new()?;
    println!("Запуск на устройстве: {}", ctx.device_name()?);
    println!("Максимальный размер рабочей группы: {}", ctx.max_work_group_size()?);

    println!("\nКомпиляция OpenCL программы...");
    let program = ctx.build_program(&[MATRIX_MULTIPLY_KERNEL, MATRIX_COMPARE_KERNEL])?;

    // Входные данные: A заполнена единицами, B двойками,
    // поэтому каждый элемент C равен ровно K * 2
    let (a, b) = initialize_matrices(MatrixType::OnesAndTwos, M, K, N);

    println!("Копирование матриц в память устройства...");
    let d_a = DeviceBuffer::<f32>::new(&ctx, CL_MEM_READ_ONLY, M * K)?;
    let d_b = DeviceBuffer::<f32>::new(&ctx, CL_MEM_READ_ONLY, K * N)?;
    d_a.write(&ctx, &a)?;
    d_b.write(&ctx, &b)?;

    // Два независимых буфера результата: ядро проверки потом читает оба
    let d_c1 = DeviceBuffer::<f32>::new(&ctx, CL_MEM_READ_WRITE, M * N)?;
    let d_c2 = DeviceBuffer::<f32>::new(&ctx, CL_MEM_READ_WRITE, M * N)?;

    // Стиль 1: аргументы привязываются замыканием, размер рабочей
    // группы выбирает драйвер
    println!("\nСтиль 1: отправка ядра с привязкой аргументов замыканием...");
    let multiply_kernel = program.kernel("matrix_multiply")?;
    let (submitted, closure_time) = measure_time(|| {
        ctx.submit(&multiply_kernel, NdRange::global(M, N), |args| {
            args.arg_buffer(&d_a)?
                .arg_buffer(&d_b)?
                .arg_buffer(&d_c1)?
                .arg_i32(M as i32)?
                .arg_i32(K as i32)?
                .arg_i32(N as i32)?;

            Ok(())
        })?;

        ctx.finish()
    });
    submitted?;
    println!("Выполнено за {:?}", closure_time);

    // Стиль 2: заранее сконструированный объект-задача
    println!("\nСтиль 2: отправка заранее сконструированного объекта-задачи...");
    let task = MatrixMultiplyTask {
        kernel: program.kernel("matrix_multiply")?,
        a: &d_a,
        b: &d_b,
        c: &d_c2,
        m: M,
        k: K,
        n: N,
    };
    let (submitted, task_time) = measure_time(|| {
        ctx.submit_task(&task)?;

        ctx.finish()
    });
    submitted?;
    println!("Выполнено за {:?}", task_time);

    // Стиль 3: ядро проверки выбирается по имени из собранной программы
    // и поэлементно сравнивает C1 и C2 на устройстве
    println!("\nСтиль 3: отправка ядра проверки \"matrix_compare\" по имени...");
    let d_mismatches = DeviceBuffer::<i32>::new(&ctx, CL_MEM_READ_WRITE, 1)?;
    d_mismatches.write(&ctx, &[0])?;
    let (submitted, compare_time) = measure_time(|| {
        ctx.submit_named(&program, "matrix_compare", NdRange::global(M, N), |args| {
            args.arg_buffer(&d_c1)?
                .arg_buffer(&d_c2)?
                .arg_buffer(&d_mismatches)?
                .arg_i32(M as i32)?
                .arg_i32(N as i32)?;

            Ok(())
        })?;

        ctx.finish()
    });
    submitted?;
    println!("Выполнено за {:?}", compare_time);

    let mut mismatches = vec![0i32; 1];
    d_mismatches.read(&ctx, &mut mismatches)?;
    let mismatches = mismatches[0];
    println!("Расхождений между C1 и C2 на устройстве: {}", mismatches);
    if mismatches != 0 {
        return Err(anyhow::anyhow!(
            "Device verification found {} mismatches between C1 and C2",
            mismatches
        ));
    }

    // Забираем оба результата на хост
    let mut c1 = vec![0.0f32; M * N];
    let mut c2 = vec![0.0f32; M * N];
    d_c1.read(&ctx, &mut c1)?;
    d_c2.read(&ctx, &mut c2)?;

    let expected = K as f32 * 2.0;
    println!("\nГотово! Элемент [0,0] (замыкание): {} (ожидалось: {})", c1[0], expected);
    println!("Готово! Элемент [0,0] (объект-задача): {} (ожидалось: {})", c2[0], expected);
    println!("Результат C1 (верхний левый угол):");
    print_corner(&c1, M, N);

    // Проверка корректности против CPU
    let mut cpu_result = vec![0.0f32; M * N];
    let (_, cpu_time) = measure_time(|| cpu_matrix_multiply(&a, &b, &mut cpu_result, M, K, N));

    println!("\nПроверка C1 (замыкание):");
    let c1_ok = compare_results(&c1, &cpu_result, M, N);
    println!("Проверка C2 (объект-задача):");
    let c2_ok = compare_results(&c2, &cpu_result, M, N);
    if !c1_ok || !c2_ok {
        return Err(anyhow::anyhow!("GPU and CPU results diverged"));
    }

    // Итоговая таблица по трем стилям отправки
    let mut results_table = Table::new();
    results_table.add_row(row!["Стиль отправки", "Время", "Элемент [0,0]"]);
    results_table.add_row(row!["Замыкание", format!("{:?}", closure_time), c1[0]]);
    results_table.add_row(row!["Объект-задача", format!("{:?}", task_time), c2[0]]);
    results_table.add_row(row![
        "Ядро по имени (проверка)",
        format!("{:?}", compare_time),
        format!("{} расхождений", mismatches)
    ]);
    results_table.printstd();

    // Сравнение производительности
    let speedup = cpu_time.as_secs_f64() / closure_time.as_secs_f64();
    let improvement_percent = (speedup - 1.0) * 100.0;
    println!("\nРезультаты сравнения производительности:");
    println!("----------------------------------------");
    println!("Время GPU: {:.6} мс", closure_time.as_secs_f64() * 1000.0);
    println!("Время CPU: {:.6} мс", cpu_time.as_secs_f64() * 1000.0);
    println!("GPU быстрее CPU в {:.2}x раз", speedup);
    println!("Улучшение производительности: {:.1}%", improvement_percent);

    Ok(())
}
