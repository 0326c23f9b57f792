//! Умножение матриц в модели запуска ядра конкретного вендора (CUDA)
//!
//! Хост явно управляет памятью устройства: выделяет буферы, копирует
//! входные матрицы, запускает ядро сеткой блоков 16 x 16 и забирает
//! результат. Результат проверяется против эталонного CPU-умножения.

use anyhow::Result;
use gpu_matrix_multiply::cuda::{self, CudaBuffer};
use gpu_matrix_multiply::matrix::{
    compare_results, cpu_matrix_multiply, initialize_matrices, print_corner,
};
use gpu_matrix_multiply::utils::measure_time;
use gpu_matrix_multiply::MatrixType;

const M: usize = 512;
const K: usize = 512;
const N: usize = 512;

fn main() -> Result<()> {
    println!("Умножение матриц на CUDA: C ({} x {}) = A ({} x {}) * B ({} x {})", M, N, M, K, K, N);

    // Входные данные: A заполнена единицами, B двойками,
    // поэтому каждый элемент C равен ровно K * 2
    let (a, b) = initialize_matrices(MatrixType::OnesAndTwos, M, K, N);
    println!("\nМатрица A (верхний левый угол):");
    print_corner(&a, M, K);
    println!("Матрица B (верхний левый угол):");
    print_corner(&b, K, N);

    // Выделяем память устройства и копируем входы
    println!("\nКопирование матриц в память устройства...");
    let d_a = CudaBuffer::<f32>::new(M * K)?;
    let d_b = CudaBuffer::<f32>::new(K * N)?;
    let mut d_c = CudaBuffer::<f32>::new(M * N)?;
    d_a.copy_from_host(&a)?;
    d_b.copy_from_host(&b)?;

    // Запуск ядра
    println!("Запуск ядра CUDA...");
    let (launch_result, gpu_time) =
        measure_time(|| cuda::matrix_multiply(&d_a, &d_b, &mut d_c, M, K, N));
    launch_result?;
    println!("Ядро выполнено за {:?}", gpu_time);

    // Забираем результат на хост
    let mut c = vec![0.0f32; M * N];
    d_c.copy_to_host(&mut c)?;

    let expected = K as f32 * 2.0;
    println!("\nГотово! Элемент [0,0]: {} (ожидалось: {})", c[0], expected);

    // Проверка корректности против CPU
    let mut cpu_result = vec![0.0f32; M * N];
    let (_, cpu_time) = measure_time(|| cpu_matrix_multiply(&a, &b, &mut cpu_result, M, K, N));

    if !compare_results(&c, &cpu_result, M, N) {
        return Err(anyhow::anyhow!("GPU and CPU results diverged"));
    }

    // Сравнение производительности
    let speedup = cpu_time.as_secs_f64() / gpu_time.as_secs_f64();
    let improvement_percent = (speedup - 1.0) * 100.0;
    println!("\nРезультаты сравнения производительности:");
    println!("----------------------------------------");
    println!("Время GPU: {:.6} мс", gpu_time.as_secs_f64() * 1000.0);
    println!("Время CPU: {:.6} мс", cpu_time.as_secs_f64() * 1000.0);
    println!("GPU быстрее CPU в {:.2}x раз", speedup);
    println!("Улучшение производительности: {:.1}%", improvement_percent);

    Ok(())
}
