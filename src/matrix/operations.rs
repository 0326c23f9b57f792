//! Операции над матрицами

use super::types::MatrixType;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

/// Относительный допуск при сравнении f32-результатов GPU и CPU
const COMPARE_EPSILON: f32 = 1e-4;

/// Порог объема работы (M*K*N), после которого CPU-умножение показывает прогресс
const PROGRESS_THRESHOLD: usize = 1 << 24;

/// Инициализирует матрицы A (M x K) и B (K x N) заданного типа
pub fn initialize_matrices(
    matrix_type: MatrixType,
    m: usize,
    k: usize,
    n: usize,
) -> (Vec<f32>, Vec<f32>) {
    match matrix_type {
        MatrixType::OnesAndTwos => (vec![1.0f32; m * k], vec![2.0f32; k * n]),
        MatrixType::ThreesAndFours => (vec![3.0f32; m * k], vec![4.0f32; k * n]),
        MatrixType::Random => {
            let mut rng = rand::thread_rng();
            let a: Vec<f32> = (0..m * k).map(|_| rng.gen_range(0.0f32..1.0)).collect();
            let b: Vec<f32> = (0..k * n).map(|_| rng.gen_range(0.0f32..1.0)).collect();
            (a, b)
        }
    }
}

/// CPU реализация матричного умножения: C = A * B
///
/// A: M x K, B: K x N, C: M x N, построчное хранение. Порядок суммирования
/// по K совпадает с порядком в ядрах, поэтому на одинаковых входах
/// результаты совпадают побитово.
pub fn cpu_matrix_multiply(a: &[f32], b: &[f32], c: &mut [f32], m: usize, k: usize, n: usize) {
    println!("\nНачало CPU вычислений для верификации...");
    let start_time = std::time::Instant::now();

    let pb = if m * k * n >= PROGRESS_THRESHOLD {
        let pb = ProgressBar::new(m as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} строк")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f32;
            for l in 0..k {
                sum += a[i * k + l] * b[l * n + j];
            }
            c[i * n + j] = sum;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let duration = start_time.elapsed();
    println!("CPU вычисления завершены за {:?}", duration);
}

/// Сравнивает результаты GPU и CPU вычислений
pub fn compare_results(gpu_result: &[f32], cpu_result: &[f32], m: usize, n: usize) -> bool {
    println!("\nСравнение результатов GPU и CPU...");
    let mut max_diff = 0.0f32;
    let mut diff_count = 0;

    for i in 0..m {
        for j in 0..n {
            let idx = i * n + j;
            let diff = (gpu_result[idx] - cpu_result[idx]).abs();
            if diff > COMPARE_EPSILON * cpu_result[idx].abs().max(1.0) {
                diff_count += 1;
                max_diff = max_diff.max(diff);
            }
        }
    }

    if diff_count > 0 {
        println!("Обнаружены расхождения:");
        println!("Количество различающихся элементов: {}", diff_count);
        println!("Максимальная разница: {}", max_diff);
        false
    } else {
        println!("Результаты GPU и CPU полностью совпадают!");
        true
    }
}

/// Печатает верхний левый угол матрицы (не больше 4 x 4)
pub fn print_corner(data: &[f32], rows: usize, cols: usize) {
    for i in 0..rows.min(4) {
        for j in 0..cols.min(4) {
            print!("{:.1} ", data[i * cols + j]);
        }
        println!("{}", if cols > 4 { "..." } else { "" });
    }
    if rows > 4 {
        println!("...");
    }
    println!();
}
