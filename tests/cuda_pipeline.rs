#![cfg(feature = "cuda")]

//! Интеграционные тесты CUDA-конвейера.
//!
//! Требуют видимого устройства CUDA; при его отсутствии тесты
//! пропускаются с сообщением в stderr.

use anyhow::Result;
use gpu_matrix_multiply::cuda::{self, CudaBuffer};
use gpu_matrix_multiply::matrix::{compare_results, cpu_matrix_multiply, initialize_matrices};
use gpu_matrix_multiply::MatrixType;

fn device_ready() -> bool {
    if cuda::device_available() {
        true
    } else {
        eprintln!("Устройство CUDA недоступно, тест пропущен");
        false
    }
}

fn gpu_multiply(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Result<Vec<f32>> {
    let d_a = CudaBuffer::<f32>::new(m * k)?;
    let d_b = CudaBuffer::<f32>::new(k * n)?;
    let mut d_c = CudaBuffer::<f32>::new(m * n)?;
    d_a.copy_from_host(a)?;
    d_b.copy_from_host(b)?;

    cuda::matrix_multiply(&d_a, &d_b, &mut d_c, m, k, n)?;

    let mut c = vec![0.0f32; m * n];
    d_c.copy_to_host(&mut c)?;

    Ok(c)
}

#[test]
fn test_multiply_gives_exactly_2k() -> Result<()> {
    if !device_ready() {
        return Ok(());
    }

    let (m, k, n) = (64, 32, 48);
    let (a, b) = initialize_matrices(MatrixType::OnesAndTwos, m, k, n);

    let c = gpu_multiply(&a, &b, m, k, n)?;

    // Целочисленные суммы точны в f32: сравниваем без допусков
    let expected = k as f32 * 2.0;
    assert!(c.iter().all(|&value| value == expected));

    Ok(())
}

#[test]
fn test_random_matrices_at_odd_sizes_match_cpu() -> Result<()> {
    if !device_ready() {
        return Ok(());
    }

    // Размеры не кратны 16: сетка блоков округляется вверх,
    // лишние нити отсекает проверка границ в ядре
    let (m, k, n) = (33, 17, 29);
    let (a, b) = initialize_matrices(MatrixType::Random, m, k, n);

    let c = gpu_multiply(&a, &b, m, k, n)?;

    let mut cpu_result = vec![0.0f32; m * n];
    cpu_matrix_multiply(&a, &b, &mut cpu_result, m, k, n);

    assert!(compare_results(&c, &cpu_result, m, n));

    Ok(())
}

#[test]
fn test_multiply_rejects_mismatched_buffers() -> Result<()> {
    if !device_ready() {
        return Ok(());
    }

    let d_a = CudaBuffer::<f32>::new(4)?;
    let d_b = CudaBuffer::<f32>::new(4)?;
    let mut d_c = CudaBuffer::<f32>::new(4)?;

    // A должна быть 2 x 3, то есть 6 элементов
    assert!(cuda::matrix_multiply(&d_a, &d_b, &mut d_c, 2, 3, 2).is_err());

    Ok(())
}

#[test]
fn test_buffer_rejects_wrong_length() -> Result<()> {
    if !device_ready() {
        return Ok(());
    }

    let buffer = CudaBuffer::<f32>::new(8)?;
    let short = vec![0.0f32; 4];

    assert!(buffer.copy_from_host(&short).is_err());

    let mut output = vec![0.0f32; 16];
    assert!(buffer.copy_to_host(&mut output).is_err());

    Ok(())
}
