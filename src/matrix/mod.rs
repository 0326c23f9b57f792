//! Модуль для работы с матрицами
//!
//! Предоставляет:
//! - Схемы заполнения входных матриц
//! - Эталонные операции на CPU и сравнение результатов
//! - Исходные коды OpenCL ядер

mod types;
pub mod kernels;
pub mod operations;

pub use kernels::{MATRIX_COMPARE_KERNEL, MATRIX_MULTIPLY_KERNEL};
pub use operations::{compare_results, cpu_matrix_multiply, initialize_matrices, print_corner};
pub use types::MatrixType;
