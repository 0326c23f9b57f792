//! Типы матриц и связанные структуры

/// Схема заполнения входных матриц
///
/// Демонстрационные программы используют `OnesAndTwos`: при A = 1.0 и
/// B = 2.0 каждый элемент произведения равен ровно K * 2.0, что удобно
/// проверять без допусков.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixType {
    /// Матрицы заполненные 1 и 2
    OnesAndTwos,
    /// Матрицы заполненные 3 и 4
    ThreesAndFours,
    /// Случайно заполненные матрицы
    Random,
}
