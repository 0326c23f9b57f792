//! OpenCL ядра для матричных операций

/// Исходный код ядра для матричного умножения
///
/// Один рабочий элемент на один элемент C; каждый элемент считается
/// независимой сверткой строки A со столбцом B.
pub static MATRIX_MULTIPLY_KERNEL: &str = r#"
__kernel void matrix_multiply(
    __global const float* a,
    __global const float* b,
    __global float* c,
    const int m,
    const int k,
    const int n
) {
    const int row = get_global_id(0);
    const int col = get_global_id(1);

    // Глобальный размер может быть округлен вверх до рабочей группы,
    // лишние элементы отсекаются
    if (row < m && col < n) {
        float sum = 0.0f;
        for (int i = 0; i < k; ++i) {
            sum += a[row * k + i] * b[i * n + col];
        }
        c[row * n + col] = sum;
    }
}
"#;

/// Исходный код проверочного ядра: поэлементное сравнение двух результатов
///
/// Счетчик расхождений инкрементируется атомарно, хост читает его обратно
/// одним числом.
pub static MATRIX_COMPARE_KERNEL: &str = r#"
__kernel void matrix_compare(
    __global const float* c1,
    __global const float* c2,
    __global int* mismatches,
    const int m,
    const int n
) {
    const int row = get_global_id(0);
    const int col = get_global_id(1);

    if (row < m && col < n) {
        const int idx = row * n + col;
        if (c1[idx] != c2[idx]) {
            atomic_inc(mismatches);
        }
    }
}
"#;
