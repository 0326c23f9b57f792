use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=cuda/matrix_multiply_kernel.cu");

    // Ядро CUDA собирается только при включенной фиче `cuda`,
    // чтобы библиотека и тесты собирались на машинах без nvcc.
    if env::var_os("CARGO_FEATURE_CUDA").is_none() {
        return;
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = PathBuf::from(&out_dir);

    // Компилируем matrix_multiply_kernel.cu в объектный файл
    let obj_file = out_path.join("matrix_multiply_kernel.o");
    let status = Command::new("nvcc")
        .args([
            "-c",
            "cuda/matrix_multiply_kernel.cu",
            "-o",
            obj_file.to_str().unwrap(),
            "-Xcompiler",
            "-fPIC",
        ])
        .status()
        .expect("Failed to run nvcc. Make sure CUDA is installed and nvcc is in PATH");

    if !status.success() {
        panic!("nvcc compilation failed");
    }

    // Собираем объектный файл в статическую библиотеку
    let lib_file = out_path.join("libmatrix_mul_cuda.a");
    let status = Command::new("ar")
        .args(["rcs", lib_file.to_str().unwrap(), obj_file.to_str().unwrap()])
        .status()
        .expect("Failed to run ar");

    if !status.success() {
        panic!("ar archiving failed");
    }

    // Указываем Cargo, где искать библиотеку и что линковать
    println!("cargo:rustc-link-search=native={}", out_dir);
    println!("cargo:rustc-link-lib=static=matrix_mul_cuda");

    // Рантайм CUDA линкуется динамически
    println!("cargo:rustc-link-lib=cudart");
    println!("cargo:rustc-link-search=native=/usr/local/cuda/lib64");
}
