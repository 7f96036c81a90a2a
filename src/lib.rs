// 全局内存分配器：使用 jemalloc
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

// 将所有模块声明为公共的，这样二进制文件、测试和基准测试都能访问它们
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
