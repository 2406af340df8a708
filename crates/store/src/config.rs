use std::path::PathBuf;
use std::sync::OnceLock;

static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();

/// # Summary
/// 注入数据库文件的根目录，进程生命周期内仅首次调用生效。
///
/// # Logic
/// 1. 将路径写入全局 `OnceLock`。
/// 2. 已设置过时本次调用被忽略，根目录一经注入不可变更。
///
/// # Arguments
/// * `path`: 数据根目录，三个数据库文件都在其下创建。
pub fn set_root_dir(path: PathBuf) {
    let _ = ROOT_DIR.set(path);
}

/// # Summary
/// 读取数据根目录，未注入时回退到相对路径 `data`。
pub(crate) fn get_root_dir() -> PathBuf {
    ROOT_DIR
        .get()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("data"))
}
