use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// 设置信号数据库的数据根目录，`signals.db` 落在该目录下。
/// 进程生命周期内仅首次调用生效，后续调用被忽略。
pub fn set_data_root(path: PathBuf) {
    let _ = DATA_ROOT.set(path);
}

/// 读取数据根目录，未显式设置时使用默认的 "data"。
pub(crate) fn data_root() -> PathBuf {
    DATA_ROOT
        .get()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("data"))
}
