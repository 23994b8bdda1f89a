pub mod files;
pub mod snapshot;
pub mod storage;

pub use files::{
    atomic_write, ensure_dir, get_data_dir, init_local_data_dir, log_file, read_file, state_file,
    STORAGE_KEY,
};
pub use snapshot::{load_state, save_state};
pub use storage::{FileStorage, MemoryStorage, StateStorage};
