pub mod storage;
pub mod types;

pub use storage::{get_state_path, load_user_state, save_user_state};
pub use types::UserState;
