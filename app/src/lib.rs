pub mod browse;
pub mod download;
pub mod error;
pub mod profiles;
pub mod session;

/// 公共API的prelude模块
/// 用户可以通过 `use app::prelude::*` 来导入最常用的类型
pub mod prelude {
    pub use crate::browse::{browse, BrowseOutcome, BrowseParams};
    pub use crate::download::{download, DownloadedObject};
    pub use crate::error::{AppError, Result};
    pub use crate::profiles::load_profiles;
    pub use crate::session::{close_after, connect, resolve_descriptor, ConnectionArgs};
}
