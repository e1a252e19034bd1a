pub mod compare;
pub mod driver;
pub mod equiv;
pub mod intra;
pub mod lcs;
pub mod loader;
pub mod render;
pub mod report;
pub mod runes;
pub mod shift;
pub mod walk;

pub use compare::LineCmp;
pub use driver::diff_file_pair;
pub use loader::FileData;
pub use render::{FileInfoLine, MessageReport, PairRenderer};
pub use walk::{walk_dirs, DirEvent, Side};
