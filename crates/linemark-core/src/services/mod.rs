pub use code_view::{CodeLines, CodeRow, CodeViewOptions, SlowPageAlert};
pub use relative_diff::{NavigationOutcome, RelativeDiffRequest, RelativeDiffResult, relative_diff};
pub use relative_path::{OrderedPathFinder, RelativePathFinder};
pub use versions::{CurrentVersion, Error, GoToRelativeDiff, LoadState, Result, VersionsState};

pub mod anchor;
pub mod code_view;
pub mod entry_status;
pub mod relative_diff;
pub mod relative_path;
pub mod versions;
