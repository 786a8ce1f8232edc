pub mod aggregate;
pub mod batch;
pub mod exec;
pub mod grid;
pub mod offset;
pub mod rank;
pub mod render;

pub use aggregate::{aggregate_commits, extension_of, CommitHistogram, FileTypeHistogram};
pub use batch::{process_repositories, BatchOptions, BatchOutcome, CommitSource, FailurePolicy};
pub use exec::{exec, run_stats, StatsOptions};
pub use grid::{CalendarGrid, WeekColumn};
pub use offset::{alignment_offset_for, Calendar};
pub use rank::{rank_file_types, top_file_types};
pub use render::{CellTier, HeatmapRenderer, Palette};
