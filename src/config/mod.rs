mod framework;
pub mod merge;
pub mod reader;
pub mod selector;
mod types;

pub use framework::TestFramework;
pub use merge::{merge, MergeInputs};
pub use reader::{launch_json_path, read_all};
pub use selector::select_first;
pub use types::{
    DebugOption, ExclusionRule, Platform, RawConfigEntry, ResolvedDebugConfiguration,
    DEBUGGER_TYPE,
};
