//! Workflow orchestration called by the CLI shell

pub mod release;

pub use release::{
    create_branch_of_kind, finalize_release, prepare_release, rollback_to, start_hotfix,
    FinalizedRelease, HotfixStarted, PreparedRelease,
};
