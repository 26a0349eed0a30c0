pub mod command_executor;

#[cfg(test)]
pub(crate) mod testing;

pub use command_executor::{
    CommandRunner,
    CommitCounter,
    ExecOptions,
    ExecOutput,
    ExecTask,
    Executor,
    StdioMode,
    SystemCommandRunner,
    Verbosity,
};
