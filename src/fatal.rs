//! Single exit path for every unrecoverable condition.
//!
//! The benchmark has no recovery story: a failed open, a ring error, or a
//! verification mismatch invalidates the run, so every detected error funnels
//! into `die` and terminates the process.

use std::process;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FatalKind {
    RingSetup,
    FileOpen,
    Submit,
    Poll,
    Read,
    Verify,
    Worker,
}

impl FatalKind {
    fn as_str(self) -> &'static str {
        match self {
            FatalKind::RingSetup => "ring setup",
            FatalKind::FileOpen => "file open",
            FatalKind::Submit => "submission",
            FatalKind::Poll => "completion poll",
            FatalKind::Read => "read",
            FatalKind::Verify => "verification",
            FatalKind::Worker => "worker",
        }
    }
}

pub fn die(kind: FatalKind, context: &str) -> ! {
    eprintln!("ringbench: fatal {} error: {}", kind.as_str(), context);
    process::exit(1);
}
