/// Advisory lock sharing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockKind {
    Shared,
    #[default]
    Exclusive,
}

/// Advisory lock request.
///
/// The default is an exclusive, blocking lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockMode {
    pub kind: LockKind,
    /// Fail immediately instead of waiting when another holder conflicts.
    pub non_blocking: bool,
}

impl LockMode {
    pub const SHARED: LockMode = LockMode { kind: LockKind::Shared, non_blocking: false };
    pub const EXCLUSIVE: LockMode = LockMode { kind: LockKind::Exclusive, non_blocking: false };

    pub fn non_blocking(self) -> Self {
        Self { non_blocking: true, ..self }
    }

    /// The `flock(2)` operation for this request.
    #[cfg(unix)]
    pub fn flock_operation(self) -> libc::c_int {
        let base = match self.kind {
            LockKind::Shared => libc::LOCK_SH,
            LockKind::Exclusive => libc::LOCK_EX,
        };
        if self.non_blocking { base | libc::LOCK_NB } else { base }
    }
}
