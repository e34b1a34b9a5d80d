/// Severity of a user facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// One line of feedback for the user, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

macro_rules! notice_fn {
    ($(($name:ident, $level:expr)),* $(,)?) => {
        $(pub fn $name(message: impl ToString) -> Self {
            Self { level: $level, message: message.to_string() }
        })*
    };
}

impl Notice {
    notice_fn!(
        (info, Level::Info),
        (success, Level::Success),
        (warn, Level::Warn),
        (error, Level::Error),
    );
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
