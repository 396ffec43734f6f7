use std::fmt;

/// One child process: a program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a command prefix such as `docker compose` on whitespace and
    /// appends `args`.
    pub fn from_prefix<I, S>(prefix: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words = prefix.split_whitespace();
        let program = words.next().unwrap_or_default().to_string();
        let mut all: Vec<String> = words.map(str::to_string).collect();
        all.extend(args.into_iter().map(Into::into));
        Self { program, args: all }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Result of running a command handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionOutcome {
    pub succeeded: bool,
    pub streamed: bool,
}

impl ExecutionOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            streamed: false,
        }
    }

    pub fn failure() -> Self {
        Self {
            succeeded: false,
            streamed: false,
        }
    }

    /// Outcome of a sequence of streamed invocations
    pub fn streamed(succeeded: bool) -> Self {
        Self {
            succeeded,
            streamed: true,
        }
    }
}

/// Yes/no question whose answer decides whether `on_confirm` runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub question: String,
    pub on_confirm: Vec<Invocation>,
    pub done_message: String,
    pub cancelled_message: String,
}

/// A handler result: either already settled, or waiting on the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Immediate(ExecutionOutcome),
    Pending(PendingConfirmation),
}

impl From<ExecutionOutcome> for Completion {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self::Immediate(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_compose_prefix() {
        let inv = Invocation::from_prefix("docker compose", ["up", "-d"]);

        assert_eq!(inv.program, "docker");
        assert_eq!(inv.args, vec!["compose", "up", "-d"]);
    }

    #[test]
    fn single_word_prefix() {
        let inv = Invocation::from_prefix("podman-compose", ["ps"]);

        assert_eq!(inv.program, "podman-compose");
        assert_eq!(inv.args, vec!["ps"]);
    }

    #[test]
    fn display_quotes_args_with_spaces() {
        let inv = Invocation::new("docker", ["stats", "--format", "table {{.Container}}"]);

        assert_eq!(inv.to_string(), "docker stats --format \"table {{.Container}}\"");
    }
}
