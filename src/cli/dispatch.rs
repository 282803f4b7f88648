//! Module registry and command chaining.
//!
//! A command line is one or more module invocations separated by `--then`.
//! Every invocation is resolved and arity-checked before the first one runs;
//! they then run in order and the first non-zero exit code ends the chain.

use thiserror::Error;

/// Token separating chained module invocations.
pub const THEN: &str = "--then";

/// One tool reachable from the command line.
pub trait Module {
    /// Canonical name used to select the module.
    fn name(&self) -> &'static str;

    /// Additional names that select the module.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-paragraph description of what the module does and its arguments.
    fn usage(&self) -> &'static str;

    /// Returns false if `args` cannot be a valid invocation.
    fn check_args(&self, args: &[String]) -> bool;

    /// Runs the module and returns its exit code, 0 on success.
    fn run(&mut self, args: &[String]) -> i32;
}

/// Why a command line could not be turned into invocations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no command given")]
    Empty,

    #[error("command line argument no. {position}, which is '{token}', does not name a module")]
    UnknownModule { position: usize, token: String },

    #[error("invalid arguments for '{module}': {}", args.join(" "))]
    BadArguments { module: &'static str, args: Vec<String> },
}

/// A resolved module invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    module: usize,
    pub args: Vec<String>,
}

#[derive(Default)]
pub struct Dispatcher {
    modules: Vec<Box<dyn Module>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<M: Module + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    fn find(&self, token: &str) -> Option<usize> {
        self.modules
            .iter()
            .position(|m| m.name() == token || m.aliases().contains(&token))
    }

    /// Splits `argv` on `--then`, resolves each module, and checks arity.
    pub fn plan(&self, argv: &[String]) -> Result<Vec<Invocation>, DispatchError> {
        if argv.is_empty() {
            return Err(DispatchError::Empty);
        }
        let mut plan = Vec::new();
        let mut i = 0;
        while i < argv.len() {
            let token = &argv[i];
            let module = self.find(token).ok_or_else(|| DispatchError::UnknownModule {
                position: i + 1,
                token: token.clone(),
            })?;
            // A module's first argument is never taken as a separator.
            let first = i + 1;
            let last = (first + 1..argv.len())
                .find(|&j| argv[j] == THEN)
                .unwrap_or(argv.len());
            let args = argv[first..last].to_vec();
            if !self.modules[module].check_args(&args) {
                return Err(DispatchError::BadArguments {
                    module: self.modules[module].name(),
                    args,
                });
            }
            plan.push(Invocation { module, args });
            i = last + 1;
        }
        Ok(plan)
    }

    /// Runs `plan` in order, stopping at the first non-zero exit code.
    pub fn execute(&mut self, plan: &[Invocation]) -> i32 {
        for invocation in plan {
            let module = &mut self.modules[invocation.module];
            tracing::debug!(module = module.name(), args = ?invocation.args, "running module");
            let code = module.run(&invocation.args);
            if code != 0 {
                tracing::debug!(module = module.name(), code, "module failed");
                return code;
            }
        }
        0
    }

    /// Plans and runs `argv`. Command-line problems print the usage text to
    /// stderr and yield exit code 1.
    pub fn dispatch(&mut self, argv: &[String]) -> i32 {
        match self.plan(argv) {
            Ok(plan) => self.execute(&plan),
            Err(e) => {
                if e != DispatchError::Empty {
                    eprintln!("Error: {e}");
                }
                eprint!("{}", self.usage());
                1
            }
        }
    }

    pub fn usage(&self) -> String {
        let mut text = format!(
            "Usage: jvmch [OPTIONS] <command> [command-arguments] \
             ['{THEN}' <command> [command-arguments]]*\n    where <command> is one of:\n"
        );
        for module in &self.modules {
            let mut names = module.name().to_string();
            for alias in module.aliases() {
                names.push_str(", ");
                names.push_str(alias);
            }
            text.push_str(&format!("        {names}: {}\n", module.usage()));
        }
        text
    }
}
