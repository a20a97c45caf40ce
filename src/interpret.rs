// Statement executor interface
// CHECK expressions and ACTION/restriction bodies are bytecode run by an
// executor outside the command pipeline; this is the seam it plugs into.

use crate::error::RuntimeFailure;
use crate::output::Output;
use crate::story::{CodeAddr, InstanceId, WordCode};
use crate::world::World;
use log::info;

/// What the executing body can see of the current command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub verb: WordCode,
    /// One instance per parameter, 0 in a multiple slot between targets
    pub parameters: Vec<InstanceId>,
    /// The instance whose scope the body was found in, 0 for global
    pub instance: InstanceId,
}

/// Everything a body may touch while it runs
pub struct Environment<'e> {
    pub world: &'e mut dyn World,
    pub output: &'e mut dyn Output,
    pub context: &'e Context,
}

pub trait Interpreter {
    /// Evaluate a CHECK expression
    fn evaluate(&mut self, expression: CodeAddr, env: &mut Environment<'_>) -> Result<bool, RuntimeFailure>;

    /// Run a statement body
    fn execute(&mut self, statements: CodeAddr, env: &mut Environment<'_>) -> Result<(), RuntimeFailure>;
}

/// Lets every check pass and only logs the bodies it is asked to run.
/// Used by the `arun` harness to show which verb bodies a command reaches.
#[derive(Debug, Default)]
pub struct TracingInterpreter {
    pub executed: Vec<CodeAddr>,
}

impl Interpreter for TracingInterpreter {
    fn evaluate(&mut self, expression: CodeAddr, env: &mut Environment<'_>) -> Result<bool, RuntimeFailure> {
        info!(
            "evaluate {:#06x} (verb {}, parameters {:?})",
            expression, env.context.verb, env.context.parameters
        );
        Ok(true)
    }

    fn execute(&mut self, statements: CodeAddr, env: &mut Environment<'_>) -> Result<(), RuntimeFailure> {
        info!(
            "execute {:#06x} (verb {}, parameters {:?}, instance {})",
            statements, env.context.verb, env.context.parameters, env.context.instance
        );
        self.executed.push(statements);
        env.output.print(&format!("[{:#06x}]", statements));
        Ok(())
    }
}
