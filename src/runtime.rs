// The collaborators one player command runs against

use crate::config::TraceConfig;
use crate::error::RuntimeFailure;
use crate::interpret::{Context, Environment, Interpreter};
use crate::output::{MessageParameter, Output};
use crate::story::{CodeAddr, InstanceId, Story};
use crate::world::World;

pub struct Runtime<'r> {
    pub story: &'r Story,
    pub world: &'r mut dyn World,
    pub interpreter: &'r mut dyn Interpreter,
    pub output: &'r mut dyn Output,
    pub trace: TraceConfig,
}

impl<'r> Runtime<'r> {
    pub fn new(
        story: &'r Story,
        world: &'r mut dyn World,
        interpreter: &'r mut dyn Interpreter,
        output: &'r mut dyn Output,
    ) -> Self {
        Runtime {
            story,
            world,
            interpreter,
            output,
            trace: TraceConfig::default(),
        }
    }

    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }

    pub fn evaluate(&mut self, expression: CodeAddr, context: &Context) -> Result<bool, RuntimeFailure> {
        let mut env = Environment {
            world: &mut *self.world,
            output: &mut *self.output,
            context,
        };
        self.interpreter.evaluate(expression, &mut env)
    }

    pub fn execute(&mut self, statements: CodeAddr, context: &Context) -> Result<(), RuntimeFailure> {
        let mut env = Environment {
            world: &mut *self.world,
            output: &mut *self.output,
            context,
        };
        self.interpreter.execute(statements, &mut env)
    }

    /// How an instance is shown in a message: literals by value, others by name
    pub fn message_parameter(&self, instance: InstanceId) -> MessageParameter {
        match self.world.literal(instance) {
            Some(literal) => MessageParameter::Literal(literal.clone()),
            None => MessageParameter::Instance(instance),
        }
    }
}
