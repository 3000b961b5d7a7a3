use std::{str::FromStr, sync::Arc};

use derive_more::Display;
use serde_json::Value;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    internals::translator::ValueTranslator,
    models::{
        channel::{InputChannel, OutputChannel},
        direction::{ButtonState, LightBarrierState, MotorDirection},
    },
};

use super::{descriptor::Operation, lang::Localizer};

/// What a block call hands back to the host.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum BlockValue {
    #[display(fmt = "{}", _0)]
    Bool(bool),
    #[display(fmt = "{}", _0)]
    Number(f64),
    #[display(fmt = "{}", _0)]
    Integer(i32),
    /// Command blocks have no result.
    #[display(fmt = "")]
    Done,
}

#[derive(Error, Debug, PartialEq)]
pub enum BlockError {
    #[error("Unknown operation '{0}'.")]
    UnknownOperation(String),

    #[error("'{op}' takes {expected} argument(s), got {got}.")]
    Arity {
        op: Operation,
        expected: usize,
        got: usize,
    },

    #[error("Invalid argument {position} for '{op}': {value}")]
    InvalidArgument {
        op: Operation,
        position: usize,
        value: String,
    },
}

/// Resolves host calls by operation name and runs them on the translator.
/// Arguments are validated before anything is sent to the device.
pub struct BlockHost {
    translator: ValueTranslator,
    lang: Arc<dyn Localizer>,
}

/// Positional argument access for one call.
struct Args<'a> {
    op: Operation,
    values: &'a [Value],
    lang: &'a dyn Localizer,
}

impl<'a> Args<'a> {
    fn invalid(&self, position: usize) -> BlockError {
        BlockError::InvalidArgument {
            op: self.op,
            position,
            value: self.values[position].to_string(),
        }
    }

    fn text(&self, position: usize) -> Option<&'a str> {
        self.values[position].as_str().map(str::trim)
    }

    fn channel<C: FromStr>(&self, position: usize) -> Result<C, BlockError> {
        self.text(position)
            .and_then(|token| C::from_str(token).ok())
            .ok_or_else(|| self.invalid(position))
    }

    /// Accepts the canonical token as well as its localized menu text.
    fn token<E>(&self, position: usize) -> Result<E, BlockError>
    where
        E: IntoEnumIterator + AsRef<str>,
    {
        let token = self.text(position).ok_or_else(|| self.invalid(position))?;
        E::iter()
            .find(|e| {
                let canonical: &str = e.as_ref();
                token == canonical || token == self.lang.get(canonical)
            })
            .ok_or_else(|| self.invalid(position))
    }

    fn number(&self, position: usize) -> Result<f64, BlockError> {
        let number = match &self.values[position] {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.invalid(position))
    }
}

impl BlockHost {
    pub fn new(translator: ValueTranslator, lang: Arc<dyn Localizer>) -> Self {
        Self { translator, lang }
    }

    pub fn translator(&self) -> &ValueTranslator {
        &self.translator
    }

    /// Run the operation called `name` with `args`.
    #[instrument(skip(self))]
    pub fn call(&self, name: &str, args: &[Value]) -> Result<BlockValue, BlockError> {
        let op = Operation::from_str(name)
            .map_err(|_| BlockError::UnknownOperation(name.to_owned()))?;
        if args.len() != op.arity() {
            return Err(BlockError::Arity {
                op,
                expected: op.arity(),
                got: args.len(),
            });
        }

        let a = Args {
            op,
            values: args,
            lang: &*self.lang,
        };
        let t = &self.translator;

        let value = match op {
            Operation::OnButtonChange => {
                let channel: InputChannel = a.channel(0)?;
                BlockValue::Bool(t.on_button_edge(channel, a.token::<ButtonState>(1)?))
            }
            Operation::OnLightBarrierChange => {
                let channel: InputChannel = a.channel(0)?;
                BlockValue::Bool(t.on_light_barrier_edge(channel, a.token::<LightBarrierState>(1)?))
            }
            Operation::GetButtonBinary => BlockValue::Bool(t.button_binary(a.channel(0)?)),
            Operation::GetLightBarrierBinary => {
                BlockValue::Bool(t.light_barrier_binary(a.channel(0)?))
            }
            Operation::GetInputPercent => BlockValue::Number(t.input_percent(a.channel(0)?)),
            // The host's "no reading" sentinel is `false`.
            Operation::GetInputDelta => match t.input_delta(a.channel(0)?) {
                Some(delta) => BlockValue::Number(delta),
                None => BlockValue::Bool(false),
            },
            Operation::GetOutputPercent => BlockValue::Number(t.output_percent(a.channel(0)?)),
            Operation::GetOutputVal => BlockValue::Integer(t.output_value(a.channel(0)?)),
            Operation::SetOutputPercent => {
                let channel: OutputChannel = a.channel(0)?;
                t.set_output_percent(channel, a.number(1)?);
                BlockValue::Done
            }
            Operation::SetOutputVal => {
                let channel: OutputChannel = a.channel(0)?;
                t.set_output_value(channel, a.number(1)?);
                BlockValue::Done
            }
            Operation::SetLampVal => {
                let channel: OutputChannel = a.channel(0)?;
                t.set_lamp_value(channel, a.number(1)?);
                BlockValue::Done
            }
            Operation::SetMotorValDir => {
                let channel: OutputChannel = a.channel(0)?;
                let speed = a.number(1)?;
                let direction = a.token::<MotorDirection>(2)?;
                t.set_motor_value_direction(channel, speed, direction);
                BlockValue::Done
            }
            Operation::SetMotorDir => {
                let channel: OutputChannel = a.channel(0)?;
                t.set_motor_direction(channel, a.token::<MotorDirection>(1)?);
                BlockValue::Done
            }
            Operation::Reset => {
                t.reset();
                BlockValue::Done
            }
        };
        debug!("{} -> {:?}", op, value);
        Ok(value)
    }
}
