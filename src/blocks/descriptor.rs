use std::collections::BTreeMap;

use serde::{ser::SerializeSeq, Serialize, Serializer};
use serde_json::{json, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::models::{
    channel::{InputChannel, OutputChannel},
    direction::{ButtonState, LightBarrierState, MotorDirection},
};

use super::lang::Localizer;

pub const EXTENSION_NAME: &str = "FischerTechnik ROBO-LT";
pub const EXTENSION_URL: &str = "http://www.fischertechnik.de/desktopdefault.aspx/tabid-21/39_read-311/usetemplate-2_column_pano/";

/// Every entry point the host can call by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    OnButtonChange,
    OnLightBarrierChange,
    GetButtonBinary,
    GetLightBarrierBinary,
    GetInputPercent,
    GetInputDelta,
    GetOutputPercent,
    GetOutputVal,
    SetOutputPercent,
    SetOutputVal,
    SetLampVal,
    SetMotorValDir,
    SetMotorDir,
    Reset,
}

impl Operation {
    /// Number of arguments the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Reset => 0,
            Operation::GetButtonBinary
            | Operation::GetLightBarrierBinary
            | Operation::GetInputPercent
            | Operation::GetInputDelta
            | Operation::GetOutputPercent
            | Operation::GetOutputVal => 1,
            Operation::OnButtonChange
            | Operation::OnLightBarrierChange
            | Operation::SetOutputPercent
            | Operation::SetOutputVal
            | Operation::SetLampVal
            | Operation::SetMotorDir => 2,
            Operation::SetMotorValDir => 3,
        }
    }
}

/// How the host draws a block and what it expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Event block the host polls; the operation answers true to fire it.
    Hat,
    Boolean,
    Reporter,
    Command,
}

impl BlockKind {
    pub fn code(&self) -> &'static str {
        match self {
            BlockKind::Hat => "h",
            BlockKind::Boolean => "b",
            BlockKind::Reporter => "r",
            BlockKind::Command => " ",
        }
    }
}

/// One palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub label: String,
    pub op: Operation,
    pub defaults: Vec<Value>,
}

/// Serialized the way the host registers blocks: `[kind, label, op, defaults...]`.
impl Serialize for BlockSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3 + self.defaults.len()))?;
        seq.serialize_element(self.kind.code())?;
        seq.serialize_element(&self.label)?;
        seq.serialize_element(self.op.as_ref())?;
        for default in &self.defaults {
            seq.serialize_element(default)?;
        }
        seq.end()
    }
}

/// Everything the host needs to register the extension.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionDescriptor {
    pub name: &'static str,
    pub url: &'static str,
    pub blocks: Vec<BlockSpec>,
    pub menus: BTreeMap<&'static str, Vec<Value>>,
}

fn menu<E: IntoEnumIterator + AsRef<str>>(lang: &dyn Localizer) -> Vec<Value> {
    E::iter()
        .map(|e| {
            let key: &str = e.as_ref();
            json!(lang.get(key))
        })
        .collect()
}

fn channels<E: IntoEnumIterator + AsRef<str>>() -> Vec<Value> {
    E::iter()
        .map(|e| {
            let name: &str = e.as_ref();
            json!(name)
        })
        .collect()
}

impl ExtensionDescriptor {
    pub fn build(lang: &dyn Localizer) -> Self {
        let block = |kind: BlockKind, key: &str, op: Operation, defaults: Vec<Value>| BlockSpec {
            kind,
            label: lang.get(key),
            op,
            defaults,
        };
        let pressed = json!(lang.get(ButtonState::Pressed.as_ref()));
        let opens = json!(lang.get(LightBarrierState::Opens.as_ref()));
        let forward = json!(lang.get(MotorDirection::Forward.as_ref()));

        let blocks = vec![
            // events
            block(BlockKind::Hat, "evtButton", Operation::OnButtonChange, vec![json!("I1"), pressed]),
            block(BlockKind::Hat, "evtLightBarrier", Operation::OnLightBarrierChange, vec![json!("I3"), opens]),
            // getters
            block(BlockKind::Boolean, "getButton", Operation::GetButtonBinary, vec![json!("I1")]),
            block(BlockKind::Boolean, "getLightBarrier", Operation::GetLightBarrierBinary, vec![json!("I3")]),
            block(BlockKind::Reporter, "getOutputValue", Operation::GetOutputVal, vec![json!("M1")]),
            // setters
            block(BlockKind::Command, "setLampVal", Operation::SetLampVal, vec![json!("M1"), json!(0)]),
            block(BlockKind::Command, "setMotorValDir", Operation::SetMotorValDir, vec![json!("M1"), json!(0), forward.clone()]),
            block(BlockKind::Command, "setMotorDir", Operation::SetMotorDir, vec![json!("M1"), forward]),
            block(BlockKind::Command, "setOutputVal", Operation::SetOutputVal, vec![json!("M1"), json!(0)]),
            block(BlockKind::Command, "reset", Operation::Reset, vec![]),
        ];

        let mut menus = BTreeMap::new();
        menus.insert("inputs", channels::<InputChannel>());
        menus.insert("outputs", channels::<OutputChannel>());
        menus.insert("buttonStates", menu::<ButtonState>(lang));
        menus.insert("lightBarrierStates", menu::<LightBarrierState>(lang));
        menus.insert("outputDirections", menu::<MotorDirection>(lang));
        menus.insert("outputValues", (0..=8).map(|v| json!(v)).collect());

        Self {
            name: EXTENSION_NAME,
            url: EXTENSION_URL,
            blocks,
            menus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::lang::Language;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::OnButtonChange.as_ref(), "onButtonChange");
        assert_eq!(Operation::SetMotorValDir.to_string(), "setMotorValDir");
        assert_eq!("getOutputVal".parse::<Operation>().unwrap(), Operation::GetOutputVal);
        assert!("doSomething".parse::<Operation>().is_err());
    }

    #[test]
    fn test_defaults_match_arity() {
        let descriptor = ExtensionDescriptor::build(&Language::En);
        assert_eq!(descriptor.blocks.len(), 10);
        for block in &descriptor.blocks {
            assert_eq!(block.defaults.len(), block.op.arity(), "{}", block.op);
        }
    }

    #[test]
    fn test_block_serializes_as_array() {
        let descriptor = ExtensionDescriptor::build(&Language::En);
        let value = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(value["name"], json!(EXTENSION_NAME));
        assert_eq!(
            value["blocks"][0],
            json!(["h", "when button %m.inputs is %m.buttonStates", "onButtonChange", "I1", "pressed"])
        );
        assert_eq!(value["blocks"][9], json!([" ", "reset all outputs", "reset"]));
    }

    #[test]
    fn test_menus() {
        let descriptor = ExtensionDescriptor::build(&Language::De);
        assert_eq!(descriptor.menus["inputs"], vec![json!("I1"), json!("I2"), json!("I3")]);
        assert_eq!(descriptor.menus["outputs"], vec![json!("M1"), json!("M2")]);
        assert_eq!(descriptor.menus["outputValues"].len(), 9);
        assert_eq!(
            descriptor.menus["outputDirections"],
            vec![json!("vorwärts"), json!("rückwärts")]
        );
        assert_eq!(descriptor.menus["buttonStates"][1], json!("losgelassen"));
        assert_eq!(descriptor.menus["lightBarrierStates"].len(), 2);
    }
}
