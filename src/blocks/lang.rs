use std::str::FromStr;

use strum::{Display, EnumString};

/// Looks up user-facing text by key. Unknown keys come back unchanged.
pub trait Localizer: Send + Sync {
    fn get(&self, key: &str) -> String;
}

/// Built-in label tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    /// Pick a table from a locale tag such as `de_DE.UTF-8`, falling back to English.
    pub fn from_locale(locale: &str) -> Self {
        let prefix = locale.get(..2).unwrap_or_default().to_ascii_lowercase();
        Language::from_str(&prefix).unwrap_or_default()
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::En => EN,
            Language::De => DE,
        }
    }
}

impl Localizer for Language {
    fn get(&self, key: &str) -> String {
        self.table()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| (*text).to_owned())
            .unwrap_or_else(|| key.to_owned())
    }
}

const EN: &[(&str, &str)] = &[
    ("evtButton", "when button %m.inputs is %m.buttonStates"),
    ("evtLightBarrier", "when light barrier %m.inputs %m.lightBarrierStates"),
    ("getButton", "button %m.inputs closed"),
    ("getLightBarrier", "light barrier %m.inputs lit"),
    ("getOutputValue", "value of output %m.outputs"),
    ("setLampVal", "set lamp %m.outputs to %d.outputValues"),
    ("setMotorValDir", "set motor %m.outputs to %d.outputValues %m.outputDirections"),
    ("setMotorDir", "set motor %m.outputs direction %m.outputDirections"),
    ("setOutputVal", "set output %m.outputs to %d.outputValues"),
    ("reset", "reset all outputs"),
    ("pressed", "pressed"),
    ("released", "released"),
    ("opens", "opens"),
    ("closes", "closes"),
    ("forward", "forward"),
    ("backwards", "backwards"),
];

const DE: &[(&str, &str)] = &[
    ("evtButton", "Wenn Taster %m.inputs %m.buttonStates"),
    ("evtLightBarrier", "Wenn Lichtschranke %m.inputs %m.lightBarrierStates"),
    ("getButton", "Taster %m.inputs gedrückt"),
    ("getLightBarrier", "Lichtschranke %m.inputs beleuchtet"),
    ("getOutputValue", "Wert von Ausgang %m.outputs"),
    ("setLampVal", "Setze Lampe %m.outputs auf %d.outputValues"),
    ("setMotorValDir", "Setze Motor %m.outputs auf %d.outputValues %m.outputDirections"),
    ("setMotorDir", "Setze Motor %m.outputs Richtung %m.outputDirections"),
    ("setOutputVal", "Setze Ausgang %m.outputs auf %d.outputValues"),
    ("reset", "Alle Ausgänge zurücksetzen"),
    ("pressed", "gedrückt"),
    ("released", "losgelassen"),
    ("opens", "unterbrochen"),
    ("closes", "geschlossen"),
    ("forward", "vorwärts"),
    ("backwards", "rückwärts"),
];
