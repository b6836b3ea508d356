//! UI descriptor tree — the `ui` section of the Faust JSON sidecar.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// Root of a parsed UI descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct UiDescriptor {
    pub name: String,
    pub ui: Vec<UiNode>,
}

/// Layout container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    VGroup,
    HGroup,
    TGroup,
}

/// Controls carrying a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuousKind {
    VSlider,
    HSlider,
    NEntry,
}

/// On/off controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscreteKind {
    Button,
    Checkbox,
}

/// One node of the UI tree.
#[derive(Debug, Clone, PartialEq)]
pub enum UiNode {
    Container {
        kind: GroupKind,
        label: String,
        items: Vec<UiNode>,
    },
    Continuous {
        kind: ContinuousKind,
        label: String,
        min: UiNumber,
        max: UiNumber,
        init: UiNumber,
        step: UiNumber,
    },
    Discrete {
        kind: DiscreteKind,
        label: String,
    },
    /// Bargraphs, soundfiles and anything else without an input declaration.
    Other { kind: String },
}

/// A numeric field, displayed exactly as decoded from the JSON.
///
/// Some Faust versions quote numbers (`"init": "0.5"`); numeric strings are
/// accepted and kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct UiNumber(String);

impl UiNumber {
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for UiNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<Value> for UiNumber {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => Ok(Self(n.to_string())),
            Value::String(s) if is_finite_number(&s) => Ok(Self(s.trim().to_string())),
            other => Err(format!("expected a number, found {other}")),
        }
    }
}

fn is_finite_number(text: &str) -> bool {
    text.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

#[derive(Deserialize)]
struct RawDescriptor {
    name: Option<String>,
    ui: Option<Vec<RawNode>>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    label: String,
    items: Option<Vec<RawNode>>,
    min: Option<Value>,
    max: Option<Value>,
    init: Option<Value>,
    step: Option<Value>,
}

impl UiDescriptor {
    /// Parse a Faust JSON sidecar. Fields other than `name` and `ui` are ignored.
    pub fn parse(json: &str) -> Result<Self, ParseError> {
        let raw: RawDescriptor = serde_json::from_str(json)?;
        let name = raw.name.ok_or(ParseError::MissingField("name"))?;
        let ui = raw
            .ui
            .ok_or(ParseError::MissingField("ui"))?
            .into_iter()
            .map(UiNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, ui })
    }

    /// All non-container nodes in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&UiNode> {
        let mut out = Vec::new();
        for node in &self.ui {
            node.collect_leaves(&mut out);
        }
        out
    }
}

impl UiNode {
    fn from_raw(raw: RawNode) -> Result<Self, ParseError> {
        let group = match raw.kind.as_str() {
            "vgroup" => Some(GroupKind::VGroup),
            "hgroup" => Some(GroupKind::HGroup),
            "tgroup" => Some(GroupKind::TGroup),
            _ => None,
        };
        if let Some(kind) = group {
            let items = raw.items.ok_or_else(|| {
                ParseError::InvalidNode(format!("{} '{}' has no items", raw.kind, raw.label))
            })?;
            return Ok(UiNode::Container {
                kind,
                label: raw.label,
                items: items
                    .into_iter()
                    .map(UiNode::from_raw)
                    .collect::<Result<_, _>>()?,
            });
        }

        let continuous = match raw.kind.as_str() {
            "vslider" => Some(ContinuousKind::VSlider),
            "hslider" => Some(ContinuousKind::HSlider),
            "nentry" => Some(ContinuousKind::NEntry),
            _ => None,
        };
        if let Some(kind) = continuous {
            let field = |value: Option<Value>, key: &str| {
                let value = value.ok_or_else(|| {
                    ParseError::InvalidNode(format!("'{}' is missing '{key}'", raw.label))
                })?;
                UiNumber::try_from(value).map_err(|e| {
                    ParseError::InvalidNode(format!("'{}' field '{key}': {e}", raw.label))
                })
            };
            let min = field(raw.min, "min")?;
            let max = field(raw.max, "max")?;
            let init = field(raw.init, "init")?;
            let step = field(raw.step, "step")?;
            return Ok(UiNode::Continuous {
                kind,
                label: raw.label,
                min,
                max,
                init,
                step,
            });
        }

        Ok(match raw.kind.as_str() {
            "button" => UiNode::Discrete {
                kind: DiscreteKind::Button,
                label: raw.label,
            },
            "checkbox" => UiNode::Discrete {
                kind: DiscreteKind::Checkbox,
                label: raw.label,
            },
            _ => UiNode::Other { kind: raw.kind },
        })
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a UiNode>) {
        match self {
            UiNode::Container { items, .. } => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }
}
