//! Kind registry: one table entry per component kind.
//!
//! Adding a field kind means adding a `KindSpec` here; the structural
//! engine never branches on individual kinds, only on `allows_children`.

use crate::model::{NodeKind, Properties};
use serde_json::Value;

/// Value type accepted by a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropType {
    Text,
    Bool,
    Number,
    /// List of option labels (selects, radio groups).
    Options,
    /// Conditional-visibility expression source, evaluated elsewhere.
    Expression,
}

impl PropType {
    /// Whether `value` is acceptable for this type. `null` is always
    /// accepted so a property can be cleared without removing the key.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (PropType::Text | PropType::Expression, Value::String(_)) => true,
            (PropType::Bool, Value::Bool(_)) => true,
            (PropType::Number, Value::Number(_)) => true,
            (PropType::Options, Value::Array(items)) => items.iter().all(Value::is_string),
            _ => false,
        }
    }
}

/// Default value of a property, in `const`-friendly form.
#[derive(Debug, Clone, Copy)]
pub enum PropDefault {
    Null,
    Text(&'static str),
    Bool(bool),
    Number(f64),
    Options(&'static [&'static str]),
}

impl PropDefault {
    pub fn to_value(self) -> Value {
        match self {
            PropDefault::Null => Value::Null,
            PropDefault::Text(s) => Value::String(s.to_string()),
            PropDefault::Bool(b) => Value::Bool(b),
            PropDefault::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropDefault::Options(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PropSpec {
    pub key: &'static str,
    pub ty: PropType,
    pub default: PropDefault,
}

const fn prop(key: &'static str, ty: PropType, default: PropDefault) -> PropSpec {
    PropSpec { key, ty, default }
}

#[derive(Debug)]
pub struct KindSpec {
    pub kind: NodeKind,
    /// Wire name, matches the serde representation.
    pub name: &'static str,
    /// Palette label.
    pub label: &'static str,
    /// Prefix for generated IDs.
    pub id_prefix: &'static str,
    pub allows_children: bool,
    pub properties: &'static [PropSpec],
}

impl KindSpec {
    /// A complete property map populated with every default.
    pub fn default_properties(&self) -> Properties {
        self.properties
            .iter()
            .map(|p| (p.key.to_string(), p.default.to_value()))
            .collect()
    }

    pub fn property(&self, key: &str) -> Option<&PropSpec> {
        self.properties.iter().find(|p| p.key == key)
    }
}

// ─── Shared property groups ───────────────────────────────────────────────

const VISIBLE_WHEN: PropSpec = prop("visible_when", PropType::Expression, PropDefault::Null);

const FIELD_PROPS: &[PropSpec] = &[
    prop("label", PropType::Text, PropDefault::Text("Field")),
    prop("name", PropType::Text, PropDefault::Text("")),
    prop("placeholder", PropType::Text, PropDefault::Text("")),
    prop("help_text", PropType::Text, PropDefault::Text("")),
    prop("required", PropType::Bool, PropDefault::Bool(false)),
    prop("disabled", PropType::Bool, PropDefault::Bool(false)),
    VISIBLE_WHEN,
];

const TEXT_AREA_PROPS: &[PropSpec] = &[
    prop("label", PropType::Text, PropDefault::Text("Message")),
    prop("name", PropType::Text, PropDefault::Text("")),
    prop("placeholder", PropType::Text, PropDefault::Text("")),
    prop("rows", PropType::Number, PropDefault::Number(4.0)),
    prop("required", PropType::Bool, PropDefault::Bool(false)),
    VISIBLE_WHEN,
];

const NUMBER_PROPS: &[PropSpec] = &[
    prop("label", PropType::Text, PropDefault::Text("Number")),
    prop("name", PropType::Text, PropDefault::Text("")),
    prop("min", PropType::Number, PropDefault::Null),
    prop("max", PropType::Number, PropDefault::Null),
    prop("step", PropType::Number, PropDefault::Number(1.0)),
    prop("required", PropType::Bool, PropDefault::Bool(false)),
    VISIBLE_WHEN,
];

const CHOICE_PROPS: &[PropSpec] = &[
    prop("label", PropType::Text, PropDefault::Text("Choose one")),
    prop("name", PropType::Text, PropDefault::Text("")),
    prop(
        "options",
        PropType::Options,
        PropDefault::Options(&["Option 1", "Option 2"]),
    ),
    prop("required", PropType::Bool, PropDefault::Bool(false)),
    VISIBLE_WHEN,
];

const TOGGLE_PROPS: &[PropSpec] = &[
    prop("label", PropType::Text, PropDefault::Text("Toggle")),
    prop("name", PropType::Text, PropDefault::Text("")),
    prop("default_checked", PropType::Bool, PropDefault::Bool(false)),
    VISIBLE_WHEN,
];

const REGISTRY: &[KindSpec] = &[
    KindSpec {
        kind: NodeKind::Container,
        name: "container",
        label: "Container",
        id_prefix: "container",
        allows_children: true,
        properties: &[
            prop("title", PropType::Text, PropDefault::Text("")),
            prop("direction", PropType::Text, PropDefault::Text("column")),
            prop("gap", PropType::Number, PropDefault::Number(8.0)),
            VISIBLE_WHEN,
        ],
    },
    KindSpec {
        kind: NodeKind::TextInput,
        name: "text_input",
        label: "Text input",
        id_prefix: "text_input",
        allows_children: false,
        properties: FIELD_PROPS,
    },
    KindSpec {
        kind: NodeKind::TextArea,
        name: "text_area",
        label: "Text area",
        id_prefix: "text_area",
        allows_children: false,
        properties: TEXT_AREA_PROPS,
    },
    KindSpec {
        kind: NodeKind::NumberInput,
        name: "number_input",
        label: "Number",
        id_prefix: "number_input",
        allows_children: false,
        properties: NUMBER_PROPS,
    },
    KindSpec {
        kind: NodeKind::EmailInput,
        name: "email_input",
        label: "Email",
        id_prefix: "email_input",
        allows_children: false,
        properties: FIELD_PROPS,
    },
    KindSpec {
        kind: NodeKind::PasswordInput,
        name: "password_input",
        label: "Password",
        id_prefix: "password_input",
        allows_children: false,
        properties: FIELD_PROPS,
    },
    KindSpec {
        kind: NodeKind::Checkbox,
        name: "checkbox",
        label: "Checkbox",
        id_prefix: "checkbox",
        allows_children: false,
        properties: TOGGLE_PROPS,
    },
    KindSpec {
        kind: NodeKind::RadioGroup,
        name: "radio_group",
        label: "Radio group",
        id_prefix: "radio_group",
        allows_children: false,
        properties: CHOICE_PROPS,
    },
    KindSpec {
        kind: NodeKind::Select,
        name: "select",
        label: "Select",
        id_prefix: "select",
        allows_children: false,
        properties: CHOICE_PROPS,
    },
    KindSpec {
        kind: NodeKind::Switch,
        name: "switch",
        label: "Switch",
        id_prefix: "switch",
        allows_children: false,
        properties: TOGGLE_PROPS,
    },
    KindSpec {
        kind: NodeKind::DateInput,
        name: "date_input",
        label: "Date",
        id_prefix: "date_input",
        allows_children: false,
        properties: FIELD_PROPS,
    },
    KindSpec {
        kind: NodeKind::Button,
        name: "button",
        label: "Button",
        id_prefix: "button",
        allows_children: false,
        properties: &[
            prop("text", PropType::Text, PropDefault::Text("Submit")),
            prop("action", PropType::Text, PropDefault::Text("submit")),
            prop("disabled", PropType::Bool, PropDefault::Bool(false)),
            VISIBLE_WHEN,
        ],
    },
    KindSpec {
        kind: NodeKind::Heading,
        name: "heading",
        label: "Heading",
        id_prefix: "heading",
        allows_children: false,
        properties: &[
            prop("text", PropType::Text, PropDefault::Text("Heading")),
            prop("level", PropType::Number, PropDefault::Number(2.0)),
            VISIBLE_WHEN,
        ],
    },
    KindSpec {
        kind: NodeKind::Paragraph,
        name: "paragraph",
        label: "Paragraph",
        id_prefix: "paragraph",
        allows_children: false,
        properties: &[
            prop("text", PropType::Text, PropDefault::Text("")),
            VISIBLE_WHEN,
        ],
    },
    KindSpec {
        kind: NodeKind::Divider,
        name: "divider",
        label: "Divider",
        id_prefix: "divider",
        allows_children: false,
        properties: &[VISIBLE_WHEN],
    },
];

/// Look up the registry entry for a kind.
pub fn spec(kind: NodeKind) -> &'static KindSpec {
    // REGISTRY follows `NodeKind` declaration order.
    &REGISTRY[kind as usize]
}
