//! Field table for the localized text of the profile document.
//!
//! Each editable leaf is reached through a [`Target`] of one of [`SECTIONS`]. [`plan`] walks a
//! section against the current document and yields the headings and prompts the editor shows,
//! [`assign_text`] writes an answer back, creating missing objects along the way.

use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Zh,
    En,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Zh, Locale::En, Locale::Ja];

    /// Key inside a `{zh, en, ja}` mapping.
    pub fn key(self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    /// Suffix appended to a field name; English has none.
    pub fn suffix(self) -> &'static str {
        match self {
            Locale::Zh => "Zh",
            Locale::En => "",
            Locale::Ja => "Ja",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Locale::Zh => "中文",
            Locale::En => "英文",
            Locale::Ja => "日文",
        }
    }
}

#[derive(Debug)]
pub enum Target {
    /// `field`, `fieldZh`, `fieldJa` on the object at `path`.
    Suffixed {
        path: &'static [&'static str],
        fields: &'static [(&'static str, &'static str)],
    },
    /// Same keys on every element of the array at `path`, headed by the element's `id`.
    SuffixedEach {
        path: &'static [&'static str],
        fields: &'static [(&'static str, &'static str)],
    },
    /// Locale mappings at `path/<key>` (no fields) or `path/<key>/<field>`.
    Mapped {
        path: &'static [&'static str],
        heading: Option<&'static str>,
        keys: &'static [&'static str],
        fields: &'static [&'static str],
    },
}

#[derive(Debug)]
pub struct Section {
    pub menu: &'static str,
    pub title: &'static str,
    pub targets: &'static [Target],
}

pub static SECTIONS: [Section; 6] = [
    Section {
        menu: "个人信息 (姓名、职位等)",
        title: "📝 更新个人信息",
        targets: &[Target::Suffixed {
            path: &["profile"],
            fields: &[("name", "姓名"), ("title", "职位")],
        }],
    },
    Section {
        menu: "卡带名称",
        title: "🎮 更新卡带名称",
        targets: &[Target::SuffixedEach {
            path: &["cartridges"],
            fields: &[("name", "名称")],
        }],
    },
    Section {
        menu: "UI文本",
        title: "🖥️ 更新UI文本",
        targets: &[
            Target::Mapped {
                path: &["ui", "tabs"],
                heading: Some("标签页文本:"),
                keys: &["skills", "achievements", "education"],
                fields: &[],
            },
            Target::Mapped {
                path: &["ui", "projects"],
                heading: Some("项目文本:"),
                keys: &[
                    "d5Title",
                    "d5Desc",
                    "kujialeTitle",
                    "kujialeDesc",
                    "officeTitle",
                    "officeDesc",
                    "diverseshotTitle",
                    "diverseshotDesc",
                ],
                fields: &[],
            },
            Target::Mapped {
                path: &["ui"],
                heading: None,
                keys: &[
                    "start",
                    "exit",
                    "welcome",
                    "welcomeDesc",
                    "cartridge",
                    "level",
                    "cards",
                ],
                fields: &[],
            },
        ],
    },
    Section {
        menu: "技能文本",
        title: "🎯 更新技能文本",
        targets: &[Target::Mapped {
            path: &["skills"],
            heading: None,
            keys: &["productPlanning", "interactionDesign", "dataAI"],
            fields: &["name", "description", "cooldown"],
        }],
    },
    Section {
        menu: "成就文本",
        title: "🏆 更新成就文本",
        targets: &[Target::Mapped {
            path: &["achievements"],
            heading: None,
            keys: &["arr", "patents", "awards"],
            fields: &["title", "description"],
        }],
    },
    Section {
        menu: "教育文本",
        title: "🎓 更新教育文本",
        targets: &[Target::Mapped {
            path: &["education"],
            heading: None,
            keys: &["zju", "dlnu"],
            fields: &["period", "school", "degree"],
        }],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => f.write_str(key),
            Step::Index(index) => write!(f, "[{}]", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeafPath(Vec<Step>);

impl LeafPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Step::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Step::Index(index));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    fn of(path: &[&str]) -> Self {
        path.iter().fold(LeafPath::new(), |leaf, key| leaf.key(*key))
    }
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 && matches!(step, Step::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub label: String,
    pub current: String,
    pub path: LeafPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Heading(String),
    Field(Prompt),
}

#[derive(Debug)]
pub enum SchemaError {
    /// An existing value on the way to the leaf is not an object (or array, for an index step).
    NotContainer { at: LeafPath },
    IndexOutOfRange { at: LeafPath },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NotContainer { at } if at.steps().is_empty() => {
                f.write_str("文档根节点不是对象")
            }
            SchemaError::NotContainer { at } => write!(f, "{} 不是对象", at),
            SchemaError::IndexOutOfRange { at } => write!(f, "{} 不存在", at),
        }
    }
}

impl std::error::Error for SchemaError {}

pub fn lookup<'a>(root: &'a Value, path: &LeafPath) -> Option<&'a Value> {
    path.steps().iter().try_fold(root, |value, step| match step {
        Step::Key(key) => value.as_object()?.get(key),
        Step::Index(index) => value.as_array()?.get(*index),
    })
}

/// Text shown as the current value; absent or null reads as empty.
pub fn lookup_text(root: &Value, path: &LeafPath) -> String {
    match lookup(root, path) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn assign_text(root: &mut Value, path: &LeafPath, text: String) -> Result<(), SchemaError> {
    let Some((last, parents)) = path.steps().split_last() else {
        *root = Value::String(text);
        return Ok(());
    };

    let mut walked = LeafPath::new();
    let mut current = root;
    for step in parents {
        current = match step {
            Step::Key(key) => {
                let map = as_object_mut(current, &walked)?;
                walked = walked.key(key.clone());
                let child = map
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if child.is_null() {
                    *child = Value::Object(Map::new());
                }
                child
            }
            Step::Index(index) => {
                let at = walked.clone();
                walked = walked.index(*index);
                current
                    .as_array_mut()
                    .ok_or(SchemaError::NotContainer { at })?
                    .get_mut(*index)
                    .ok_or_else(|| SchemaError::IndexOutOfRange { at: walked.clone() })?
            }
        };
    }

    match last {
        Step::Key(key) => {
            as_object_mut(current, &walked)?.insert(key.clone(), Value::String(text));
        }
        Step::Index(index) => {
            let slot = current
                .as_array_mut()
                .ok_or_else(|| SchemaError::NotContainer { at: walked.clone() })?
                .get_mut(*index)
                .ok_or_else(|| SchemaError::IndexOutOfRange {
                    at: walked.clone().index(*index),
                })?;
            *slot = Value::String(text);
        }
    }
    Ok(())
}

fn as_object_mut<'a>(
    value: &'a mut Value,
    at: &LeafPath,
) -> Result<&'a mut Map<String, Value>, SchemaError> {
    value
        .as_object_mut()
        .ok_or_else(|| SchemaError::NotContainer { at: at.clone() })
}

/// Headings and prompts for one section, in the order they are asked.
pub fn plan(section: &Section, root: &Value) -> Vec<Entry> {
    let mut entries = Vec::new();
    for target in section.targets {
        match target {
            Target::Suffixed { path, fields } => {
                plan_suffixed(&mut entries, root, LeafPath::of(path), fields);
            }
            Target::SuffixedEach { path, fields } => {
                let base = LeafPath::of(path);
                let count = lookup(root, &base)
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                for index in 0..count {
                    let item = base.clone().index(index);
                    let id = lookup_text(root, &item.clone().key("id"));
                    entries.push(Entry::Heading(format!("卡带: {}", id)));
                    plan_suffixed(&mut entries, root, item, fields);
                }
            }
            Target::Mapped {
                path,
                heading,
                keys,
                fields,
            } => {
                if let Some(heading) = heading {
                    entries.push(Entry::Heading(heading.to_string()));
                }
                let base = LeafPath::of(path);
                for key in *keys {
                    let mapping = base.clone().key(*key);
                    if fields.is_empty() {
                        plan_mapped(&mut entries, root, &mapping, key, "");
                        continue;
                    }
                    entries.push(Entry::Heading(format!("{}:", key)));
                    for field in *fields {
                        plan_mapped(&mut entries, root, &mapping.clone().key(*field), field, "  ");
                    }
                }
            }
        }
    }
    entries
}

fn plan_suffixed(
    entries: &mut Vec<Entry>,
    root: &Value,
    object: LeafPath,
    fields: &[(&str, &str)],
) {
    for (field, label) in fields {
        for locale in Locale::ALL {
            let path = object.clone().key(format!("{}{}", field, locale.suffix()));
            entries.push(Entry::Field(Prompt {
                label: format!("请输入{}{}", locale.label(), label),
                current: lookup_text(root, &path),
                path,
            }));
        }
    }
}

fn plan_mapped(entries: &mut Vec<Entry>, root: &Value, mapping: &LeafPath, name: &str, indent: &str) {
    for locale in Locale::ALL {
        let path = mapping.clone().key(locale.key());
        entries.push(Entry::Field(Prompt {
            label: format!("{}{} {}", indent, name, locale.label()),
            current: lookup_text(root, &path),
            path,
        }));
    }
}
