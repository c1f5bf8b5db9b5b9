//! Subcommand implementations.
//!
//! Each command opens the dump as a table, collects a report and leaves the
//! rendering to [`crate::render`].

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info_span};

use sav_model::{Entity, TableOptions, VariableDescriptor};
use sav_table::{JsonSourceFile, SavTable};

use crate::cli::{TableArgs, ValuesArgs};
use crate::render::Report;

/// Table options from the optional options file, overridden by flags.
pub fn table_options(args: &TableArgs) -> Result<TableOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read options file {}", path.display()))?;
            serde_json::from_str::<TableOptions>(&text)
                .with_context(|| format!("parse options file {}", path.display()))?
        }
        None => TableOptions::default(),
    };
    if let Some(entity_type) = &args.entity_type {
        options.entity_type = Some(entity_type.clone());
    }
    if let Some(locale) = &args.locale {
        options.locale = Some(locale.clone());
    }
    if let Some(id_variable) = &args.id_variable {
        options.id_variable = Some(id_variable.clone());
    }
    options.multilines |= args.multilines;
    Ok(options)
}

pub fn open_table(args: &TableArgs) -> Result<SavTable<JsonSourceFile>> {
    let options = table_options(args)?;
    debug!(?options, "Table options");
    SavTable::open_json(&args.dump, options)
        .with_context(|| format!("open source dump {}", args.dump.display()))
}

/// Variables of a table.
#[derive(Debug, Clone)]
pub struct VariablesReport {
    pub table: String,
    pub id_variable: String,
    pub multiline: bool,
    pub variables: Vec<VariableDescriptor>,
}

/// One entity and the 1-based rows it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRows {
    pub entity: Entity,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct EntitiesReport {
    pub table: String,
    pub multiline: bool,
    pub entities: Vec<EntityRows>,
}

/// Canonical value of one variable for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRecord {
    pub entity: Entity,
    pub variable: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValuesReport {
    pub table: String,
    pub records: Vec<ValueRecord>,
}

pub fn run_variables(args: &TableArgs) -> Result<VariablesReport> {
    let span = info_span!("variables", dump = %args.dump.display());
    let _guard = span.enter();

    let mut table = open_table(args)?;
    let multiline = table.is_multiline().context("resolve entities")?;
    let variables = table
        .variables()
        .context("build variable descriptors")?
        .to_vec();
    Ok(VariablesReport {
        table: table.name().to_string(),
        id_variable: table.id_variable_name().to_string(),
        multiline,
        variables,
    })
}

pub fn run_entities(args: &TableArgs) -> Result<EntitiesReport> {
    let span = info_span!("entities", dump = %args.dump.display());
    let _guard = span.enter();

    let mut table = open_table(args)?;
    let entities = table.entities().context("resolve entities")?.to_vec();
    let multiline = table.is_multiline().context("resolve entities")?;
    let mut rows = Vec::with_capacity(entities.len());
    for entity in entities {
        let value_set = table
            .value_set(&entity)
            .with_context(|| format!("value set of {entity}"))?;
        let occupied = value_set.rows().to_vec();
        rows.push(EntityRows {
            entity,
            rows: occupied,
        });
    }
    Ok(EntitiesReport {
        table: table.name().to_string(),
        multiline,
        entities: rows,
    })
}

pub fn run_values(args: &ValuesArgs) -> Result<ValuesReport> {
    let span = info_span!("values", dump = %args.table.dump.display());
    let _guard = span.enter();

    let mut table = open_table(&args.table)?;
    let entities = match &args.entity {
        Some(identifier) => vec![Entity::new(table.entity_type(), identifier.as_str())],
        None => table.entities().context("resolve entities")?.to_vec(),
    };

    let mut records = Vec::new();
    for entity in &entities {
        let value_set = table
            .value_set(entity)
            .with_context(|| format!("value set of {entity}"))?;
        for (descriptor, value) in value_set.values() {
            let value = value
                .with_context(|| format!("value of {} for {entity}", descriptor.name))?;
            records.push(ValueRecord {
                entity: entity.clone(),
                variable: descriptor.name.clone(),
                value: value.to_string(),
            });
        }
    }
    debug!(
        entities = entities.len(),
        records = records.len(),
        "Collected values"
    );
    Ok(ValuesReport {
        table: table.name().to_string(),
        records,
    })
}

impl Report for VariablesReport {
    fn title(&self) -> String {
        let kind = if self.multiline { "multiline" } else { "single-line" };
        format!(
            "Table {} ({kind}, identifier {}): {} variables",
            self.table,
            self.id_variable,
            self.variables.len()
        )
    }

    fn header(&self) -> Vec<&'static str> {
        vec![
            "#",
            "Variable",
            "Type",
            "Label",
            "Format",
            "Measure",
            "Categories",
            "Repeatable",
        ]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.variables
            .iter()
            .map(|descriptor| {
                let spss = |name: &str| {
                    descriptor
                        .attribute(Some(sav_table::descriptor::ATTRIBUTE_NAMESPACE), name)
                        .map(|attribute| attribute.value.clone())
                        .unwrap_or_default()
                };
                vec![
                    (descriptor.index + 1).to_string(),
                    descriptor.name.clone(),
                    descriptor.value_type.to_string(),
                    descriptor.label().unwrap_or_default().to_string(),
                    spss("format"),
                    spss("measure"),
                    categories_summary(descriptor),
                    if descriptor.repeatable { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect()
    }
}

/// `code=label` pairs; missing codes are marked with `*`.
fn categories_summary(descriptor: &VariableDescriptor) -> String {
    descriptor
        .categories
        .iter()
        .map(|category| {
            let marker = if category.missing { "*" } else { "" };
            match category.label() {
                Some(label) => format!("{}{marker}={label}", category.name),
                None => format!("{}{marker}", category.name),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Report for EntitiesReport {
    fn title(&self) -> String {
        let kind = if self.multiline { "multiline" } else { "single-line" };
        format!(
            "Table {} ({kind}): {} entities",
            self.table,
            self.entities.len()
        )
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["Entity", "Rows"]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.entities
            .iter()
            .map(|entry| {
                let rows = entry
                    .rows
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                vec![entry.entity.to_string(), rows]
            })
            .collect()
    }
}

impl Report for ValuesReport {
    fn title(&self) -> String {
        format!("Table {}: {} values", self.table, self.records.len())
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["Entity", "Variable", "Value"]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                vec![
                    record.entity.identifier.clone(),
                    record.variable.clone(),
                    record.value.clone(),
                ]
            })
            .collect()
    }
}
