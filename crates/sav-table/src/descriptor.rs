//! Variable descriptor construction from source variables.

use sav_model::{
    Attribute, Category, NumericFormat, SourceCategory, SourceVariable, ValueType,
    VariableDescriptor, VariableKind,
};

use crate::charset::validate_str;
use crate::error::InvalidCharacterError;

/// Namespace of the attributes copied from the source file.
pub const ATTRIBUTE_NAMESPACE: &str = "spss";

/// Widest whole-number column whose values a double holds exactly.
const MAX_INTEGER_WIDTH: u32 = 15;

/// Table-level settings shared by every descriptor of a table.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorContext<'a> {
    pub entity_type: &'a str,
    pub locale: Option<&'a str>,
    /// Set when the table is multiline.
    pub occurrence_group: Option<&'a str>,
}

/// Canonical value type of a source variable.
pub fn value_type<V>(variable: &V) -> ValueType
where
    V: SourceVariable + ?Sized,
{
    match variable.kind() {
        VariableKind::String => ValueType::Text,
        VariableKind::Numeric(format) => match format {
            NumericFormat::ADate | NumericFormat::Date => ValueType::Date,
            NumericFormat::DateTime => ValueType::DateTime,
            NumericFormat::Time | NumericFormat::Other => ValueType::Text,
            NumericFormat::Comma
            | NumericFormat::Dollar
            | NumericFormat::Dot
            | NumericFormat::Fixed
            | NumericFormat::Scientific => {
                if variable.decimals() == 0 && variable.width() <= MAX_INTEGER_WIDTH {
                    ValueType::Integer
                } else {
                    ValueType::Decimal
                }
            }
        },
    }
}

/// Build the descriptor of `variable`.
///
/// `index` is the dense table position and `source_position` the variable's
/// position in the file. The name is validated before anything else is read.
pub fn build_descriptor<V>(
    variable: &V,
    index: usize,
    source_position: usize,
    context: &DescriptorContext<'_>,
) -> Result<VariableDescriptor, InvalidCharacterError>
where
    V: SourceVariable + ?Sized,
{
    let name = variable.name();
    validate_str(name)?;

    let mut descriptor = VariableDescriptor::new(name, value_type(variable), context.entity_type);
    descriptor.index = index;
    descriptor.source_position = source_position;

    if let Some(label) = variable.label().filter(|label| !label.is_empty()) {
        validate_str(label)?;
        descriptor
            .attributes
            .push(label_attribute(label, context.locale));
    }

    descriptor.attributes.extend([
        source_attribute("measure", variable.measure().label())?,
        source_attribute("width", &variable.width().to_string())?,
        source_attribute("decimals", &variable.decimals().to_string())?,
        source_attribute("shortName", variable.short_name())?,
        source_attribute("format", &variable.format())?,
    ]);

    for category in variable.categories() {
        descriptor
            .categories
            .push(build_category(variable, category, context.locale)?);
    }

    if let Some(group) = context.occurrence_group.filter(|group| !group.is_empty()) {
        descriptor.repeatable = true;
        descriptor.occurrence_group = Some(group.to_string());
    }

    Ok(descriptor)
}

fn build_category<V>(
    variable: &V,
    category: &SourceCategory,
    locale: Option<&str>,
) -> Result<Category, InvalidCharacterError>
where
    V: SourceVariable + ?Sized,
{
    validate_str(&category.code)?;
    let name = if variable.is_numeric() {
        normalize_number_string(&category.code)
    } else {
        category.code.clone()
    };
    validate_str(&category.label)?;

    let mut built = Category::new(name);
    if !category.label.is_empty() {
        built.attributes.push(label_attribute(&category.label, locale));
    }
    built.missing = is_missing_code(variable, category);
    Ok(built)
}

/// Missing-code test against the raw value matching the variable's kind.
fn is_missing_code<V>(variable: &V, category: &SourceCategory) -> bool
where
    V: SourceVariable + ?Sized,
{
    if variable.is_numeric() {
        variable.is_numeric_missing_code(category.numeric_value)
    } else {
        variable.is_string_missing_code(&category.string_value)
    }
}

fn label_attribute(value: &str, locale: Option<&str>) -> Attribute {
    Attribute::new("label", value).with_locale(locale)
}

fn source_attribute(name: &str, value: &str) -> Result<Attribute, InvalidCharacterError> {
    validate_str(value)?;
    Ok(Attribute::new(name, value).with_namespace(ATTRIBUTE_NAMESPACE))
}

/// Canonical form of a numeric category code (`"1.0"` becomes `"1"`).
///
/// Codes that do not parse as a finite number are returned unchanged.
pub fn normalize_number_string(code: &str) -> String {
    match code.trim().parse::<f64>() {
        Ok(value) if value == 0.0 => "0".to_string(),
        Ok(value) if value.is_finite() => value.to_string(),
        _ => code.to_string(),
    }
}
